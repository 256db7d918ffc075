//! Structural check of a candidate statement.
//!
//! Used in strict mode after the textual checks pass. The candidate is
//! parsed with the PostgreSQL dialect and every relation it reads from is
//! compared against the allowlist, including relations inside CTE bodies,
//! derived tables, nested joins and set operations.

use crate::error::Rejection;
use assetdesk_core::SchemaDescriptor;
use sqlparser::ast::{Query, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

/// Parses candidates and collects the relations they reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlAnalyzer;

impl SqlAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Check that `sql` is one read-only query over allowed tables.
    pub fn check(&self, sql: &str, schema: &SchemaDescriptor) -> Result<(), Rejection> {
        let statements = Parser::parse_sql(&PostgreSqlDialect {}, sql).map_err(|e| {
            debug!(error = %e, "Candidate failed to parse");
            Rejection::unparseable()
        })?;

        let statement = match statements.as_slice() {
            [single] => single,
            [] => return Err(Rejection::invalid_input()),
            _ => return Err(Rejection::multiple_statements()),
        };

        let Statement::Query(query) = statement else {
            return Err(Rejection::not_select());
        };

        for table in self.referenced_tables(query) {
            if !schema.is_table_allowed(&table) {
                return Err(Rejection::disallowed_table(&table));
            }
        }

        Ok(())
    }

    /// Every relation name read by the query, lowercased, in visit order.
    pub fn referenced_tables(&self, query: &Query) -> Vec<String> {
        let mut tables = Vec::new();
        self.visit_query(query, &mut tables);
        tables
    }

    fn visit_query(&self, query: &Query, tables: &mut Vec<String>) {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.visit_query(&cte.query, tables);
            }
        }
        self.visit_set_expr(&query.body, tables);
    }

    fn visit_set_expr(&self, expr: &SetExpr, tables: &mut Vec<String>) {
        match expr {
            SetExpr::Select(select) => {
                for table_with_joins in &select.from {
                    self.visit_table_with_joins(table_with_joins, tables);
                }
            }
            SetExpr::Query(query) => self.visit_query(query, tables),
            SetExpr::SetOperation { left, right, .. } => {
                self.visit_set_expr(left, tables);
                self.visit_set_expr(right, tables);
            }
            _ => {}
        }
    }

    fn visit_table_with_joins(&self, table_with_joins: &TableWithJoins, tables: &mut Vec<String>) {
        self.visit_table_factor(&table_with_joins.relation, tables);
        for join in &table_with_joins.joins {
            self.visit_table_factor(&join.relation, tables);
        }
    }

    fn visit_table_factor(&self, factor: &TableFactor, tables: &mut Vec<String>) {
        match factor {
            TableFactor::Table { name, .. } => tables.push(name.to_string().to_lowercase()),
            TableFactor::Derived { subquery, .. } => self.visit_query(subquery, tables),
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => self.visit_table_with_joins(table_with_joins, tables),
            _ => {}
        }
    }
}
