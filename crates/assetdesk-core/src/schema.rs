//! Schema registry for the natural-language query layer.
//!
//! The registry is the single source of truth for what the chat layer may see
//! and touch. It is used twice per request:
//!
//! - rendered to prose by [`SchemaDescriptor::describe`] as grounding context
//!   for the external SQL generator, and
//! - consulted by the query guard (`allowed_tables`, `restricted_columns`,
//!   `allowed_operations`) when validating the generated SQL.
//!
//! A descriptor is built once at startup and shared read-only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The only statement kind exposed to the chat layer.
pub const SELECT_OPERATION: &str = "SELECT";

/// A column exposed to the natural-language layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,

    /// Semantic SQL type, e.g. `VARCHAR(100)` or `ENUM`.
    #[serde(rename = "type")]
    pub data_type: String,

    /// Human-readable meaning of the column.
    #[serde(default)]
    pub description: String,

    /// Enumerated legal values (for ENUM-like columns).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl ColumnDef {
    /// Create a new column definition.
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            description: description.into(),
            values: Vec::new(),
        }
    }

    /// Attach enumerated legal values.
    pub fn with_values(mut self, values: &[&str]) -> Self {
        self.values = values.iter().map(|v| v.to_string()).collect();
        self
    }
}

/// A table definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableDef {
    /// Table name.
    pub name: String,

    /// What the table holds.
    #[serde(default)]
    pub description: String,

    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<ColumnDef>,

    /// Table-level exclusion list. Checked in addition to the global
    /// restricted column set.
    #[serde(default)]
    pub restricted_columns: Vec<String>,
}

impl TableDef {
    /// Create an empty table definition.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            columns: Vec::new(),
            restricted_columns: Vec::new(),
        }
    }

    /// Add a column.
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a table-level restricted column.
    pub fn restrict(mut self, column: impl Into<String>) -> Self {
        self.restricted_columns.push(column.into());
        self
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Cardinality of a relationship between two tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    ManyToOne,
    OneToMany,
    OneToOne,
    ManyToMany,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::ManyToOne => write!(f, "many-to-one"),
            Cardinality::OneToMany => write!(f, "one-to-many"),
            Cardinality::OneToOne => write!(f, "one-to-one"),
            Cardinality::ManyToMany => write!(f, "many-to-many"),
        }
    }
}

/// A foreign-key style link, e.g. `assets.category_id -> categories.id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    /// Source column as `table.column`.
    pub from: String,
    /// Target column as `table.column`.
    pub to: String,
    /// Relationship cardinality.
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
}

impl Relationship {
    pub fn new(from: impl Into<String>, to: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            cardinality,
        }
    }
}

/// Declarative schema as written in a schema YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchemaDefinition {
    /// Table definitions in declaration order.
    #[serde(default)]
    pub tables: Vec<TableDef>,

    /// Inter-table relationships.
    #[serde(default)]
    pub relationships: Vec<Relationship>,

    /// Tables the natural-language layer may query. Empty means every
    /// declared table.
    #[serde(default)]
    pub allowed_tables: Vec<String>,

    /// Columns that must never appear in a query, regardless of table.
    #[serde(default)]
    pub restricted_columns: Vec<String>,
}

/// Immutable, process-wide description of the queryable schema.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    tables: Vec<TableDef>,
    relationships: Vec<Relationship>,
    allowed_tables: BTreeSet<String>,
    restricted_columns: BTreeSet<String>,
    allowed_operations: BTreeSet<String>,
}

impl SchemaDescriptor {
    /// Build a descriptor from a declarative definition.
    ///
    /// Table and column names used for policy checks are lowercased here so
    /// that every consumer can compare against lowercase text.
    pub fn from_definition(definition: SchemaDefinition) -> Self {
        let allowed_tables: BTreeSet<String> = if definition.allowed_tables.is_empty() {
            definition
                .tables
                .iter()
                .map(|t| t.name.to_lowercase())
                .collect()
        } else {
            definition
                .allowed_tables
                .iter()
                .map(|t| t.to_lowercase())
                .collect()
        };

        let restricted_columns = definition
            .restricted_columns
            .iter()
            .map(|c| c.to_lowercase())
            .collect();

        let tables = definition
            .tables
            .into_iter()
            .map(|mut t| {
                t.restricted_columns = t
                    .restricted_columns
                    .iter()
                    .map(|c| c.to_lowercase())
                    .collect();
                t
            })
            .collect();

        Self {
            tables,
            relationships: definition.relationships,
            allowed_tables,
            restricted_columns,
            allowed_operations: BTreeSet::from([SELECT_OPERATION.to_string()]),
        }
    }

    /// Lowercase names of the tables the guard lets through.
    pub fn allowed_tables(&self) -> &BTreeSet<String> {
        &self.allowed_tables
    }

    /// Lowercase names of columns that must never be exposed.
    pub fn restricted_columns(&self) -> &BTreeSet<String> {
        &self.restricted_columns
    }

    /// Statement kinds accepted by the guard. Always exactly `{"SELECT"}`.
    pub fn allowed_operations(&self) -> &BTreeSet<String> {
        &self.allowed_operations
    }

    /// Table definitions in declaration order.
    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    /// Declared relationships.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Get a table definition by name (case-insensitive).
    pub fn get_table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Check whether a table may be queried.
    pub fn is_table_allowed(&self, table: &str) -> bool {
        self.allowed_tables.contains(&table.to_lowercase())
    }

    /// Check whether a column is hidden, either globally or by the table's
    /// own exclusion list.
    pub fn is_column_restricted(&self, table: &TableDef, column: &str) -> bool {
        let column = column.to_lowercase();
        self.restricted_columns.contains(&column) || table.restricted_columns.contains(&column)
    }

    /// Render the visible schema as a natural-language document for
    /// grounding an external SQL generator.
    ///
    /// Restricted columns are omitted, as are relationships touching them.
    pub fn describe(&self) -> String {
        let mut out = String::from("DATABASE SCHEMA:\n\n");

        for table in self.tables.iter().filter(|t| self.is_table_allowed(&t.name)) {
            out.push_str(&format!("TABLE: {}\n", table.name));
            out.push_str(&format!("Description: {}\n", table.description));
            out.push_str("Columns:\n");

            for column in &table.columns {
                if self.is_column_restricted(table, &column.name) {
                    continue;
                }

                let mut line = format!("  - {} ({})", column.name, column.data_type);
                if !column.values.is_empty() {
                    line.push_str(&format!(" [values: {}]", column.values.join(", ")));
                }
                line.push_str(&format!(": {}", column.description));
                out.push_str(&line);
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str("RELATIONSHIPS:\n");
        for rel in self.relationships.iter().filter(|r| self.is_relationship_visible(r)) {
            out.push_str(&format!("  - {} -> {} ({})\n", rel.from, rel.to, rel.cardinality));
        }

        out
    }

    fn is_relationship_visible(&self, rel: &Relationship) -> bool {
        [&rel.from, &rel.to].iter().all(|endpoint| {
            let Some((table, column)) = endpoint.split_once('.') else {
                return false;
            };
            match self.get_table(table) {
                Some(def) => {
                    self.is_table_allowed(&def.name) && !self.is_column_restricted(def, column)
                }
                None => false,
            }
        })
    }

    /// The built-in IT asset inventory schema.
    pub fn asset_inventory() -> Self {
        Self::from_definition(asset_inventory_definition())
    }
}

impl Default for SchemaDescriptor {
    fn default() -> Self {
        Self::asset_inventory()
    }
}

/// Definition behind [`SchemaDescriptor::asset_inventory`].
///
/// Timestamp columns are left out: their names contain denylisted keywords
/// and every query touching them would be rejected.
pub fn asset_inventory_definition() -> SchemaDefinition {
    let assets = TableDef::new("assets", "Main table holding IT assets and inventory items")
        .column(ColumnDef::new("id", "INT", "Primary key"))
        .column(ColumnDef::new("uuid", "VARCHAR(36)", "Unique asset UUID"))
        .column(ColumnDef::new("name", "VARCHAR(150)", "Asset name"))
        .column(ColumnDef::new("asset_tag", "VARCHAR(50)", "Unique asset tag"))
        .column(ColumnDef::new("serial_number", "VARCHAR(100)", "Manufacturer serial number"))
        .column(ColumnDef::new("category_id", "INT", "Foreign key to categories"))
        .column(ColumnDef::new("location_id", "INT", "Foreign key to locations"))
        .column(ColumnDef::new("vendor_id", "INT", "Foreign key to vendors (nullable)"))
        .column(ColumnDef::new(
            "current_holder_id",
            "INT",
            "Foreign key to users (nullable): the user currently holding the asset",
        ))
        .column(
            ColumnDef::new(
                "status",
                "ENUM",
                "Asset status: available=ready to assign, assigned=held by a user, \
                 repair=under maintenance, retired=disposed of, missing=cannot be located",
            )
            .with_values(&["available", "assigned", "repair", "retired", "missing"]),
        )
        .column(
            ColumnDef::new("condition", "ENUM", "Physical condition of the asset")
                .with_values(&["new", "good", "fair", "poor"]),
        )
        .column(ColumnDef::new("purchase_date", "DATE", "Date of purchase"))
        .column(ColumnDef::new("purchase_price", "DECIMAL(15,2)", "Purchase price"))
        .column(ColumnDef::new("warranty_expiry", "DATE", "Warranty end date (nullable)"))
        .column(ColumnDef::new("specifications", "JSON", "Technical specifications"))
        .column(ColumnDef::new("notes", "TEXT", "Additional notes"))
        .column(ColumnDef::new("image_url", "VARCHAR(255)", "Path to the asset image"));

    let categories = TableDef::new("categories", "Asset categories")
        .column(ColumnDef::new("id", "INT", "Primary key"))
        .column(ColumnDef::new("uuid", "VARCHAR(36)", "Unique category UUID"))
        .column(ColumnDef::new(
            "name",
            "VARCHAR(100)",
            "Category name (e.g. Laptop, Monitor, Printer)",
        ))
        .column(ColumnDef::new("description", "TEXT", "Category description"));

    let locations = TableDef::new("locations", "Places where assets are stored or used")
        .column(ColumnDef::new("id", "INT", "Primary key"))
        .column(ColumnDef::new("uuid", "VARCHAR(36)", "Unique location UUID"))
        .column(ColumnDef::new(
            "name",
            "VARCHAR(100)",
            "Location name (e.g. Building A, 2nd Floor, IT Room)",
        ))
        .column(ColumnDef::new("address", "TEXT", "Street address"))
        .column(ColumnDef::new("description", "TEXT", "Location description"));

    let vendors = TableDef::new("vendors", "Asset vendors and suppliers")
        .column(ColumnDef::new("id", "INT", "Primary key"))
        .column(ColumnDef::new("uuid", "VARCHAR(36)", "Unique vendor UUID"))
        .column(ColumnDef::new("name", "VARCHAR(100)", "Vendor company name"))
        .column(ColumnDef::new("contact_person", "VARCHAR(100)", "Contact person"))
        .column(ColumnDef::new("email", "VARCHAR(100)", "Vendor email"))
        .column(ColumnDef::new("phone", "VARCHAR(20)", "Phone number"))
        .column(ColumnDef::new("address", "TEXT", "Vendor address"));

    let users = TableDef::new("users", "System users")
        .column(ColumnDef::new("id", "INT", "Primary key"))
        .column(ColumnDef::new("uuid", "VARCHAR(36)", "Unique user UUID"))
        .column(ColumnDef::new("name", "VARCHAR(100)", "Full name"))
        .column(ColumnDef::new("email", "VARCHAR(100)", "User email"))
        .column(ColumnDef::new("password", "VARCHAR(255)", "Credential hash"))
        .column(
            ColumnDef::new("role", "ENUM", "User role")
                .with_values(&["admin", "staff", "employee"]),
        )
        .column(ColumnDef::new("department", "VARCHAR(100)", "Department"))
        .column(ColumnDef::new("phone", "VARCHAR(20)", "Phone number"))
        .column(ColumnDef::new("is_active", "BOOLEAN", "Whether the account is active"))
        .column(ColumnDef::new("refresh_token", "TEXT", "Session token"))
        .restrict("password")
        .restrict("refresh_token");

    let transactions = TableDef::new("transactions", "History of asset movements and usage")
        .column(ColumnDef::new("id", "INT", "Primary key"))
        .column(ColumnDef::new("uuid", "VARCHAR(36)", "Unique transaction UUID"))
        .column(ColumnDef::new("asset_id", "INT", "Foreign key to assets"))
        .column(ColumnDef::new(
            "user_id",
            "INT",
            "Foreign key to users: the employee borrowing or returning the asset",
        ))
        .column(ColumnDef::new(
            "admin_id",
            "INT",
            "Foreign key to users: the administrator who processed the transaction",
        ))
        .column(
            ColumnDef::new("action_type", "ENUM", "Kind of transaction").with_values(&[
                "checkout",
                "checkin",
                "repair",
                "complete_repair",
                "dispose",
                "transfer",
                "found",
            ]),
        )
        .column(ColumnDef::new("transaction_date", "DATETIME", "When the transaction happened"))
        .column(ColumnDef::new("expected_return_date", "DATE", "Expected return date (nullable)"))
        .column(ColumnDef::new("actual_return_date", "DATE", "Actual return date (nullable)"))
        .column(
            ColumnDef::new("condition_before", "ENUM", "Condition before the transaction")
                .with_values(&["new", "good", "fair", "poor"]),
        )
        .column(
            ColumnDef::new("condition_after", "ENUM", "Condition after the transaction")
                .with_values(&["new", "good", "fair", "poor"]),
        )
        .column(ColumnDef::new("notes", "TEXT", "Transaction notes"));

    SchemaDefinition {
        tables: vec![assets, categories, locations, vendors, users, transactions],
        relationships: vec![
            Relationship::new("assets.category_id", "categories.id", Cardinality::ManyToOne),
            Relationship::new("assets.location_id", "locations.id", Cardinality::ManyToOne),
            Relationship::new("assets.vendor_id", "vendors.id", Cardinality::ManyToOne),
            Relationship::new("assets.current_holder_id", "users.id", Cardinality::ManyToOne),
            Relationship::new("transactions.asset_id", "assets.id", Cardinality::ManyToOne),
            Relationship::new("transactions.user_id", "users.id", Cardinality::ManyToOne),
            Relationship::new("transactions.admin_id", "users.id", Cardinality::ManyToOne),
        ],
        allowed_tables: vec![
            "assets".to_string(),
            "categories".to_string(),
            "locations".to_string(),
            "vendors".to_string(),
            "users".to_string(),
            "transactions".to_string(),
        ],
        restricted_columns: vec!["password".to_string(), "refresh_token".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_omits_restricted_columns() {
        let schema = SchemaDescriptor::asset_inventory();
        let description = schema.describe();

        assert!(!description.contains("password"));
        assert!(!description.contains("refresh_token"));
        assert!(description.contains("TABLE: users"));
        assert!(description.contains("  - department (VARCHAR(100)): Department"));
    }

    #[test]
    fn test_describe_checks_table_level_exclusions() {
        let definition = SchemaDefinition {
            tables: vec![
                TableDef::new("users", "People")
                    .column(ColumnDef::new("id", "INT", "Primary key"))
                    .column(ColumnDef::new("api_key", "TEXT", "Secret"))
                    .restrict("API_KEY"),
            ],
            ..Default::default()
        };
        let schema = SchemaDescriptor::from_definition(definition);

        let description = schema.describe();
        assert!(!description.contains("api_key"));
        assert!(description.contains("  - id (INT): Primary key"));
        // Not globally restricted, only hidden from this table.
        assert!(schema.restricted_columns().is_empty());
    }

    #[test]
    fn test_describe_renders_values_and_relationships() {
        let description = SchemaDescriptor::asset_inventory().describe();

        assert!(description.starts_with("DATABASE SCHEMA:\n\nTABLE: assets\n"));
        assert!(description.contains("[values: new, good, fair, poor]"));
        assert!(description.contains("RELATIONSHIPS:\n"));
        assert!(description.contains("  - assets.category_id -> categories.id (many-to-one)\n"));
    }

    #[test]
    fn test_describe_is_deterministic() {
        let schema = SchemaDescriptor::asset_inventory();
        assert_eq!(schema.describe(), schema.describe());
    }

    #[test]
    fn test_policy_sets_are_lowercase() {
        let definition = SchemaDefinition {
            tables: vec![TableDef::new("Assets", "")],
            allowed_tables: vec!["Assets".to_string()],
            restricted_columns: vec!["Secret".to_string()],
            ..Default::default()
        };
        let schema = SchemaDescriptor::from_definition(definition);

        assert!(schema.allowed_tables().contains("assets"));
        assert!(schema.restricted_columns().contains("secret"));
        assert!(schema.is_table_allowed("ASSETS"));
        assert_eq!(
            schema.allowed_operations().iter().collect::<Vec<_>>(),
            vec!["SELECT"]
        );
    }

    #[test]
    fn test_allowed_tables_default_to_declared_tables() {
        let definition = SchemaDefinition {
            tables: vec![TableDef::new("assets", ""), TableDef::new("vendors", "")],
            ..Default::default()
        };
        let schema = SchemaDescriptor::from_definition(definition);

        assert_eq!(schema.allowed_tables().len(), 2);
        assert!(schema.is_table_allowed("vendors"));
    }

    #[test]
    fn test_disallowed_tables_are_not_described() {
        let definition = SchemaDefinition {
            tables: vec![TableDef::new("assets", "Things"), TableDef::new("audit_log", "Internal")],
            allowed_tables: vec!["assets".to_string()],
            ..Default::default()
        };
        let description = SchemaDescriptor::from_definition(definition).describe();

        assert!(description.contains("TABLE: assets"));
        assert!(!description.contains("audit_log"));
    }

    #[test]
    fn test_definition_from_yaml() {
        let yaml = r#"
tables:
  - name: assets
    description: Things we own
    columns:
      - name: status
        type: ENUM
        description: Lifecycle state
        values: [available, retired]
relationships:
  - from: assets.category_id
    to: categories.id
    type: many-to-one
restricted_columns: [password]
"#;
        let definition: SchemaDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(definition.tables[0].columns[0].values.len(), 2);
        assert_eq!(definition.relationships[0].cardinality, Cardinality::ManyToOne);

        let schema = SchemaDescriptor::from_definition(definition);
        assert!(schema.is_table_allowed("assets"));
        assert!(schema.restricted_columns().contains("password"));
    }
}
