//! The query guard.
//!
//! [`QueryGuard::process`] takes an untrusted candidate through two phases:
//! validation, where any failed check rejects immediately, and sanitation,
//! which normalizes the accepted text and caps its row count. The guard
//! performs no I/O and keeps no state between calls.

use crate::analyzer::SqlAnalyzer;
use crate::error::{GuardError, Rejection};
use crate::policy::{
    restricted_column_pattern, DANGEROUS_KEYWORDS, LIMIT_CLAUSE, LIMIT_KEYWORD, MAX_ROW_LIMIT,
    SUSPICIOUS_PATTERNS, TABLE_REFERENCE, TRAILING_TERMINATORS,
};
use crate::result::SanitizedQuery;
use assetdesk_core::{GuardMode, SchemaDescriptor};
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Gatekeeper between candidate SQL and the execution engine.
#[derive(Debug, Clone)]
pub struct QueryGuard {
    schema: Arc<SchemaDescriptor>,
    restricted: Vec<(String, Regex)>,
    mode: GuardMode,
    analyzer: SqlAnalyzer,
}

impl QueryGuard {
    /// Build a guard over `schema` in textual mode.
    ///
    /// Restricted columns declared globally and on individual tables are
    /// both enforced.
    pub fn new(schema: Arc<SchemaDescriptor>) -> Result<Self, GuardError> {
        let mut columns: BTreeSet<String> = schema.restricted_columns().clone();
        for table in schema.tables() {
            columns.extend(table.restricted_columns.iter().map(|c| c.to_lowercase()));
        }

        let restricted = columns
            .into_iter()
            .map(|column| match restricted_column_pattern(&column) {
                Ok(re) => Ok((column, re)),
                Err(source) => Err(GuardError::InvalidPattern { column, source }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            schema,
            restricted,
            mode: GuardMode::default(),
            analyzer: SqlAnalyzer::new(),
        })
    }

    /// Set the checking mode.
    pub fn with_mode(mut self, mode: GuardMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> GuardMode {
        self.mode
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Validate and sanitize a candidate.
    pub fn process(&self, candidate: &str) -> Result<SanitizedQuery, Rejection> {
        if let Err(rejection) = self.validate(candidate) {
            warn!(
                kind = %rejection.kind,
                reason = %rejection.reason,
                "Rejected candidate query"
            );
            return Err(rejection);
        }

        let sanitized = self.sanitize(candidate);
        debug!(sql = %sanitized, "Accepted candidate query");
        Ok(SanitizedQuery::new(sanitized))
    }

    /// Run every validation check in order, stopping at the first failure.
    pub fn validate(&self, candidate: &str) -> Result<(), Rejection> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(Rejection::invalid_input());
        }

        let upper = trimmed.to_uppercase();
        self.check_leading_keyword(&upper)?;
        check_dangerous_keywords(&upper)?;
        check_single_statement(candidate)?;
        self.check_restricted_columns(candidate)?;
        self.check_tables(candidate)?;
        check_suspicious_patterns(candidate)?;

        if self.mode == GuardMode::Strict {
            self.analyzer.check(trimmed, &self.schema)?;
        }

        Ok(())
    }

    /// Normalize an already-validated candidate.
    ///
    /// Trailing terminators are stripped, a missing LIMIT is appended and a
    /// numeric LIMIT above the ceiling is rewritten down to it. Applying
    /// this twice yields the same text as applying it once.
    pub fn sanitize(&self, candidate: &str) -> String {
        let sql = TRAILING_TERMINATORS.replace(candidate.trim(), "");
        let outer = mask_nested(&sql);

        if !LIMIT_KEYWORD.is_match(&outer) {
            return format!("{} LIMIT {}", sql, MAX_ROW_LIMIT);
        }

        // Clause matches never overlap masked bytes, so offsets in `outer`
        // address the same text in `sql`.
        let mut rewritten = String::with_capacity(sql.len());
        let mut last = 0;
        for caps in LIMIT_CLAUSE.captures_iter(&outer) {
            let Some(clause) = caps.get(0) else { continue };
            rewritten.push_str(&sql[last..clause.start()]);
            rewritten.push_str(&clamp_limit(&caps));
            last = clause.end();
        }
        rewritten.push_str(&sql[last..]);
        rewritten
    }

    fn check_leading_keyword(&self, upper: &str) -> Result<(), Rejection> {
        let keyword = upper
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .next()
            .unwrap_or_default();

        if self.schema.allowed_operations().contains(keyword) {
            Ok(())
        } else {
            Err(Rejection::not_select())
        }
    }

    fn check_restricted_columns(&self, sql: &str) -> Result<(), Rejection> {
        match self.restricted.iter().find(|(_, re)| re.is_match(sql)) {
            Some((column, _)) => Err(Rejection::restricted_column(column)),
            None => Ok(()),
        }
    }

    fn check_tables(&self, sql: &str) -> Result<(), Rejection> {
        for caps in TABLE_REFERENCE.captures_iter(sql) {
            let table = caps[1].to_lowercase();
            if !self.schema.is_table_allowed(&table) {
                return Err(Rejection::disallowed_table(&table));
            }
        }
        Ok(())
    }
}

fn check_dangerous_keywords(upper: &str) -> Result<(), Rejection> {
    match DANGEROUS_KEYWORDS.iter().find(|token| upper.contains(*token)) {
        Some(token) => Err(Rejection::dangerous_keyword(token)),
        None => Ok(()),
    }
}

fn check_single_statement(sql: &str) -> Result<(), Rejection> {
    let statements = sql.split(';').filter(|s| !s.trim().is_empty()).count();
    if statements > 1 {
        Err(Rejection::multiple_statements())
    } else {
        Ok(())
    }
}

fn check_suspicious_patterns(sql: &str) -> Result<(), Rejection> {
    if SUSPICIOUS_PATTERNS.iter().any(|re| re.is_match(sql)) {
        Err(Rejection::suspicious_pattern())
    } else {
        Ok(())
    }
}

/// Copy of `sql` with quoted literals and parenthesized text replaced by
/// `#`, byte for byte. What remains visible is the statement's own top
/// level, so a LIMIT inside a string or a subquery is not its row cap.
fn mask_nested(sql: &str) -> String {
    let mut masked = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for c in sql.chars() {
        let hidden = match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                true
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    true
                }
                '(' => {
                    depth += 1;
                    true
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    true
                }
                _ => depth > 0,
            },
        };

        if hidden {
            masked.extend(std::iter::repeat_n('#', c.len_utf8()));
        } else {
            masked.push(c);
        }
    }
    masked
}

/// Rewrite the row count of one LIMIT clause if it exceeds the ceiling.
///
/// In `LIMIT offset, count` the second number is the count. Counts too
/// large to parse are treated as exceeding.
fn clamp_limit(caps: &Captures) -> String {
    let whole = &caps[0];
    let Some(count) = caps.get(2).or_else(|| caps.get(1)) else {
        return whole.to_string();
    };

    let exceeds = count
        .as_str()
        .parse::<u64>()
        .map_or(true, |n| n > MAX_ROW_LIMIT);
    if !exceeds {
        return whole.to_string();
    }

    let base = caps.get(0).map_or(0, |m| m.start());
    let (start, end) = (count.start() - base, count.end() - base);
    format!("{}{}{}", &whole[..start], MAX_ROW_LIMIT, &whole[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectionKind;
    use assetdesk_core::{ColumnDef, SchemaDefinition, TableDef};
    use pretty_assertions::assert_eq;

    fn guard() -> QueryGuard {
        QueryGuard::new(Arc::new(SchemaDescriptor::asset_inventory())).unwrap()
    }

    fn strict_guard() -> QueryGuard {
        guard().with_mode(GuardMode::Strict)
    }

    fn rejection(sql: &str) -> Rejection {
        guard().process(sql).unwrap_err()
    }

    #[test]
    fn test_accepts_allowed_queries() {
        let g = guard();
        for sql in [
            "SELECT * FROM assets",
            "select name, status from assets where status = 'available'",
            "SELECT a.name, c.name AS category FROM assets a JOIN categories c ON a.category_id = c.id",
            "SELECT COUNT(*) FROM transactions WHERE action_type = 'checkout'",
            "SELECT u.name, u.department FROM users u WHERE u.is_active = true",
            "  SELECT name FROM vendors ORDER BY name  ",
        ] {
            assert!(g.process(sql).is_ok(), "expected acceptance: {sql}");
        }
    }

    #[test]
    fn test_rejects_blank_input() {
        for sql in ["", "   ", "\n\t"] {
            let err = rejection(sql);
            assert_eq!(err.kind, RejectionKind::EmptyOrInvalidInput);
            assert_eq!(err.reason, "query invalid");
        }
    }

    #[test]
    fn test_restricted_column_any_case_or_qualifier() {
        for sql in [
            "SELECT password FROM users",
            "SELECT PASSWORD FROM users",
            "SELECT u.password FROM users u",
            "SELECT name FROM users WHERE refresh_token IS NOT NULL",
        ] {
            let err = rejection(sql);
            assert_eq!(err.kind, RejectionKind::RestrictedColumn, "{sql}");
        }
        assert_eq!(
            rejection("SELECT password FROM users").reason,
            "access to column 'password' is not allowed"
        );
    }

    #[test]
    fn test_restricted_column_word_boundary() {
        let definition = SchemaDefinition {
            tables: vec![
                TableDef::new("accounts", "Accounts")
                    .column(ColumnDef::new("password_policy", "TEXT", "Policy name"))
                    .column(ColumnDef::new("password", "TEXT", "Hash")),
            ],
            restricted_columns: vec!["password".into()],
            ..Default::default()
        };
        let g = QueryGuard::new(Arc::new(SchemaDescriptor::from_definition(definition))).unwrap();

        assert!(g.process("SELECT password_policy FROM accounts").is_ok());
        assert_eq!(
            g.process("SELECT password FROM accounts").unwrap_err().kind,
            RejectionKind::RestrictedColumn
        );
    }

    #[test]
    fn test_table_level_restriction_is_enforced() {
        let definition = SchemaDefinition {
            tables: vec![
                TableDef::new("staff", "Staff")
                    .column(ColumnDef::new("name", "TEXT", "Name"))
                    .column(ColumnDef::new("salary", "DECIMAL", "Salary"))
                    .restrict("Salary"),
            ],
            ..Default::default()
        };
        let g = QueryGuard::new(Arc::new(SchemaDescriptor::from_definition(definition))).unwrap();

        assert_eq!(
            g.process("SELECT salary FROM staff").unwrap_err().kind,
            RejectionKind::RestrictedColumn
        );
        assert!(g.process("SELECT name FROM staff").is_ok());
    }

    #[test]
    fn test_rejects_second_statement() {
        assert!(guard().process("SELECT * FROM assets; DROP TABLE assets").is_err());

        let err = rejection("SELECT * FROM assets; SELECT * FROM vendors");
        assert_eq!(err.kind, RejectionKind::MultipleStatements);
        assert_eq!(err.reason, "multiple statements are not allowed");
    }

    #[test]
    fn test_trailing_semicolons_are_one_statement() {
        let g = guard();
        let sanitized = g.process("SELECT * FROM assets;;  ").unwrap();
        assert_eq!(sanitized.as_str(), "SELECT * FROM assets LIMIT 100");
    }

    #[test]
    fn test_limit_injection() {
        let g = guard();
        assert_eq!(
            g.process("SELECT * FROM assets").unwrap().as_str(),
            "SELECT * FROM assets LIMIT 100"
        );
        assert_eq!(
            g.process("SELECT * FROM assets LIMIT 5000").unwrap().as_str(),
            "SELECT * FROM assets LIMIT 100"
        );
        assert_eq!(
            g.process("SELECT * FROM assets LIMIT 10").unwrap().as_str(),
            "SELECT * FROM assets LIMIT 10"
        );
    }

    #[test]
    fn test_limit_rewrite_forms() {
        let g = guard();
        assert_eq!(
            g.sanitize("SELECT * FROM assets limit 250 OFFSET 10"),
            "SELECT * FROM assets limit 100 OFFSET 10"
        );
        assert_eq!(
            g.sanitize("SELECT * FROM assets LIMIT 20, 500"),
            "SELECT * FROM assets LIMIT 20, 100"
        );
        assert_eq!(
            g.sanitize("SELECT * FROM assets LIMIT 500, 20"),
            "SELECT * FROM assets LIMIT 500, 20"
        );
        assert_eq!(
            g.sanitize("SELECT * FROM assets LIMIT 99999999999999999999999"),
            "SELECT * FROM assets LIMIT 100"
        );
        assert_eq!(
            g.sanitize("SELECT * FROM assets LIMIT 100"),
            "SELECT * FROM assets LIMIT 100"
        );
    }

    #[test]
    fn test_limit_keyword_inside_identifier_is_not_a_clause() {
        let g = guard();
        assert_eq!(
            g.sanitize("SELECT credit_limit FROM vendors"),
            "SELECT credit_limit FROM vendors LIMIT 100"
        );
    }

    #[test]
    fn test_limit_inside_literal_is_not_a_clause() {
        assert_eq!(
            guard()
                .process("SELECT * FROM assets WHERE notes = 'no limit'")
                .unwrap()
                .as_str(),
            "SELECT * FROM assets WHERE notes = 'no limit' LIMIT 100"
        );
    }

    #[test]
    fn test_subquery_limit_does_not_cap_outer_query() {
        let g = guard();
        assert_eq!(
            g.process("SELECT * FROM assets WHERE id IN (SELECT asset_id FROM transactions LIMIT 5)")
                .unwrap()
                .as_str(),
            "SELECT * FROM assets WHERE id IN (SELECT asset_id FROM transactions LIMIT 5) LIMIT 100"
        );
        assert_eq!(
            g.sanitize("SELECT * FROM (SELECT * FROM assets LIMIT 5000) a LIMIT 500"),
            "SELECT * FROM (SELECT * FROM assets LIMIT 5000) a LIMIT 100"
        );
    }

    #[test]
    fn test_mask_nested_keeps_offsets() {
        let sql = "SELECT 'é(' , (1) FROM t LIMIT 3";
        let masked = mask_nested(sql);
        assert_eq!(masked.len(), sql.len());
        assert_eq!(masked, "SELECT ##### , ### FROM t LIMIT 3");
    }

    #[test]
    fn test_every_dangerous_keyword_rejects() {
        // Tokens that contain an earlier entry are reported as that entry.
        let cases = [
            ("SELECT * FROM assets WHERE status = 'dropped'", "DROP"),
            ("SELECT deleted FROM assets", "DELETE"),
            ("SELECT updated_by FROM assets", "UPDATE"),
            ("SELECT inserted FROM assets", "INSERT"),
            ("SELECT alternate_name FROM assets", "ALTER"),
            ("SELECT created_by FROM assets", "CREATE"),
            ("SELECT TRUNCATE(purchase_price) FROM assets", "TRUNCATE"),
            ("SELECT REPLACE(name, 'a', 'b') FROM assets", "REPLACE"),
            ("SELECT granted FROM assets", "GRANT"),
            ("SELECT revoked FROM assets", "REVOKE"),
            ("SELECT * FROM assets WHERE name = 'exec'", "EXEC"),
            ("SELECT * FROM assets WHERE name = 'execute'", "EXEC"),
            ("SELECT name FROM assets UNION SELECT name FROM vendors", "UNION"),
            ("SELECT * FROM assets --", "--"),
            ("SELECT * FROM assets WHERE name = 'x';--", "--"),
            ("SELECT /* note FROM assets", "/*"),
            ("SELECT name FROM assets */", "*/"),
            ("SELECT @@version FROM assets", "@@"),
            ("SELECT * FROM assets WHERE name = @name", "@"),
            ("SELECT CHAR(65) FROM assets", "CHAR("),
            ("SELECT NCHAR(65) FROM assets", "CHAR("),
            ("SELECT CAST(name AS VARCHAR(10)) FROM assets", "CHAR("),
            ("SELECT CAST(name AS NVARCHAR(10)) FROM assets", "CHAR("),
            ("SELECT * FROM assets WAITFOR x", "WAITFOR"),
            ("SELECT delay_days FROM assets", "DELAY"),
            ("SELECT BENCHMARK(1000, 1) FROM assets", "BENCHMARK"),
            ("SELECT SLEEP(5) FROM assets", "SLEEP"),
            ("SELECT LOAD_FILE('/etc/hosts') FROM assets", "LOAD_FILE"),
            ("SELECT * FROM assets INTO OUTFILE '/tmp/a'", "INTO OUTFILE"),
            ("SELECT * FROM assets INTO DUMPFILE '/tmp/a'", "INTO DUMPFILE"),
        ];

        let reported: BTreeSet<&str> = cases.iter().map(|(_, token)| *token).collect();
        for token in DANGEROUS_KEYWORDS {
            let shadowed = DANGEROUS_KEYWORDS
                .iter()
                .take_while(|t| t != &token)
                .any(|earlier| token.contains(earlier));
            assert!(shadowed || reported.contains(token), "no case for {token}");
        }

        for (sql, token) in cases {
            let err = rejection(sql);
            assert_eq!(err.kind, RejectionKind::DangerousKeyword, "{sql}");
            assert_eq!(
                err.reason,
                format!("query contains a dangerous operation: {token}"),
                "{sql}"
            );
        }
    }

    #[test]
    fn test_comment_terminator_hits_denylist_first() {
        for sql in [
            "SELECT * FROM assets WHERE name = 'x';--",
            "SELECT * FROM assets WHERE name = 'x'; --",
        ] {
            let err = rejection(sql);
            assert_eq!(err.kind, RejectionKind::DangerousKeyword, "{sql}");
            assert_eq!(err.reason, "query contains a dangerous operation: --");
        }
    }

    #[test]
    fn test_every_suspicious_pattern_rejects() {
        let cases = [
            "SELECT * FROM assets WHERE name = 'x' OR '1'='1'",
            "SELECT * FROM assets WHERE name = 'x' OR 1=1",
            "SELECT * FROM assets WHERE id = 3 OR 1 = 1",
            "SELECT * FROM assets WHERE name = 'x'; --",
            "SELECT * FROM assets WHERE name = 'information_schema'",
            "SELECT * FROM assets WHERE name = 'mysql.user'",
            "SELECT * FROM assets WHERE name = 'sys.objects'",
            "SELECT * FROM assets WHERE name = 'pg_catalog'",
        ];
        assert_eq!(cases.len(), SUSPICIOUS_PATTERNS.len());

        for (pattern, sql) in SUSPICIOUS_PATTERNS.iter().zip(cases) {
            assert!(pattern.is_match(sql), "{pattern} vs {sql}");
        }

        // The `'; --` shape is stopped by the denylist before pattern checks.
        for (i, sql) in cases.iter().enumerate().filter(|(i, _)| *i != 3) {
            let err = rejection(sql);
            assert_eq!(err.kind, RejectionKind::SuspiciousPattern, "pattern {i}: {sql}");
            assert_eq!(err.reason, "query contains a suspicious pattern");
        }
    }

    #[test]
    fn test_rejects_non_select() {
        for sql in [
            "UPDATE assets SET status='retired'",
            "WITH x AS (SELECT 1) SELECT * FROM x",
            "EXPLAIN SELECT * FROM assets",
            "SELECTED FROM assets",
        ] {
            let err = rejection(sql);
            assert_eq!(err.kind, RejectionKind::NotSelectStatement, "{sql}");
            assert_eq!(err.reason, "only SELECT queries are allowed");
        }
    }

    #[test]
    fn test_dangerous_keyword_names_first_token() {
        let err = rejection("SELECT * FROM assets WHERE name = 'x' UNION SELECT * FROM users");
        assert_eq!(err.kind, RejectionKind::DangerousKeyword);
        assert_eq!(err.reason, "query contains a dangerous operation: UNION");

        let err = rejection("select * from assets -- trailing comment");
        assert_eq!(err.reason, "query contains a dangerous operation: --");

        let err = rejection("SELECT pg_sleep(5) FROM assets");
        assert_eq!(err.reason, "query contains a dangerous operation: SLEEP");

        let err = rejection("SELECT * FROM vendors WHERE email = 'a@b.c'");
        assert_eq!(err.reason, "query contains a dangerous operation: @");
    }

    #[test]
    fn test_dangerous_keyword_is_substring_match() {
        let err = rejection("SELECT updated_at FROM assets");
        assert_eq!(err.kind, RejectionKind::DangerousKeyword);
        assert_eq!(err.reason, "query contains a dangerous operation: UPDATE");
    }

    #[test]
    fn test_rejects_tautology() {
        for sql in [
            "SELECT * FROM assets WHERE '1'='1' OR '1'='1'",
            "SELECT * FROM assets WHERE name = '' OR 1=1",
            "SELECT * FROM assets WHERE id = 3 OR 1 = 1",
        ] {
            let err = rejection(sql);
            assert_eq!(err.kind, RejectionKind::SuspiciousPattern, "{sql}");
            assert_eq!(err.reason, "query contains a suspicious pattern");
        }
    }

    #[test]
    fn test_rejects_system_schemas() {
        assert!(guard().process("SELECT * FROM information_schema.tables").is_err());

        // Caught by the pattern check when the reference is not after FROM.
        let err = rejection("SELECT (SELECT 1 WHERE 'sys.objects' = 'x') AS probe FROM assets");
        assert_eq!(err.kind, RejectionKind::SuspiciousPattern);
    }

    #[test]
    fn test_rejects_disallowed_tables() {
        let err = rejection("SELECT * FROM secrets");
        assert_eq!(err.kind, RejectionKind::DisallowedTable);
        assert_eq!(err.reason, "table 'secrets' is not allowed");

        let err = rejection("SELECT * FROM assets a JOIN \"audit_log\" l ON l.asset_id = a.id");
        assert_eq!(err.reason, "table 'audit_log' is not allowed");

        let err = rejection("SELECT * FROM assets WHERE id IN (SELECT asset_id FROM payroll)");
        assert_eq!(err.reason, "table 'payroll' is not allowed");
    }

    #[test]
    fn test_table_names_compare_case_insensitively() {
        assert!(guard().process("SELECT * FROM Assets JOIN LOCATIONS ON 1 = 1").is_ok());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let g = guard();
        for sql in [
            "SELECT * FROM assets",
            "SELECT * FROM assets LIMIT 5000;",
            "  select name from vendors limit 7 ; ",
            "SELECT * FROM assets LIMIT 20, 900",
        ] {
            let once = g.process(sql).unwrap().into_string();
            let twice = g.process(&once).unwrap().into_string();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_accepted_queries_satisfy_invariants() {
        let g = guard();
        let sanitized = g
            .process("SELECT a.name FROM assets a JOIN locations l ON a.location_id = l.id LIMIT 1000")
            .unwrap();
        let sql = sanitized.as_str();

        assert!(sql.to_uppercase().starts_with("SELECT"));
        assert!(!sql.contains(';'));
        assert!(sql.ends_with("LIMIT 100"));
    }

    #[test]
    fn test_strict_mode_catches_comma_join() {
        let sql = "SELECT * FROM assets, secrets";
        assert!(guard().process(sql).is_ok());

        let err = strict_guard().process(sql).unwrap_err();
        assert_eq!(err.kind, RejectionKind::DisallowedTable);
        assert_eq!(err.reason, "table 'secrets' is not allowed");
    }

    #[test]
    fn test_strict_mode_accepts_ordinary_queries() {
        let g = strict_guard();
        let sanitized = g
            .process("SELECT c.name, COUNT(*) FROM assets a JOIN categories c ON a.category_id = c.id GROUP BY c.name")
            .unwrap();
        assert!(sanitized.as_str().ends_with("LIMIT 100"));
    }

    #[test]
    fn test_concurrent_use_shares_one_guard() {
        let g = Arc::new(guard());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let g = Arc::clone(&g);
                std::thread::spawn(move || {
                    let sql = format!("SELECT * FROM assets LIMIT {}", i * 50);
                    g.process(&sql).map(SanitizedQuery::into_string)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let expected = format!("SELECT * FROM assets LIMIT {}", (i * 50).min(100));
            assert_eq!(handle.join().unwrap().unwrap(), expected);
        }
    }
}
