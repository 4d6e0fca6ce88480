//! In-memory schema registry

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::record::now_epoch_millis;

use super::{Row, SqlOperation, SqlQuery, SqlResult, SqlValue};

/// Tables registered at startup; names starting with `_` are hidden from
/// the table listing
pub const SYSTEM_TABLES: &[&str] = &["_tables"];

/// Columns appended to every user table
const SYSTEM_COLUMNS: &[(&str, &str)] = &[
    ("_id", "STRING"),
    ("_created_at", "LONG"),
    ("_updated_at", "LONG"),
];

#[derive(Debug, Clone)]
struct TableSchema {
    columns: Vec<(String, String)>,
    created_at: u64,
}

impl TableSchema {
    fn new(columns: Vec<(String, String)>) -> Self {
        Self {
            columns,
            created_at: now_epoch_millis(),
        }
    }

    fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(n, _)| n.clone()).collect()
    }
}

/// Executes [`SqlQuery`] values against the registry
#[derive(Debug)]
pub struct SqlProcessor {
    tables: RwLock<BTreeMap<String, TableSchema>>,
}

impl SqlProcessor {
    pub fn new() -> Self {
        let mut tables = BTreeMap::new();
        tables.insert(
            "_tables".to_string(),
            TableSchema::new(vec![
                ("table_name".to_string(), "STRING".to_string()),
                ("created_at".to_string(), "LONG".to_string()),
                ("row_count".to_string(), "INT".to_string()),
            ]),
        );

        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Run one request. Failures come back as an unsuccessful result.
    pub fn execute(&self, query: &SqlQuery) -> SqlResult {
        tracing::debug!("SQL {:?} on {:?}", query.operation, query.table);

        match query.operation {
            SqlOperation::Select => self.select(query),
            SqlOperation::Insert => self.write_rows(query, "INSERT"),
            SqlOperation::Update => self.write_rows(query, "UPDATE"),
            SqlOperation::Delete => self.delete(query),
            SqlOperation::CreateTable => self.create_table(query),
            SqlOperation::DropTable => self.drop_table(query),
        }
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// All table names, system tables included
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// `(column, type)` pairs of `name`
    pub fn table_schema(&self, name: &str) -> Option<Vec<(String, String)>> {
        self.tables.read().get(name).map(|t| t.columns.clone())
    }

    fn select(&self, query: &SqlQuery) -> SqlResult {
        let table = match query.table.as_deref() {
            Some(table) => table,
            None => return self.list_tables(),
        };

        let tables = self.tables.read();
        let schema = match tables.get(table) {
            Some(schema) => schema,
            None => return SqlResult::error(format!("Table not found: {}", table)),
        };

        let rows: Vec<Row> = if table == "_tables" {
            tables
                .iter()
                .map(|(name, t)| {
                    vec![
                        ("table_name".to_string(), SqlValue::String(name.clone())),
                        ("created_at".to_string(), SqlValue::Long(t.created_at as i64)),
                        ("row_count".to_string(), SqlValue::Int(0)),
                    ]
                })
                .collect()
        } else {
            Vec::new()
        };

        let all_columns = query.columns.is_empty() || query.columns.iter().any(|c| c == "*");
        let columns = if all_columns {
            schema.column_names()
        } else {
            query.columns.clone()
        };

        SqlResult::ok("SELECT executed successfully")
            .with_rows(rows)
            .with_columns(columns)
    }

    fn list_tables(&self) -> SqlResult {
        let rows: Vec<Row> = self
            .tables
            .read()
            .keys()
            .filter(|name| !name.starts_with('_'))
            .map(|name| vec![("table_name".to_string(), SqlValue::String(name.clone()))])
            .collect();

        SqlResult::ok("Tables list retrieved")
            .with_rows(rows)
            .with_columns(vec!["table_name".to_string()])
    }

    /// INSERT and UPDATE: validate the assigned columns, acknowledge one row
    fn write_rows(&self, query: &SqlQuery, verb: &str) -> SqlResult {
        let tables = self.tables.read();
        let table = query.table.as_deref().unwrap_or_default();
        let schema = match tables.get(table) {
            Some(schema) => schema,
            None => return SqlResult::error(format!("Table not found: {}", table)),
        };

        if let Some((column, _)) = query.values.iter().find(|(c, _)| !schema.has_column(c)) {
            return SqlResult::error(format!("Column not found: {}", column));
        }

        SqlResult::ok(format!("{} executed successfully", verb)).with_affected_rows(1)
    }

    fn delete(&self, query: &SqlQuery) -> SqlResult {
        let table = query.table.as_deref().unwrap_or_default();
        if !self.table_exists(table) {
            return SqlResult::error(format!("Table not found: {}", table));
        }
        SqlResult::ok("DELETE executed successfully").with_affected_rows(1)
    }

    fn create_table(&self, query: &SqlQuery) -> SqlResult {
        let name = match query.table.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return SqlResult::error("Table name must be specified for CREATE TABLE"),
        };

        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return SqlResult::error(format!("Table already exists: {}", name));
        }

        let mut columns = query.schema.clone();
        for (column, data_type) in SYSTEM_COLUMNS {
            if !columns.iter().any(|(c, _)| c == column) {
                columns.push((column.to_string(), data_type.to_string()));
            }
        }
        tables.insert(name.to_string(), TableSchema::new(columns));

        tracing::info!("Created table {}", name);
        SqlResult::ok(format!("Table created successfully: {}", name))
    }

    fn drop_table(&self, query: &SqlQuery) -> SqlResult {
        let name = query.table.as_deref().unwrap_or_default();
        if SYSTEM_TABLES.contains(&name) {
            return SqlResult::error(format!("Cannot drop system table: {}", name));
        }
        if self.tables.write().remove(name).is_none() {
            return SqlResult::error(format!("Table not found: {}", name));
        }

        tracing::info!("Dropped table {}", name);
        SqlResult::ok(format!("Table dropped successfully: {}", name))
    }
}

impl Default for SqlProcessor {
    fn default() -> Self {
        Self::new()
    }
}
