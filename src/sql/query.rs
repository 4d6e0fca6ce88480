//! SQL request model and builder

use crate::error::{Result, SlabError};

use super::SqlValue;

/// Operation kind; the discriminant is the wire ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SqlOperation {
    Select = 0,
    Insert = 1,
    Update = 2,
    Delete = 3,
    CreateTable = 4,
    DropTable = 5,
}

impl SqlOperation {
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        match ordinal {
            0 => Some(SqlOperation::Select),
            1 => Some(SqlOperation::Insert),
            2 => Some(SqlOperation::Update),
            3 => Some(SqlOperation::Delete),
            4 => Some(SqlOperation::CreateTable),
            5 => Some(SqlOperation::DropTable),
            _ => None,
        }
    }
}

/// A table-shaped request.
///
/// Name/value lists keep insertion order; setting a name twice replaces the
/// earlier value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub operation: SqlOperation,

    /// Required for everything except SELECT
    pub table: Option<String>,

    /// Column assignments (INSERT / UPDATE)
    pub values: Vec<(String, SqlValue)>,

    /// Equality conditions
    pub where_conditions: Vec<(String, SqlValue)>,

    /// Projection (SELECT); empty means all columns
    pub columns: Vec<String>,

    /// Column name -> type name (CREATE TABLE)
    pub schema: Vec<(String, String)>,
}

impl SqlQuery {
    pub fn select<I, S>(columns: I) -> SqlQueryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = SqlQueryBuilder::new(SqlOperation::Select, None);
        builder.columns = columns.into_iter().map(Into::into).collect();
        builder
    }

    pub fn insert(table: impl Into<String>) -> SqlQueryBuilder {
        SqlQueryBuilder::new(SqlOperation::Insert, Some(table.into()))
    }

    pub fn update(table: impl Into<String>) -> SqlQueryBuilder {
        SqlQueryBuilder::new(SqlOperation::Update, Some(table.into()))
    }

    pub fn delete(table: impl Into<String>) -> SqlQueryBuilder {
        SqlQueryBuilder::new(SqlOperation::Delete, Some(table.into()))
    }

    pub fn create_table(table: impl Into<String>) -> SqlQueryBuilder {
        SqlQueryBuilder::new(SqlOperation::CreateTable, Some(table.into()))
    }

    pub fn drop_table(table: impl Into<String>) -> SqlQueryBuilder {
        SqlQueryBuilder::new(SqlOperation::DropTable, Some(table.into()))
    }

    /// Start from an operation and optional table (used by the wire decoder)
    pub fn builder(operation: SqlOperation, table: Option<String>) -> SqlQueryBuilder {
        SqlQueryBuilder::new(operation, table)
    }
}

/// Builder for [`SqlQuery`]
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    operation: SqlOperation,
    table: Option<String>,
    values: Vec<(String, SqlValue)>,
    where_conditions: Vec<(String, SqlValue)>,
    columns: Vec<String>,
    schema: Vec<(String, String)>,
}

impl SqlQueryBuilder {
    fn new(operation: SqlOperation, table: Option<String>) -> Self {
        Self {
            operation,
            table,
            values: Vec::new(),
            where_conditions: Vec::new(),
            columns: Vec::new(),
            schema: Vec::new(),
        }
    }

    /// Set the table (the FROM of a SELECT)
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        upsert(&mut self.values, column.into(), value.into());
        self
    }

    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        upsert(&mut self.where_conditions, column.into(), value.into());
        self
    }

    /// Add a projected column
    pub fn select_column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Declare a column for CREATE TABLE
    pub fn column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        upsert(&mut self.schema, name.into(), data_type.into());
        self
    }

    pub fn build(self) -> Result<SqlQuery> {
        if self.operation != SqlOperation::Select && self.table.is_none() {
            return Err(SlabError::InvalidArgument(format!(
                "table name must be specified for {:?}",
                self.operation
            )));
        }

        Ok(SqlQuery {
            operation: self.operation,
            table: self.table,
            values: self.values,
            where_conditions: self.where_conditions,
            columns: self.columns,
            schema: self.schema,
        })
    }
}

fn upsert<V>(pairs: &mut Vec<(String, V)>, name: String, value: V) {
    match pairs.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = value,
        None => pairs.push((name, value)),
    }
}
