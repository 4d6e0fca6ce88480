//! SQL result model

use super::SqlValue;

/// One result row as ordered `(column, value)` pairs
pub type Row = Vec<(String, SqlValue)>;

/// Outcome of [`SqlProcessor::execute`](super::SqlProcessor::execute)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlResult {
    pub success: bool,
    pub message: String,
    pub rows: Vec<Row>,
    pub affected_rows: i32,
    pub columns: Vec<String>,
}

impl SqlResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_affected_rows(mut self, affected: i32) -> Self {
        self.affected_rows = affected;
        self
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Value of `column` in row `row`, if both exist
    pub fn cell(&self, row: usize, column: &str) -> Option<&SqlValue> {
        self.rows
            .get(row)?
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}
