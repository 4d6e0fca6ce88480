//! Response definitions
//!
//! Represents responses to clients.

use crate::engine::EngineStats;
use crate::sql::SqlResult;

/// A response to send to a client
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    /// Whether the command succeeded
    pub success: bool,

    /// Human-readable status
    pub message: String,

    /// Value for GET
    pub data: Option<Vec<u8>>,

    /// Values for FIND
    pub results: Vec<Vec<u8>>,

    /// Figures for STATS
    pub stats: Option<EngineStats>,

    /// Outcome of a SQL command
    pub sql_result: Option<SqlResult>,
}

impl Response {
    /// Create a successful response
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Wrap a SQL result; success and message mirror the result
    pub fn from_sql(result: SqlResult) -> Self {
        Self {
            success: result.success,
            message: result.message.clone(),
            sql_result: Some(result),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_results(mut self, results: Vec<Vec<u8>>) -> Self {
        self.results = results;
        self
    }

    pub fn with_stats(mut self, stats: EngineStats) -> Self {
        self.stats = Some(stats);
        self
    }
}
