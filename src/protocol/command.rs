//! Command definitions
//!
//! Represents requests from clients.

use crate::engine::PutOptions;
use crate::query::SearchQuery;
use crate::sql::SqlQuery;

/// Command codes (4-byte, big-endian on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CommandType {
    Put = 1,
    Get = 2,
    Update = 3,
    Delete = 4,
    Find = 5,
    Ping = 6,
    Stats = 7,
    SqlExecute = 8,
    SqlQuery = 9,
    SqlCreateTable = 10,
    SqlDropTable = 11,
    SqlInsert = 12,
    SqlSelect = 13,
    SqlUpdate = 14,
    SqlDelete = 15,
    SqlCreateIndex = 16,
    SqlAddRelation = 17,
}

impl CommandType {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        let command = match code {
            1 => CommandType::Put,
            2 => CommandType::Get,
            3 => CommandType::Update,
            4 => CommandType::Delete,
            5 => CommandType::Find,
            6 => CommandType::Ping,
            7 => CommandType::Stats,
            8 => CommandType::SqlExecute,
            9 => CommandType::SqlQuery,
            10 => CommandType::SqlCreateTable,
            11 => CommandType::SqlDropTable,
            12 => CommandType::SqlInsert,
            13 => CommandType::SqlSelect,
            14 => CommandType::SqlUpdate,
            15 => CommandType::SqlDelete,
            16 => CommandType::SqlCreateIndex,
            17 => CommandType::SqlAddRelation,
            _ => return None,
        };
        Some(command)
    }

    /// True for the query-language family (codes 8..=17)
    pub fn is_sql(self) -> bool {
        self.code() >= CommandType::SqlExecute.code()
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Store a value
    Put {
        key: Vec<u8>,
        value: Vec<u8>,
        options: PutOptions,
    },

    /// Get a value by key
    Get { key: Vec<u8> },

    /// Replace the value of an existing key
    Update { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },

    /// Linear search over live records
    Find { query: SearchQuery },

    /// Ping (health check)
    Ping,

    /// Engine statistics
    Stats,

    /// Any SQL command; every code routes to the same processor
    Sql {
        command: CommandType,
        query: Option<SqlQuery>,
    },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Put { .. } => CommandType::Put,
            Command::Get { .. } => CommandType::Get,
            Command::Update { .. } => CommandType::Update,
            Command::Delete { .. } => CommandType::Delete,
            Command::Find { .. } => CommandType::Find,
            Command::Ping => CommandType::Ping,
            Command::Stats => CommandType::Stats,
            Command::Sql { command, .. } => *command,
        }
    }
}
