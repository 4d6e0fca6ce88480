//! SQL Module
//!
//! A schema registry that accepts table-shaped requests.
//!
//! ## Scope
//! Tables and their columns live only in memory. INSERT, UPDATE and DELETE
//! are validated against the schema and acknowledged, but no rows are
//! written to the engine and SELECT only ever returns rows for the `_tables`
//! system table.
//!
//! ## Operations
//! | Operation    | Ordinal |
//! |--------------|---------|
//! | SELECT       | 0       |
//! | INSERT       | 1       |
//! | UPDATE       | 2       |
//! | DELETE       | 3       |
//! | CREATE TABLE | 4       |
//! | DROP TABLE   | 5       |

mod processor;
mod query;
mod result;
mod value;

pub use processor::{SqlProcessor, SYSTEM_TABLES};
pub use query::{SqlOperation, SqlQuery, SqlQueryBuilder};
pub use result::{Row, SqlResult};
pub use value::SqlValue;
