//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (Length-Prefixed Binary, Big-Endian)
//!
//! Every request and response travels as `[len: u32][payload]`. The payload
//! layouts are documented in [`codec`](self::codec).
//!
//! ### Commands
//! | Code | Command          | Code | Command            |
//! |------|------------------|------|--------------------|
//! | 1    | PUT              | 10   | SQL_CREATE_TABLE   |
//! | 2    | GET              | 11   | SQL_DROP_TABLE     |
//! | 3    | UPDATE           | 12   | SQL_INSERT         |
//! | 4    | DELETE           | 13   | SQL_SELECT         |
//! | 5    | FIND             | 14   | SQL_UPDATE         |
//! | 6    | PING             | 15   | SQL_DELETE         |
//! | 7    | STATS            | 16   | SQL_CREATE_INDEX   |
//! | 8    | SQL_EXECUTE      | 17   | SQL_ADD_RELATION   |
//! | 9    | SQL_QUERY        |      |                    |
//!
//! Every SQL code carries an embedded query block and is routed to the same
//! processor.

pub mod codec;
mod command;
mod response;

pub use codec::{
    decode_request, decode_response, encode_request, encode_response, read_command, read_frame,
    read_response, write_command, write_frame, write_response, MAX_FRAME_SIZE,
};
pub use command::{Command, CommandType};
pub use response::Response;
