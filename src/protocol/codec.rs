//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Framing
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (4)  │         Payload             │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! ## Request Payload
//! ```text
//! cmd (i32) │ key (len+bytes) │ value (len+bytes) │ has_query (u8) [query]
//!           │ expiry (i64) │ name_vec (len+f32*) │ data_vec (len+f32*)
//!           │ has_sql (u8) [sql query]
//! ```
//!
//! ## Response Payload
//! ```text
//! success (u8) │ message (len+utf8) │ data (len+bytes) │ results (count+(len+bytes)*)
//!              │ has_stats (u8) [stats] │ has_sql (u8) [sql result]
//! ```
//!
//! A zero length means "absent" for key, value, vectors and data.

use std::io::{Read, Write};

use bytes::BufMut;

use crate::engine::{EngineStats, PutOptions};
use crate::error::{Result, SlabError};
use crate::query::SearchQuery;
use crate::record::NEVER_EXPIRES;
use crate::sql::{Row, SqlOperation, SqlQuery, SqlResult, SqlValue};
use crate::wire::{put_f32_vec, put_len_prefixed, Truncated, WireReader};

use super::{Command, CommandType, Response};

/// Length prefix size
pub const FRAME_HEADER_SIZE: usize = 4;

/// Maximum frame payload size (64 MB)
pub const MAX_FRAME_SIZE: u32 = 64 * 1024 * 1024;

/// Search query type ordinals
const SEARCH_EXACT: i32 = 0;
const SEARCH_MASK: i32 = 1;
const SEARCH_VECTOR: i32 = 2;

fn truncated(e: Truncated) -> SlabError {
    SlabError::Protocol(e.to_string())
}

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a command as a request payload (without the frame length)
pub fn encode_request(command: &Command) -> Vec<u8> {
    let empty: &[u8] = &[];
    let mut buf = Vec::new();
    buf.put_i32(command.command_type().code());

    let (key, value) = match command {
        Command::Put { key, value, .. } | Command::Update { key, value } => {
            (key.as_slice(), value.as_slice())
        }
        Command::Get { key } | Command::Delete { key } => (key.as_slice(), empty),
        _ => (empty, empty),
    };
    put_len_prefixed(&mut buf, key);
    put_len_prefixed(&mut buf, value);

    match command {
        Command::Find { query } => {
            buf.put_u8(1);
            encode_search_query(&mut buf, query);
        }
        _ => buf.put_u8(0),
    }

    match command {
        Command::Put { options, .. } => {
            buf.put_i64(options.expiry_time);
            put_f32_vec(&mut buf, &options.name_vector);
            put_f32_vec(&mut buf, options.data_vector.as_deref().unwrap_or(&[]));
        }
        _ => {
            buf.put_i64(NEVER_EXPIRES);
            put_f32_vec(&mut buf, &[]);
            put_f32_vec(&mut buf, &[]);
        }
    }

    match command {
        Command::Sql {
            query: Some(query), ..
        } => {
            buf.put_u8(1);
            encode_sql_query(&mut buf, query);
        }
        _ => buf.put_u8(0),
    }

    buf
}

/// Decode a request payload into a command
pub fn decode_request(bytes: &[u8]) -> Result<Command> {
    let mut reader = WireReader::new(bytes);

    let code = reader.i32("command").map_err(truncated)?;
    let command_type = CommandType::from_code(code)
        .ok_or_else(|| SlabError::Protocol(format!("Unknown command code: {}", code)))?;

    let key = reader.len_prefixed("key").map_err(truncated)?.to_vec();
    let value = reader.len_prefixed("value").map_err(truncated)?.to_vec();

    let search_query = if reader.bool("has_query").map_err(truncated)? {
        Some(decode_search_query(&mut reader)?)
    } else {
        None
    };

    let expiry_time = reader.i64("expiry_time").map_err(truncated)?;
    let name_vector = reader.f32_vec("name_vector").map_err(truncated)?;
    let data_vector = reader.f32_vec("data_vector").map_err(truncated)?;

    let sql_query = if reader.bool("has_sql").map_err(truncated)? {
        Some(decode_sql_query(&mut reader)?)
    } else {
        None
    };

    let command = match command_type {
        CommandType::Put => Command::Put {
            key,
            value,
            options: PutOptions {
                expiry_time,
                name_vector,
                data_vector: if data_vector.is_empty() {
                    None
                } else {
                    Some(data_vector)
                },
            },
        },
        CommandType::Get => Command::Get { key },
        CommandType::Update => Command::Update { key, value },
        CommandType::Delete => Command::Delete { key },
        CommandType::Find => Command::Find {
            query: search_query.ok_or_else(|| {
                SlabError::Protocol("FIND command: missing search query".to_string())
            })?,
        },
        CommandType::Ping => Command::Ping,
        CommandType::Stats => Command::Stats,
        sql => Command::Sql {
            command: sql,
            query: sql_query,
        },
    };
    Ok(command)
}

fn encode_search_query(buf: &mut Vec<u8>, query: &SearchQuery) {
    let empty: &[u8] = &[];
    match query {
        SearchQuery::Exact { key } => {
            buf.put_i32(SEARCH_EXACT);
            put_len_prefixed(buf, key);
            put_len_prefixed(buf, empty);
            put_f32_vec(buf, &[]);
            buf.put_f64(0.0);
        }
        SearchQuery::Mask { mask } => {
            buf.put_i32(SEARCH_MASK);
            put_len_prefixed(buf, empty);
            put_len_prefixed(buf, mask);
            put_f32_vec(buf, &[]);
            buf.put_f64(0.0);
        }
        SearchQuery::Vector { vector, threshold } => {
            buf.put_i32(SEARCH_VECTOR);
            put_len_prefixed(buf, empty);
            put_len_prefixed(buf, empty);
            put_f32_vec(buf, vector);
            buf.put_f64(*threshold);
        }
    }
    // Search node (unused)
    put_len_prefixed(buf, empty);
}

fn decode_search_query(reader: &mut WireReader<'_>) -> Result<SearchQuery> {
    let kind = reader.i32("search type").map_err(truncated)?;
    let key = reader.len_prefixed("search key").map_err(truncated)?.to_vec();
    let mask = reader.len_prefixed("search mask").map_err(truncated)?.to_vec();
    let vector = reader.f32_vec("search vector").map_err(truncated)?;
    let threshold = reader.f64("similarity threshold").map_err(truncated)?;
    let _node = reader.len_prefixed("search node").map_err(truncated)?;

    match kind {
        SEARCH_EXACT => Ok(SearchQuery::Exact { key }),
        SEARCH_MASK => Ok(SearchQuery::Mask { mask }),
        SEARCH_VECTOR => Ok(SearchQuery::Vector { vector, threshold }),
        other => Err(SlabError::Protocol(format!("Unknown search type: {}", other))),
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response payload (without the frame length)
pub fn encode_response(response: &Response) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.put_u8(response.success as u8);
    put_len_prefixed(&mut buf, response.message.as_bytes());
    put_len_prefixed(&mut buf, response.data.as_deref().unwrap_or(&[]));

    buf.put_u32(response.results.len() as u32);
    for result in &response.results {
        put_len_prefixed(&mut buf, result);
    }

    match &response.stats {
        Some(stats) => {
            buf.put_u8(1);
            buf.put_i32(stats.index_size as i32);
            buf.put_i64(stats.file_size as i64);
            buf.put_i32(stats.free_blocks as i32);
            buf.put_i64(stats.free_bytes as i64);
            buf.put_i64(stats.used_memory as i64);
            buf.put_i64(stats.max_memory as i64);
            buf.put_f64(stats.memory_ratio);
            buf.put_i32(stats.cache_size as i32);
        }
        None => buf.put_u8(0),
    }

    match &response.sql_result {
        Some(result) => {
            buf.put_u8(1);
            encode_sql_result(&mut buf, result);
        }
        None => buf.put_u8(0),
    }

    buf
}

/// Decode a response payload
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let mut reader = WireReader::new(bytes);

    let success = reader.bool("success").map_err(truncated)?;
    let message = read_string(&mut reader, "message")?;

    let data = reader.len_prefixed("data").map_err(truncated)?;
    let data = if data.is_empty() { None } else { Some(data.to_vec()) };

    let count = reader.u32("result count").map_err(truncated)?;
    let mut results = Vec::new();
    for _ in 0..count {
        results.push(reader.len_prefixed("result").map_err(truncated)?.to_vec());
    }

    let stats = if reader.bool("has_stats").map_err(truncated)? {
        Some(EngineStats {
            index_size: reader.i32("index_size").map_err(truncated)?.max(0) as usize,
            file_size: reader.i64("file_size").map_err(truncated)?.max(0) as u64,
            free_blocks: reader.i32("free_blocks").map_err(truncated)?.max(0) as usize,
            free_bytes: reader.i64("free_bytes").map_err(truncated)?.max(0) as u64,
            used_memory: reader.i64("used_memory").map_err(truncated)?.max(0) as u64,
            max_memory: reader.i64("max_memory").map_err(truncated)?.max(0) as u64,
            memory_ratio: reader.f64("memory_ratio").map_err(truncated)?,
            cache_size: reader.i32("cache_size").map_err(truncated)?.max(0) as usize,
        })
    } else {
        None
    };

    let sql_result = if reader.bool("has_sql").map_err(truncated)? {
        Some(decode_sql_result(&mut reader)?)
    } else {
        None
    };

    Ok(Response {
        success,
        message,
        data,
        results,
        stats,
        sql_result,
    })
}

// =============================================================================
// SQL Blocks
// =============================================================================

fn encode_sql_query(buf: &mut Vec<u8>, query: &SqlQuery) {
    buf.put_i32(query.operation.ordinal());
    put_len_prefixed(buf, query.table.as_deref().unwrap_or("").as_bytes());

    encode_pairs(buf, &query.values);
    encode_pairs(buf, &query.where_conditions);

    buf.put_u32(query.columns.len() as u32);
    for column in &query.columns {
        put_len_prefixed(buf, column.as_bytes());
    }

    buf.put_u32(query.schema.len() as u32);
    for (column, data_type) in &query.schema {
        put_len_prefixed(buf, column.as_bytes());
        put_len_prefixed(buf, data_type.as_bytes());
    }
}

fn decode_sql_query(reader: &mut WireReader<'_>) -> Result<SqlQuery> {
    let ordinal = reader.i32("sql operation").map_err(truncated)?;
    let operation = SqlOperation::from_ordinal(ordinal)
        .ok_or_else(|| SlabError::Protocol(format!("Unknown SQL operation: {}", ordinal)))?;

    let table = read_string(reader, "table name")?;
    let table = if table.is_empty() { None } else { Some(table) };
    let mut builder = SqlQuery::builder(operation, table);

    for (column, value) in decode_pairs(reader)? {
        builder = builder.value(column, value);
    }
    for (column, value) in decode_pairs(reader)? {
        builder = builder.where_eq(column, value);
    }

    let count = reader.u32("column count").map_err(truncated)?;
    for _ in 0..count {
        builder = builder.select_column(read_string(reader, "column")?);
    }

    let count = reader.u32("schema count").map_err(truncated)?;
    for _ in 0..count {
        let column = read_string(reader, "schema column")?;
        let data_type = read_string(reader, "schema type")?;
        builder = builder.column(column, data_type);
    }

    builder
        .build()
        .map_err(|e| SlabError::Protocol(e.to_string()))
}

fn encode_sql_result(buf: &mut Vec<u8>, result: &SqlResult) {
    buf.put_u8(result.success as u8);
    put_len_prefixed(buf, result.message.as_bytes());

    buf.put_u32(result.rows.len() as u32);
    for row in &result.rows {
        encode_pairs(buf, row);
    }

    buf.put_i32(result.affected_rows);

    buf.put_u32(result.columns.len() as u32);
    for column in &result.columns {
        put_len_prefixed(buf, column.as_bytes());
    }
}

fn decode_sql_result(reader: &mut WireReader<'_>) -> Result<SqlResult> {
    let success = reader.bool("sql success").map_err(truncated)?;
    let message = read_string(reader, "sql message")?;

    let count = reader.u32("row count").map_err(truncated)?;
    let mut rows: Vec<Row> = Vec::new();
    for _ in 0..count {
        rows.push(decode_pairs(reader)?);
    }

    let affected_rows = reader.i32("affected rows").map_err(truncated)?;

    let count = reader.u32("column count").map_err(truncated)?;
    let mut columns = Vec::new();
    for _ in 0..count {
        columns.push(read_string(reader, "column")?);
    }

    Ok(SqlResult {
        success,
        message,
        rows,
        affected_rows,
        columns,
    })
}

fn encode_pairs(buf: &mut Vec<u8>, pairs: &[(String, SqlValue)]) {
    buf.put_u32(pairs.len() as u32);
    for (name, value) in pairs {
        put_len_prefixed(buf, name.as_bytes());
        encode_value(buf, value);
    }
}

fn decode_pairs(reader: &mut WireReader<'_>) -> Result<Vec<(String, SqlValue)>> {
    let count = reader.u32("pair count").map_err(truncated)?;
    let mut pairs = Vec::new();
    for _ in 0..count {
        let name = read_string(reader, "column name")?;
        let value = decode_value(reader)?;
        pairs.push((name, value));
    }
    Ok(pairs)
}

fn encode_value(buf: &mut Vec<u8>, value: &SqlValue) {
    buf.put_i32(value.type_tag());
    match value {
        SqlValue::Null => {}
        SqlValue::String(s) => put_len_prefixed(buf, s.as_bytes()),
        SqlValue::Int(v) => buf.put_i32(*v),
        SqlValue::Long(v) => buf.put_i64(*v),
        SqlValue::Double(v) => buf.put_f64(*v),
        SqlValue::Bool(v) => buf.put_u8(*v as u8),
    }
}

fn decode_value(reader: &mut WireReader<'_>) -> Result<SqlValue> {
    let tag = reader.i32("value type").map_err(truncated)?;
    let value = match tag {
        SqlValue::TAG_NULL => SqlValue::Null,
        SqlValue::TAG_STRING => SqlValue::String(read_string(reader, "string value")?),
        SqlValue::TAG_INT => SqlValue::Int(reader.i32("int value").map_err(truncated)?),
        SqlValue::TAG_LONG => SqlValue::Long(reader.i64("long value").map_err(truncated)?),
        SqlValue::TAG_DOUBLE => SqlValue::Double(reader.f64("double value").map_err(truncated)?),
        SqlValue::TAG_BOOL => SqlValue::Bool(reader.bool("bool value").map_err(truncated)?),
        other => return Err(SlabError::Protocol(format!("Unknown value type: {}", other))),
    };
    Ok(value)
}

fn read_string(reader: &mut WireReader<'_>, field: &'static str) -> Result<String> {
    let bytes = reader.len_prefixed(field).map_err(truncated)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| SlabError::Protocol(format!("{} is not valid UTF-8: {}", field, e)))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one length-prefixed frame
///
/// Blocks until a complete frame is received or an error occurs.
/// A zero length yields an empty payload, which ends the session.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; FRAME_HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let len = u32::from_be_bytes(header);
    if len == 0 {
        return Ok(Vec::new());
    }
    if len > MAX_FRAME_SIZE {
        return Err(SlabError::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            len, MAX_FRAME_SIZE
        )));
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

/// Write one length-prefixed frame and flush
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_FRAME_SIZE as usize {
        return Err(SlabError::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            payload.len(),
            MAX_FRAME_SIZE
        )));
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete command from a stream
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let frame = read_frame(reader)?;
    decode_request(&frame)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    write_frame(writer, &encode_request(command))
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let frame = read_frame(reader)?;
    decode_response(&frame)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_frame(writer, &encode_response(response))
}
