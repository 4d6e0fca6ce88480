//! Blocking TCP client
//!
//! Speaks the framed protocol to a running server. Every call sends one
//! request frame and waits for exactly one response frame.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::engine::{EngineStats, PutOptions};
use crate::error::{Result, SlabError};
use crate::protocol::{read_response, write_command, Command, CommandType, Response};
use crate::query::SearchQuery;
use crate::sql::{SqlOperation, SqlQuery, SqlResult};

/// Message the server sends for a missing or expired key
pub const KEY_NOT_FOUND_MESSAGE: &str = "Key not found or expired";

pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| SlabError::Network(format!("Failed to connect: {}", e)))?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Apply a read/write timeout to every request
    pub fn set_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)?;
        Ok(())
    }

    /// Send a raw command and return the server's response
    pub fn send(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }

    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.put_with(key, value, PutOptions::default())
    }

    pub fn put_with(&mut self, key: &[u8], value: &[u8], options: PutOptions) -> Result<()> {
        let response = self.send(&Command::Put {
            key: key.to_vec(),
            value: value.to_vec(),
            options,
        })?;
        expect_success(response).map(|_| ())
    }

    /// Fetch a value; `None` when the key is missing or expired
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let response = self.send(&Command::Get { key: key.to_vec() })?;
        if response.success {
            return Ok(Some(response.data.unwrap_or_default()));
        }
        if response.message == KEY_NOT_FOUND_MESSAGE {
            return Ok(None);
        }
        Err(SlabError::Network(response.message))
    }

    pub fn update(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let response = self.send(&Command::Update {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        expect_success(response).map(|_| ())
    }

    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        let response = self.send(&Command::Delete { key: key.to_vec() })?;
        expect_success(response).map(|_| ())
    }

    pub fn find(&mut self, query: SearchQuery) -> Result<Vec<Vec<u8>>> {
        let response = self.send(&Command::Find { query })?;
        expect_success(response).map(|r| r.results)
    }

    pub fn ping(&mut self) -> Result<String> {
        let response = self.send(&Command::Ping)?;
        expect_success(response).map(|r| r.message)
    }

    pub fn stats(&mut self) -> Result<EngineStats> {
        let response = self.send(&Command::Stats)?;
        expect_success(response)?
            .stats
            .ok_or_else(|| SlabError::Protocol("STATS response carried no statistics".to_string()))
    }

    /// Run a SQL query; the returned result carries its own success flag
    pub fn sql(&mut self, query: SqlQuery) -> Result<SqlResult> {
        let command = sql_command_type(query.operation);
        let response = self.send(&Command::Sql {
            command,
            query: Some(query),
        })?;
        match response.sql_result {
            Some(result) => Ok(result),
            None => Err(SlabError::Network(response.message)),
        }
    }
}

fn expect_success(response: Response) -> Result<Response> {
    if response.success {
        Ok(response)
    } else {
        Err(SlabError::Network(response.message))
    }
}

fn sql_command_type(operation: SqlOperation) -> CommandType {
    match operation {
        SqlOperation::Select => CommandType::SqlSelect,
        SqlOperation::Insert => CommandType::SqlInsert,
        SqlOperation::Update => CommandType::SqlUpdate,
        SqlOperation::Delete => CommandType::SqlDelete,
        SqlOperation::CreateTable => CommandType::SqlCreateTable,
        SqlOperation::DropTable => CommandType::SqlDropTable,
    }
}
