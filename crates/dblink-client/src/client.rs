use bytes::BytesMut;
use serde::Deserialize;
use tracing::{debug, error};

use dblink_frame::{
    decode_chunk, decode_len, encode_query, hex_bytes, FrameError, ResponseAssembler,
    LEN_PREFIX_SIZE,
};
use dblink_transport::{TcpConn, TransportError};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Reply shape of a login exchange.
///
/// An absent `success` field reads as a denied login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub success: bool,
}

/// Synchronous client for the dblink database protocol.
///
/// One client owns one TCP connection and runs one request/response
/// exchange at a time. There is no pipelining and no internal locking;
/// concurrent queries need independent clients, each with its own
/// connection.
pub struct DbClient {
    conn: TcpConn,
    config: ClientConfig,
}

impl DbClient {
    /// Connect with default configuration.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        Self::connect_with_config(host, port, ClientConfig::default())
    }

    /// Connect with explicit configuration.
    pub fn connect_with_config(host: &str, port: u16, config: ClientConfig) -> Result<Self> {
        let conn =
            TcpConn::connect(host, port, config.timeout).map_err(ClientError::Connect)?;
        Ok(Self { conn, config })
    }

    /// Execute a query and return the assembled response text.
    pub fn execute_raw(&mut self, query: &str) -> Result<String> {
        self.send_query(query)?;
        self.read_response()
    }

    /// Execute a query and parse the assembled response as JSON.
    pub fn execute(&mut self, query: &str) -> Result<serde_json::Value> {
        let text = self.execute_raw(query)?;
        serde_json::from_str(&text).map_err(|err| {
            error!(raw = %text, "response is not valid JSON");
            ClientError::Json(err)
        })
    }

    /// Authenticate as `account`.
    ///
    /// Submits `"<account>/<password>"` as a structured query and returns
    /// the reply's `success` field; a reply without the field is a denial.
    /// The password is never logged.
    pub fn login(&mut self, account: &str, password: &str) -> Result<bool> {
        let value = self.execute(&format!("{account}/{password}"))?;
        let reply: LoginReply = serde_json::from_value(value)?;
        debug!(account, success = reply.success, "login");
        Ok(reply.success)
    }

    /// Close the connection. Safe to call any number of times.
    pub fn close(&mut self) {
        self.conn.close();
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn send_query(&mut self, query: &str) -> Result<()> {
        let mut wire = BytesMut::new();
        encode_query(query, &mut wire);
        self.conn
            .send_all(&wire)
            .map_err(|err| self.classify_send(err))
    }

    /// Drive the receive loop: length prefix, chunk payload, accumulate,
    /// until the assembled tail carries the terminator.
    fn read_response(&mut self) -> Result<String> {
        let mut assembler = ResponseAssembler::new();
        loop {
            let prefix = match self.conn.recv_exact(LEN_PREFIX_SIZE) {
                Ok(bytes) => bytes,
                Err(err) => return Err(self.abandon(err, &assembler)),
            };
            let mut len_bytes = [0u8; LEN_PREFIX_SIZE];
            len_bytes.copy_from_slice(&prefix);
            let len = match decode_len(len_bytes, self.config.max_chunk_size) {
                Ok(len) => len,
                Err(err) => return Err(abandon_frame(err, &assembler)),
            };

            let payload = match self.conn.recv_exact(len) {
                Ok(bytes) => bytes,
                Err(err) => return Err(self.abandon(err, &assembler)),
            };
            let chunk = match decode_chunk(&payload) {
                Ok(text) => text,
                Err(err) => {
                    error!(payload = %hex_bytes(&payload), "chunk failed to decode");
                    return Err(abandon_frame(err, &assembler));
                }
            };

            if assembler.push(chunk) {
                return Ok(assembler.finish());
            }
        }
    }

    fn classify_send(&self, err: TransportError) -> ClientError {
        match err {
            TransportError::TimedOut { .. } => ClientError::TimedOut(self.config.timeout),
            other => ClientError::ConnectionLost(other),
        }
    }

    /// Give up on a partially-assembled response, logging whatever text had
    /// accumulated before the transport failed.
    fn abandon(&self, err: TransportError, assembler: &ResponseAssembler) -> ClientError {
        error!(partial = %assembler.partial(), %err, "abandoning response");
        match err {
            TransportError::TimedOut { .. } => ClientError::TimedOut(self.config.timeout),
            err @ TransportError::Closed { .. } => ClientError::Disconnected(err),
            other => ClientError::ConnectionLost(other),
        }
    }
}

fn abandon_frame(err: FrameError, assembler: &ResponseAssembler) -> ClientError {
    error!(partial = %assembler.partial(), %err, "abandoning response");
    ClientError::Frame(err)
}

impl std::fmt::Debug for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbClient")
            .field("conn", &self.conn)
            .field("config", &self.config)
            .finish()
    }
}
