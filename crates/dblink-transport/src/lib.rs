//! Blocking TCP transport for the dblink protocol stack.
//!
//! Owns a single TCP connection and provides the byte-exact primitives the
//! protocol layer builds on: send a whole buffer, receive an exact count,
//! with one configured timeout bounding every blocking operation.
//!
//! This is the lowest layer of dblink. Everything else builds on top of
//! the [`TcpConn`] type provided here.

pub mod conn;
pub mod error;

pub use conn::TcpConn;
pub use error::{Result, TransportError};
