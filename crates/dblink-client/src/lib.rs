//! Synchronous client for the dblink database protocol.
//!
//! This is the "just works" layer: connect, execute queries, log in, close.
//! One client owns one connection and runs one request/response exchange at
//! a time; run concurrent queries with independent clients.
//!
//! ## Example
//!
//! ```ignore
//! use dblink_client::DbClient;
//!
//! let mut client = DbClient::connect("db.internal", 4450)?;
//! if client.login("root", "secret")? {
//!     let rows = client.execute("select * from t1;")?;
//!     println!("{rows}");
//! }
//! client.close();
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{DbClient, LoginReply};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{ClientError, Result};
