//! An in-memory Redis-compatible server.
//!
//! Supports:
//!
//! - String operations (GET, SET with PX/EX expiry, INCR, DEL)
//! - List operations (LPUSH, RPUSH, LPOP, BLPOP, LRANGE, LLEN)
//! - Stream operations (XADD, XRANGE)
//! - Server commands (PING, ECHO, TYPE)
//!
//! Clients speak the Redis Serialization Protocol (RESP). Each connection runs
//! on its own Tokio task; the keyspace and the clients blocked in BLPOP share
//! a single [`database::Database`] behind one lock.

pub mod commands;
pub mod connection;
pub mod database;
pub mod input;
pub mod key_value_store;
pub mod resp;
pub mod server;
pub mod state;
