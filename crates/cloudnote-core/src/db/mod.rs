//! libSQL database layer

mod connection;
mod migrations;
mod store;

pub use connection::{Database, Location, DEFAULT_REPLICA_SYNC_INTERVAL};
pub use store::LibSqlStore;
