//! Sparkify ETL library
//!
//! Loads JSON-lines song and listening-log files into a SQLite star schema. The binary
//! is a thin wrapper around [`etl::run`]; the modules are exposed for testing.

pub mod config;
pub mod etl;
pub mod sqlite_persistence;
pub mod warehouse;

pub use etl::{run, EtlError, RunSummary};
pub use warehouse::{Statements, Warehouse};
