//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB and an in-memory map for the KeyValueStore port
//! - Blocking reqwest client for the UserApi port
//! - System and manual clocks for the Clock port
//! - Mock users server and dataset generator for local runs and tests

pub mod clock;
pub mod duckdb;
pub mod generator;
pub mod http;
pub mod memory;
pub mod mock_server;
