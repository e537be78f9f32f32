//! Screening server library: record store, CSV ingest, evaluation gateway and
//! the HTTP API. `main.rs` wires these together; integration tests build the
//! same `App` against an in-memory store.

pub mod config;
pub mod gateway;
pub mod ingest;
pub mod rate_limiter;
pub mod services;
pub mod state;
pub mod store;
