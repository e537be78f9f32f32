//! Types and client-side workflows shared by the screener backend and the
//! browser frontend.
//!
//! - `model`: accounts, solution records and evaluation records as they
//!   travel over the HTTP API.
//! - `requests` / `responses`: request and response bodies of the API.
//! - `batch`: the sequential batch-evaluation driver and the results export.

pub mod batch;
pub mod model;
pub mod requests;
pub mod responses;
