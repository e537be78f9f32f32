//! Solution records.
//!
//! Routes under `/api/solutions`:
//! - `GET ""`: every solution in insertion order.
//! - `DELETE ""`: drop all solutions and reset id assignment.
//! - `POST /upload`: multipart CSV upload (`file` field), upserted through the
//!   ingestion pipeline. The upload is spooled to a temp file that is removed
//!   whatever the outcome.
//! - `GET /{solution_id}`: one solution by its natural key, 404 if absent.

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

mod clear;
mod get;
mod list;
mod upload;

const API_PATH: &str = "/api/solutions";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", delete().to(clear::process))
        .route("/upload", post().to(upload::process))
        .route("/{solution_id}", get().to(get::process))
}
