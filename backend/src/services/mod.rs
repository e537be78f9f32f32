//! HTTP API of the screener.
//!
//! Each sub-module owns one resource and exposes a `configure_routes()` scope;
//! handlers live in their own files as `process` functions that translate the
//! domain result into an `HttpResponse`.
//!
//! - `solutions`: list, fetch, upload and clear solution records.
//! - `evaluate`: run the evaluation gateway for one solution.
//! - `evaluations`: evaluation history of a solution.
//! - `accounts`: reviewer registration.

pub mod accounts;
pub mod evaluate;
pub mod evaluations;
pub mod solutions;

use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use common::responses::ErrorBody;

/// Registers every API scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(solutions::configure_routes())
        .service(evaluate::configure_routes())
        .service(evaluations::configure_routes())
        .service(accounts::configure_routes());
}

/// JSON extractor settings; malformed bodies get the same `{message}` shape as
/// every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err, _req| {
            let body = ErrorBody::new(format!("Invalid request body: {err}"));
            let response = HttpResponse::BadRequest().json(body);
            InternalError::from_response(err, response).into()
        })
}
