//! `POST /api/evaluate/{solution_id}`: runs the evaluation gateway for one
//! solution with the model and temperature given in the body.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod run;

const API_PATH: &str = "/api/evaluate";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{solution_id}", post().to(run::process))
}
