//! Reviewer accounts. `POST /api/accounts/register` creates an account; there
//! is no login or session handling.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod register;

const API_PATH: &str = "/api/accounts";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/register", post().to(register::process))
}
