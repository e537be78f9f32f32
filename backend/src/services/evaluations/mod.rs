//! `GET /api/evaluations/{solution_id}`: evaluation history of a solution,
//! oldest first. Unknown solutions simply have an empty history.

use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Responder, Scope};

use crate::state::AppState;

const API_PATH: &str = "/api/evaluations";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{solution_id}", get().to(history))
}

async fn history(solution_id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let history = state.store.read().await.evaluations_for(&solution_id);
    HttpResponse::Ok().json(history)
}
