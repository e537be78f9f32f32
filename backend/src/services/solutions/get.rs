use actix_web::{web, HttpResponse, Responder};
use common::responses::ErrorBody;

use crate::state::AppState;

pub async fn process(solution_id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let solution_id = solution_id.into_inner();
    let store = state.store.read().await;
    match store.solution_by_key(&solution_id) {
        Some(solution) => HttpResponse::Ok().json(solution),
        None => HttpResponse::NotFound()
            .json(ErrorBody::new(format!("Solution '{}' not found", solution_id))),
    }
}
