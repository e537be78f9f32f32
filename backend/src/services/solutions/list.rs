use actix_web::{web, HttpResponse, Responder};

use crate::state::AppState;

pub async fn process(state: web::Data<AppState>) -> impl Responder {
    let store = state.store.read().await;
    HttpResponse::Ok().json(store.solutions())
}
