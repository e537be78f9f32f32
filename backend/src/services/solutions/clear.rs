use actix_web::{web, HttpResponse, Responder};
use common::responses::MessageBody;
use log::info;

use crate::state::AppState;

pub async fn process(state: web::Data<AppState>) -> impl Responder {
    let mut store = state.store.write().await;
    let removed = store.solutions().len();
    store.clear_solutions();
    info!("Cleared {} solutions", removed);
    HttpResponse::Ok().json(MessageBody {
        message: format!("Removed {} solutions", removed),
    })
}
