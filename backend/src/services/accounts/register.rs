use actix_web::{web, HttpResponse, Responder};
use common::requests::RegisterRequest;
use common::responses::{ErrorBody, RegisteredAccount};
use log::info;

use crate::state::AppState;
use crate::store::StoreError;

pub async fn process(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> impl Responder {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorBody::new("Both 'username' and 'password' are required"));
    }

    match state.store.write().await.create_account(username, &body.password) {
        Ok(account) => {
            info!("Registered account {} ({})", account.id, account.username);
            HttpResponse::Created().json(RegisteredAccount {
                id: account.id,
                username: account.username,
            })
        }
        Err(e @ StoreError::UsernameTaken(_)) => {
            HttpResponse::Conflict().json(ErrorBody::new(e.to_string()))
        }
    }
}
