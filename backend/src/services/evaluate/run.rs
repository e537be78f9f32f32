use actix_web::http::header::RETRY_AFTER;
use actix_web::{web, HttpResponse};
use common::requests::EvaluateRequest;
use common::responses::{ErrorBody, RateLimitedBody};
use log::error;

use crate::gateway::GatewayError;
use crate::state::AppState;

/// Status mapping:
/// - 400 when `model` or `temperature` is missing;
/// - 404 when the solution is unknown;
/// - 503 when no provider credential was configured;
/// - 429 with `retryAfter` (and a `Retry-After` header) when rate limited;
/// - 500 with `{message, error}` for provider, parse and validation failures.
pub async fn process(
    solution_id: web::Path<String>,
    state: web::Data<AppState>,
    body: web::Json<EvaluateRequest>,
) -> HttpResponse {
    let solution_id = solution_id.into_inner();
    let body = body.into_inner();

    let model = body
        .model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());
    let (model, temperature) = match (model, body.temperature) {
        (Some(model), Some(temperature)) => (model.to_string(), temperature),
        _ => {
            return HttpResponse::BadRequest()
                .json(ErrorBody::new("Both 'model' and 'temperature' are required"))
        }
    };

    let solution = state.store.read().await.solution_by_key(&solution_id).cloned();
    let Some(solution) = solution else {
        return HttpResponse::NotFound()
            .json(ErrorBody::new(format!("Solution '{}' not found", solution_id)));
    };

    let Some(gateway) = state.gateway.as_ref() else {
        return HttpResponse::ServiceUnavailable().json(ErrorBody::new(
            "Evaluation is disabled: no model provider API key configured",
        ));
    };

    match gateway.evaluate(&solution, &model, temperature).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(GatewayError::RateLimited { retry_after_secs }) => HttpResponse::TooManyRequests()
            .insert_header((RETRY_AFTER, retry_after_secs.to_string()))
            .json(RateLimitedBody {
                message: format!(
                    "Too many evaluation requests, retry in {} seconds",
                    retry_after_secs
                ),
                retry_after: retry_after_secs,
            }),
        Err(e) => {
            error!("Evaluation of solution {} failed: {}", solution_id, e);
            HttpResponse::InternalServerError()
                .json(ErrorBody::with_error("Evaluation failed", e.to_string()))
        }
    }
}
