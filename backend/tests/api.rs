use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::http::header::{ContentType, RETRY_AFTER};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use backend::gateway::provider::{CompletionRequest, LlmClient, ProviderError};
use backend::gateway::{EvaluationGateway, GatewayConfig};
use backend::services;
use backend::state::AppState;
use backend::store::{RecordStore, SharedStore};
use common::model::evaluation::{EvaluationRecord, EvaluationResponse, Verdict};
use common::model::solution::{SolutionFields, SolutionInput, SolutionRecord};
use common::requests::{evaluate_path, evaluations_path, solution_path, EvaluateRequest};
use common::responses::{ErrorBody, RateLimitedBody, RegisteredAccount, UploadSummary};
use serde_json::json;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(services::configure),
        )
        .await
    };
}

struct CannedClient {
    outputs: Mutex<VecDeque<String>>,
}

#[async_trait]
impl LlmClient for CannedClient {
    async fn complete(&self, _request: &CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::EmptyResponse("no canned output left".into()))
    }

    fn provider_name(&self) -> &'static str {
        "canned"
    }
}

fn evaluation_output(results: [&str; 5], overall: &str) -> String {
    let criteria: Vec<_> = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            json!({
                "id": i + 1,
                "name": format!("Criterion {}", i + 1),
                "result": r,
                "reasoning": "ok",
            })
        })
        .collect();
    format!(
        "Here you go:\n```json\n{}\n```",
        json!({ "criteria": criteria, "overallVerdict": overall })
    )
}

async fn seeded_store() -> SharedStore {
    let store = RecordStore::new().shared();
    {
        let mut guard = store.write().await;
        for key in ["SOL-1", "SOL-2"] {
            guard.upsert_solution(SolutionInput {
                solution_id: key.to_string(),
                fields: SolutionFields {
                    challenge_name: Some("Clean Water".to_string()),
                    ..SolutionFields::default()
                },
            });
        }
    }
    store
}

fn state_with(store: SharedStore, outputs: Vec<String>, config: GatewayConfig) -> AppState {
    let client = Arc::new(CannedClient {
        outputs: Mutex::new(outputs.into()),
    });
    let gateway = EvaluationGateway::new(client, store.clone(), config);
    AppState::new(store, Some(gateway))
}

fn multipart_upload(csv: &str) -> (String, Vec<u8>) {
    let boundary = "----screener-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"solutions.csv\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = boundary,
        csv = csv
    );
    (
        format!("multipart/form-data; boundary={}", boundary),
        body.into_bytes(),
    )
}

#[actix_web::test]
async fn lists_and_fetches_solutions() {
    let state = AppState::new(seeded_store().await, None);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/solutions").to_request();
    let list: Vec<SolutionRecord> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].solution_id, "SOL-1");

    let req = test::TestRequest::get().uri("/api/solutions/SOL-2").to_request();
    let one: SolutionRecord = test::call_and_read_body_json(&app, req).await;
    assert_eq!(one.id, 2);
    assert_eq!(one.fields.challenge_name.as_deref(), Some("Clean Water"));

    let req = test::TestRequest::get().uri("/api/solutions/NOPE").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert!(body.message.contains("NOPE"));
}

#[actix_web::test]
async fn upload_upserts_by_solution_id() {
    let state = AppState::new(seeded_store().await, None);
    let app = app!(state);

    let csv = "Solution ID,Challenge Name,Team Size\nSOL-1,Air Quality,4\nSOL-3,Clean Water,2\nSOL-3,Ignored,9\n,No key,1\n";
    let (content_type, body) = multipart_upload(csv);
    let req = test::TestRequest::post()
        .uri("/api/solutions/upload")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: UploadSummary = test::read_body_json(resp).await;
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.skipped, 1);

    let store = state.store.read().await;
    assert_eq!(store.solutions().len(), 3);
    let updated = store.solution_by_key("SOL-1").unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.fields.challenge_name.as_deref(), Some("Air Quality"));
    assert_eq!(updated.fields.team_size.as_deref(), Some("4"));
    let added = store.solution_by_key("SOL-3").unwrap();
    assert_eq!(added.fields.challenge_name.as_deref(), Some("Clean Water"));
}

#[actix_web::test]
async fn upload_without_key_column_is_rejected() {
    let state = AppState::new(RecordStore::new().shared(), None);
    let app = app!(state);

    let (content_type, body) = multipart_upload("Name,Team Size\nA,3\n");
    let req = test::TestRequest::post()
        .uri("/api/solutions/upload")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(state.store.read().await.solutions().is_empty());
}

#[actix_web::test]
async fn clear_removes_all_solutions() {
    let state = AppState::new(seeded_store().await, None);
    let app = app!(state);

    let req = test::TestRequest::delete().uri("/api/solutions").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/solutions").to_request();
    let list: Vec<SolutionRecord> = test::call_and_read_body_json(&app, req).await;
    assert!(list.is_empty());
}

#[actix_web::test]
async fn evaluate_validates_input_before_calling_the_model() {
    let store = seeded_store().await;
    let state = state_with(store, vec![], GatewayConfig::default());
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/SOL-1")
        .set_json(json!({ "temperature": 0.2 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/SOL-1")
        .set_json(json!({ "model": "gemini-1.5-flash" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/MISSING")
        .set_json(EvaluateRequest::new("gemini-1.5-flash", 0.2))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_json_body_gets_error_body() {
    let state = AppState::new(seeded_store().await, None);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/SOL-1")
        .insert_header(ContentType::json())
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert!(body.message.starts_with("Invalid request body"));
}

#[actix_web::test]
async fn evaluate_without_provider_is_unavailable() {
    let state = AppState::new(seeded_store().await, None);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/SOL-1")
        .set_json(EvaluateRequest::new("gemini-1.5-flash", 0.2))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[actix_web::test]
async fn evaluations_are_returned_oldest_first() {
    let store = seeded_store().await;
    let outputs = vec![
        evaluation_output(["PASS", "PASS", "FAIL", "PASS", "PASS"], "FAIL"),
        evaluation_output(["PASS"; 5], "PASS"),
    ];
    let state = state_with(store, outputs, GatewayConfig::default());
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/SOL-1")
        .set_json(EvaluateRequest::new("gemini-1.5-flash", 0.2))
        .to_request();
    let first: EvaluationResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first.overall_verdict, Verdict::Fail);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/SOL-1")
        .set_json(EvaluateRequest::new("gemini-1.5-pro", 0.7))
        .to_request();
    let second: EvaluationResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second.overall_verdict, Verdict::Pass);

    let req = test::TestRequest::get().uri("/api/evaluations/SOL-1").to_request();
    let history: Vec<EvaluationRecord> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].model_used, "gemini-1.5-flash");
    assert_eq!(history[0].overall_verdict, Verdict::Fail);
    assert_eq!(history[1].model_used, "gemini-1.5-pro");
    assert_eq!(history[1].temperature, "0.7");

    let req = test::TestRequest::get().uri("/api/evaluations/SOL-2").to_request();
    let empty: Vec<EvaluationRecord> = test::call_and_read_body_json(&app, req).await;
    assert!(empty.is_empty());
}

#[actix_web::test]
async fn unusable_model_output_is_a_server_error() {
    let store = seeded_store().await;
    let state = state_with(
        store,
        vec!["I cannot evaluate this.".to_string()],
        GatewayConfig::default(),
    );
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/SOL-1")
        .set_json(EvaluateRequest::new("gemini-1.5-flash", 0.2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.message, "Evaluation failed");
    assert!(body.error.is_some());
    assert!(state.store.read().await.evaluations_for("SOL-1").is_empty());
}

#[actix_web::test]
async fn rate_limited_evaluation_reports_retry_after() {
    let store = seeded_store().await;
    let config = GatewayConfig {
        rate_limit_max: 1,
        rate_limit_window: Duration::from_secs(60),
        ..GatewayConfig::default()
    };
    let state = state_with(store, vec![evaluation_output(["PASS"; 5], "PASS")], config);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/SOL-1")
        .set_json(EvaluateRequest::new("gemini-1.5-flash", 0.2))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/evaluate/SOL-2")
        .set_json(EvaluateRequest::new("gemini-1.5-flash", 0.2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let header: u64 = resp
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap();
    let body: RateLimitedBody = test::read_body_json(resp).await;
    assert_eq!(body.retry_after, header);
    assert!((1..=60).contains(&body.retry_after));
}

#[actix_web::test]
async fn register_rejects_duplicate_usernames() {
    let state = AppState::new(RecordStore::new().shared(), None);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/accounts/register")
        .set_json(json!({ "username": "reviewer", "password": "secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let account: RegisteredAccount = test::read_body_json(resp).await;
    assert_eq!(account.id, 1);
    assert_eq!(account.username, "reviewer");

    let req = test::TestRequest::post()
        .uri("/api/accounts/register")
        .set_json(json!({ "username": "reviewer", "password": "other" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/accounts/register")
        .set_json(json!({ "username": "  ", "password": "x" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn keys_with_reserved_characters_route_through_encoded_paths() {
    let store = RecordStore::new().shared();
    for key in ["A/B", "X#1", "Q?1", "S 1"] {
        store.write().await.upsert_solution(SolutionInput {
            solution_id: key.to_string(),
            fields: SolutionFields::default(),
        });
    }
    let state = state_with(
        store,
        vec![evaluation_output(["PASS"; 5], "PASS")],
        GatewayConfig::default(),
    );
    let app = app!(state);

    for key in ["A/B", "X#1", "Q?1", "S 1"] {
        let req = test::TestRequest::get().uri(&solution_path(key)).to_request();
        let found: SolutionRecord = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.solution_id, key);
    }

    let req = test::TestRequest::post()
        .uri(&evaluate_path("A/B"))
        .set_json(EvaluateRequest::new("gemini-1.5-flash", 0.2))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&evaluations_path("A/B")).to_request();
    let history: Vec<EvaluationRecord> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].solution_id, "A/B");
}
