//! HTTP access to the screener backend.
//!
//! [`HttpTransport`] and [`BrowserPacer`] plug the browser into the batch
//! orchestrator from `common::batch`; the free functions cover the remaining
//! routes used by the components.

use std::time::Duration;

use async_trait::async_trait;
use common::batch::{classify_reply, EvaluateReply, EvaluateTransport, Pacer, TransportError};
use common::model::evaluation::{EvaluationRecord, EvaluationResponse};
use common::model::solution::SolutionRecord;
use common::requests::{evaluate_path, evaluations_path, EvaluateRequest, SOLUTIONS_PATH};
use common::responses::{MessageBody, UploadSummary};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use web_sys::{File, FormData};

async fn error_message(resp: Response) -> String {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    common::batch::error_message(status, &text)
}

pub async fn fetch_solutions() -> Result<Vec<SolutionRecord>, String> {
    let resp = Request::get(SOLUTIONS_PATH)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(error_message(resp).await);
    }
    resp.json().await.map_err(|e| e.to_string())
}

pub async fn clear_solutions() -> Result<String, String> {
    let resp = Request::delete(SOLUTIONS_PATH)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(error_message(resp).await);
    }
    let body: MessageBody = resp.json().await.map_err(|e| e.to_string())?;
    Ok(body.message)
}

pub async fn upload_solutions(file: File) -> Result<UploadSummary, String> {
    let form = FormData::new().map_err(|_| "FormData unavailable".to_string())?;
    form.append_with_blob_and_filename("file", &file, &file.name())
        .map_err(|_| "Could not attach file".to_string())?;

    let resp = Request::post(&format!("{}/upload", SOLUTIONS_PATH))
        .body(form)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(error_message(resp).await);
    }
    resp.json().await.map_err(|e| e.to_string())
}

pub async fn fetch_history(solution_id: &str) -> Result<Vec<EvaluationRecord>, String> {
    let resp = Request::get(&evaluations_path(solution_id))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(error_message(resp).await);
    }
    resp.json().await.map_err(|e| e.to_string())
}

/// One evaluation outside a batch; every non-success reply is an error message.
pub async fn evaluate_once(
    solution_id: &str,
    request: &EvaluateRequest,
) -> Result<EvaluationResponse, String> {
    match HttpTransport.evaluate(solution_id, request).await {
        Ok(EvaluateReply::Evaluated(response)) => Ok(response),
        Ok(EvaluateReply::RateLimited { retry_after_secs }) => Err(format!(
            "Rate limited, retry in {} seconds",
            retry_after_secs.unwrap_or(60)
        )),
        Ok(EvaluateReply::Rejected { message, .. }) => Err(message),
        Err(e) => Err(e.to_string()),
    }
}

/// `POST /api/evaluate/{id}` over `fetch`.
pub struct HttpTransport;

#[async_trait(?Send)]
impl EvaluateTransport for HttpTransport {
    async fn evaluate(
        &self,
        solution_id: &str,
        request: &EvaluateRequest,
    ) -> Result<EvaluateReply, TransportError> {
        let resp = Request::post(&evaluate_path(solution_id))
            .json(request)
            .map_err(|e| TransportError(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = resp.status();
        let retry_after = resp.headers().get("Retry-After");
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        classify_reply(status, retry_after.as_deref(), &body)
    }
}

/// Browser timers and `Math.random` jitter.
pub struct BrowserPacer;

#[async_trait(?Send)]
impl Pacer for BrowserPacer {
    async fn sleep(&mut self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }

    fn jitter_ms(&mut self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        let value = (js_sys::Math::random() * upper as f64).floor() as u64;
        value.min(upper - 1)
    }
}
