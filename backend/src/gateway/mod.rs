//! Evaluation gateway: turns a solution record into a validated
//! [`EvaluationResponse`] by way of the language model, and appends every
//! successful evaluation to the store's history.
//!
//! Steps of [`EvaluationGateway::evaluate`]:
//! 1. consult the rate limiter; a full window is reported as
//!    [`GatewayError::RateLimited`] with a retry hint in seconds;
//! 2. build the prompt and call the model;
//! 3. extract JSON from the raw output ([`extract`]);
//! 4. validate it against the evaluation schema ([`validate`]);
//! 5. append an evaluation record and return the response.
//!
//! There is no caching and no internal retry: every call reaches the model,
//! and retrying failures is left to the caller.

pub mod extract;
pub mod prompt;
pub mod provider;
pub mod validate;

use std::sync::Arc;
use std::time::Duration;

use common::model::evaluation::EvaluationResponse;
use common::model::solution::SolutionRecord;
use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::rate_limiter::RateLimiter;
use crate::store::{NewEvaluation, SharedStore};
use extract::ExtractError;
use provider::{CompletionRequest, LlmClient, ProviderError};
use validate::ValidationError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("malformed provider response: {0}")]
    Malformed(#[from] ExtractError),
    #[error("invalid provider response: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub max_output_tokens: u32,
    pub rate_limit_max: usize,
    pub rate_limit_window: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 2048,
            rate_limit_max: 10,
            rate_limit_window: Duration::from_secs(60),
        }
    }
}

pub struct EvaluationGateway {
    client: Arc<dyn LlmClient>,
    store: SharedStore,
    limiter: Mutex<RateLimiter>,
    max_output_tokens: u32,
}

impl EvaluationGateway {
    pub fn new(client: Arc<dyn LlmClient>, store: SharedStore, config: GatewayConfig) -> Self {
        Self {
            client,
            store,
            limiter: Mutex::new(RateLimiter::new(
                config.rate_limit_max,
                config.rate_limit_window,
            )),
            max_output_tokens: config.max_output_tokens,
        }
    }

    pub async fn evaluate(
        &self,
        solution: &SolutionRecord,
        model: &str,
        temperature: f64,
    ) -> Result<EvaluationResponse, GatewayError> {
        self.check_rate_limit().await?;

        let prompt = prompt::build_prompt(solution);
        debug!(
            "Evaluating solution {} with {}:{} ({} prompt chars)",
            solution.solution_id,
            self.client.provider_name(),
            model,
            prompt.len()
        );
        let raw = self
            .client
            .complete(&CompletionRequest {
                model,
                prompt: &prompt,
                temperature,
                max_output_tokens: self.max_output_tokens,
            })
            .await?;

        let extracted = extract::parse_provider_output(&raw)?;
        debug!("Extracted evaluation JSON via {:?}", extracted.strategy);
        let mut response = validate::validate_response(&extracted.value)?;

        let derived = response.derived_verdict();
        if derived != response.overall_verdict {
            warn!(
                "Model reported {} for solution {} but criteria give {}; using {}",
                response.overall_verdict.as_str(),
                solution.solution_id,
                derived.as_str(),
                derived.as_str()
            );
            response.overall_verdict = derived;
        }

        let record = self.store.write().await.append_evaluation(NewEvaluation {
            solution_id: solution.solution_id.clone(),
            results: extracted.value,
            overall_verdict: response.overall_verdict,
            model_used: model.to_string(),
            temperature: temperature.to_string(),
        });
        info!(
            "Stored evaluation {} for solution {}: {}",
            record.id,
            solution.solution_id,
            record.overall_verdict.as_str()
        );

        Ok(response)
    }

    async fn check_rate_limit(&self) -> Result<(), GatewayError> {
        let mut limiter = self.limiter.lock().await;
        if limiter.is_limited() {
            let retry_after_secs = limiter.time_to_wait_ms().div_ceil(1000).max(1);
            warn!("Model rate limit reached, next slot in {}s", retry_after_secs);
            return Err(GatewayError::RateLimited { retry_after_secs });
        }
        Ok(())
    }
}
