//! Sequential batch evaluation.
//!
//! The orchestrator evaluates solutions strictly one at a time against the
//! `POST /api/evaluate/{id}` endpoint. It never fans out: the backend guards
//! the model provider with a single per-process rate limit, and parallel
//! requests would only burn that budget faster.
//!
//! The only suspension points are the transport call and [`Pacer::sleep`]
//! (inter-item delay, rate-limit wait, retry backoff). Both are traits so the
//! same loop runs in the browser (gloo timers and fetch) and in native tests
//! with a virtual clock.
//!
//! Failure handling per item:
//! - a rate-limited reply waits for the server hint plus jitter and retries
//!   without counting an attempt;
//! - any other failure counts an attempt and backs off exponentially;
//! - after `max_attempts` failures the item is skipped and the batch moves on.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::evaluation::EvaluationResponse;
use crate::requests::EvaluateRequest;

pub mod export;
mod policy;
mod reply;
mod state;

pub use policy::BatchPolicy;
pub use reply::{classify_reply, error_message};
pub use state::{BatchEvent, ItemState};

/// What the evaluate endpoint answered.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluateReply {
    Evaluated(EvaluationResponse),
    /// HTTP 429. `retry_after_secs` is the server hint, if any.
    RateLimited { retry_after_secs: Option<u64> },
    /// Any other non-success status.
    Rejected { status: u16, message: String },
}

/// The request never produced an HTTP reply.
#[derive(Debug, Clone, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

#[async_trait(?Send)]
pub trait EvaluateTransport {
    async fn evaluate(
        &self,
        solution_id: &str,
        request: &EvaluateRequest,
    ) -> Result<EvaluateReply, TransportError>;
}

/// Time source of the batch loop.
#[async_trait(?Send)]
pub trait Pacer {
    async fn sleep(&mut self, duration: Duration);

    /// A random value in `[0, upper)`.
    fn jitter_ms(&mut self, upper: u64) -> u64;
}

/// Result of a completed batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Last successful response per solution. Skipped items are absent.
    pub results: BTreeMap<String, EvaluationResponse>,
    pub skipped: Vec<String>,
    pub succeeded: usize,
    pub total: usize,
}

impl BatchOutcome {
    pub fn summary(&self) -> String {
        format!("{} of {} succeeded", self.succeeded, self.total)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchOrchestrator {
    policy: BatchPolicy,
}

impl BatchOrchestrator {
    pub fn new(policy: BatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BatchPolicy {
        &self.policy
    }

    /// Evaluates `solution_ids` in order and reports every state change to
    /// `observer`. Never fails: items that exhaust their attempts are skipped.
    pub async fn run<T, P, F>(
        &self,
        solution_ids: &[String],
        request: &EvaluateRequest,
        transport: &T,
        pacer: &mut P,
        mut observer: F,
    ) -> BatchOutcome
    where
        T: EvaluateTransport + ?Sized,
        P: Pacer + ?Sized,
        F: FnMut(&BatchEvent),
    {
        let mut outcome = BatchOutcome {
            total: solution_ids.len(),
            ..BatchOutcome::default()
        };

        for (index, solution_id) in solution_ids.iter().enumerate() {
            if let Some(delay) = self.policy.inter_item_delay(index) {
                pacer.sleep(delay).await;
            }

            match self
                .run_item(index, solution_id, request, transport, pacer, &mut observer)
                .await
            {
                Some(response) => {
                    outcome.succeeded += 1;
                    outcome.results.insert(solution_id.clone(), response);
                }
                None => outcome.skipped.push(solution_id.clone()),
            }
        }

        outcome
    }

    async fn run_item<T, P, F>(
        &self,
        index: usize,
        solution_id: &str,
        request: &EvaluateRequest,
        transport: &T,
        pacer: &mut P,
        observer: &mut F,
    ) -> Option<EvaluationResponse>
    where
        T: EvaluateTransport + ?Sized,
        P: Pacer + ?Sized,
        F: FnMut(&BatchEvent),
    {
        let mut attempts = 0u32;

        loop {
            observer(&BatchEvent::InFlight {
                index,
                solution_id: solution_id.to_string(),
                attempt: attempts + 1,
            });

            let reason = match transport.evaluate(solution_id, request).await {
                Ok(EvaluateReply::Evaluated(response)) => {
                    observer(&BatchEvent::Succeeded {
                        index,
                        solution_id: solution_id.to_string(),
                    });
                    return Some(response);
                }
                Ok(EvaluateReply::RateLimited { retry_after_secs }) => {
                    let jitter = pacer.jitter_ms(self.policy.rate_limit_jitter_ms);
                    let wait = self.policy.rate_limit_wait(retry_after_secs, jitter);
                    observer(&BatchEvent::RateLimited {
                        index,
                        solution_id: solution_id.to_string(),
                        wait,
                    });
                    pacer.sleep(wait).await;
                    continue;
                }
                Ok(EvaluateReply::Rejected { status, message }) => {
                    format!("HTTP {status}: {message}")
                }
                Err(err) => err.to_string(),
            };

            attempts += 1;
            if attempts >= self.policy.max_attempts {
                observer(&BatchEvent::Skipped {
                    index,
                    solution_id: solution_id.to_string(),
                    reason,
                });
                return None;
            }

            let jitter = pacer.jitter_ms(self.policy.backoff_jitter_ms);
            let wait = self.policy.backoff(attempts, jitter);
            observer(&BatchEvent::Retrying {
                index,
                solution_id: solution_id.to_string(),
                attempt: attempts,
                wait,
                reason,
            });
            pacer.sleep(wait).await;
        }
    }
}
