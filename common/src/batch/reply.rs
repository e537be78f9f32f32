//! Maps a raw `POST /api/evaluate/{id}` reply onto [`EvaluateReply`].
//!
//! A 429 takes its retry hint from the body's `retryAfter` first, then from
//! the `Retry-After` header. With neither the hint is `None` and the
//! orchestrator falls back to its default wait.

use crate::model::evaluation::EvaluationResponse;
use crate::responses::{ErrorBody, RateLimitedBody};

use super::{EvaluateReply, TransportError};

pub const STATUS_OK: u16 = 200;
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

pub fn classify_reply(
    status: u16,
    retry_after_header: Option<&str>,
    body: &str,
) -> Result<EvaluateReply, TransportError> {
    match status {
        STATUS_OK => serde_json::from_str::<EvaluationResponse>(body)
            .map(EvaluateReply::Evaluated)
            .map_err(|e| TransportError(format!("unreadable evaluation: {e}"))),
        STATUS_TOO_MANY_REQUESTS => {
            let from_body = serde_json::from_str::<RateLimitedBody>(body)
                .ok()
                .map(|b| b.retry_after);
            let from_header = retry_after_header.and_then(|v| v.trim().parse::<u64>().ok());
            Ok(EvaluateReply::RateLimited {
                retry_after_secs: from_body.or(from_header),
            })
        }
        status => Ok(EvaluateReply::Rejected {
            status,
            message: error_message(status, body),
        }),
    }
}

/// `{message}` of an error body (with its `error` detail), else the raw text.
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message,
            error: Some(detail),
        }) => format!("{message}: {detail}"),
        Ok(ErrorBody { message, .. }) => message,
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::evaluation::Verdict;

    fn rate_limited(header: Option<&str>, body: &str) -> Option<u64> {
        match classify_reply(429, header, body).unwrap() {
            EvaluateReply::RateLimited { retry_after_secs } => retry_after_secs,
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_hint_prefers_body_over_header() {
        let body = r#"{"message": "slow down", "retryAfter": 17}"#;
        assert_eq!(rate_limited(Some("40"), body), Some(17));
        assert_eq!(rate_limited(None, body), Some(17));
    }

    #[test]
    fn rate_limit_hint_falls_back_to_header() {
        assert_eq!(rate_limited(Some(" 42 "), ""), Some(42));
        assert_eq!(rate_limited(Some("42"), "<html>busy</html>"), Some(42));
        assert_eq!(rate_limited(Some("42"), r#"{"message": "no hint"}"#), Some(42));
    }

    #[test]
    fn rate_limit_without_any_hint_has_none() {
        assert_eq!(rate_limited(None, ""), None);
        assert_eq!(rate_limited(Some("Wed, 21 Oct 2026 07:28:00 GMT"), "{"), None);
    }

    #[test]
    fn success_body_is_decoded_or_reported_as_transport_error() {
        let body = r#"{"criteria": [{"id": 1, "name": "Complete Application", "result": "FAIL", "reasoning": "empty"}], "overallVerdict": "FAIL"}"#;
        match classify_reply(200, None, body).unwrap() {
            EvaluateReply::Evaluated(response) => {
                assert_eq!(response.overall_verdict, Verdict::Fail);
                assert_eq!(response.criteria.len(), 1);
            }
            other => panic!("expected evaluation, got {other:?}"),
        }

        assert!(classify_reply(200, None, "not json").is_err());
    }

    #[test]
    fn other_statuses_are_rejected_with_server_message() {
        let body = r#"{"message": "Evaluation failed", "error": "invalid provider response"}"#;
        assert_eq!(
            classify_reply(500, None, body).unwrap(),
            EvaluateReply::Rejected {
                status: 500,
                message: "Evaluation failed: invalid provider response".to_string(),
            }
        );
        assert_eq!(
            classify_reply(404, None, r#"{"message": "Solution 'X' not found"}"#).unwrap(),
            EvaluateReply::Rejected {
                status: 404,
                message: "Solution 'X' not found".to_string(),
            }
        );
        assert_eq!(
            classify_reply(502, Some("10"), "").unwrap(),
            EvaluateReply::Rejected {
                status: 502,
                message: "HTTP 502".to_string(),
            }
        );
    }
}
