use serde::{Deserialize, Serialize};

/// Body of `POST /api/evaluate/{id}`.
///
/// Both fields are optional on the wire so the server can answer a missing
/// value with its own 400 message instead of a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub model: Option<String>,
    pub temperature: Option<f64>,
}

impl EvaluateRequest {
    pub fn new(model: impl Into<String>, temperature: f64) -> Self {
        Self {
            model: Some(model.into()),
            temperature: Some(temperature),
        }
    }
}

/// Body of `POST /api/accounts/register`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

pub const SOLUTIONS_PATH: &str = "/api/solutions";
pub const EVALUATE_PATH: &str = "/api/evaluate";
pub const EVALUATIONS_PATH: &str = "/api/evaluations";

/// Percent-encodes a natural key for use as one URL path segment, with the
/// same unreserved set as `encodeURIComponent`.
pub fn path_segment(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

pub fn solution_path(solution_id: &str) -> String {
    format!("{}/{}", SOLUTIONS_PATH, path_segment(solution_id))
}

pub fn evaluate_path(solution_id: &str) -> String {
    format!("{}/{}", EVALUATE_PATH, path_segment(solution_id))
}

pub fn evaluations_path(solution_id: &str) -> String {
    format!("{}/{}", EVALUATIONS_PATH, path_segment(solution_id))
}
