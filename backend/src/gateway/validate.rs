use common::model::evaluation::{EvaluationResponse, CRITERIA};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("response does not match the evaluation schema: {0}")]
    Shape(String),
    #[error("expected {expected} criteria, got {actual}")]
    CriteriaCount { expected: usize, actual: usize },
    #[error("criteria ids must be 1 to 5 exactly once, got {0:?}")]
    CriteriaIds(Vec<u8>),
}

/// Checks parsed model output against the evaluation schema.
///
/// Requires exactly one entry per criterion id (1..=5) with PASS/FAIL results.
/// Criteria are returned sorted by id.
pub fn validate_response(value: &Value) -> Result<EvaluationResponse, ValidationError> {
    let mut response: EvaluationResponse = serde_json::from_value(value.clone())
        .map_err(|e| ValidationError::Shape(e.to_string()))?;

    if response.criteria.len() != CRITERIA.len() {
        return Err(ValidationError::CriteriaCount {
            expected: CRITERIA.len(),
            actual: response.criteria.len(),
        });
    }

    response.criteria.sort_by_key(|c| c.id);
    let ids: Vec<u8> = response.criteria.iter().map(|c| c.id).collect();
    if !ids.iter().copied().eq(CRITERIA.iter().map(|c| c.id)) {
        return Err(ValidationError::CriteriaIds(ids));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::evaluation::Verdict;
    use serde_json::json;

    fn criteria(ids: &[u8], result: &str) -> Value {
        Value::Array(
            ids.iter()
                .map(|id| {
                    json!({"id": id, "name": format!("C{id}"), "result": result, "reasoning": "r"})
                })
                .collect(),
        )
    }

    #[test]
    fn accepts_five_criteria_and_sorts_them() {
        let value = json!({
            "criteria": criteria(&[3, 1, 2, 5, 4], "PASS"),
            "overallVerdict": "PASS",
        });
        let response = validate_response(&value).unwrap();

        let ids: Vec<u8> = response.criteria.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(response.overall_verdict, Verdict::Pass);
    }

    #[test]
    fn rejects_wrong_criteria_count() {
        let value = json!({"criteria": criteria(&[1, 2, 3, 4], "PASS"), "overallVerdict": "PASS"});
        assert_eq!(
            validate_response(&value).unwrap_err(),
            ValidationError::CriteriaCount { expected: 5, actual: 4 }
        );
    }

    #[test]
    fn rejects_duplicate_or_out_of_range_ids() {
        let value = json!({
            "criteria": criteria(&[1, 2, 2, 4, 6], "FAIL"),
            "overallVerdict": "FAIL",
        });
        assert_eq!(
            validate_response(&value).unwrap_err(),
            ValidationError::CriteriaIds(vec![1, 2, 2, 4, 6])
        );
    }

    #[test]
    fn rejects_unknown_verdict_values() {
        let value = json!({
            "criteria": criteria(&[1, 2, 3, 4, 5], "MAYBE"),
            "overallVerdict": "PASS",
        });
        assert!(matches!(validate_response(&value), Err(ValidationError::Shape(_))));

        let missing = json!({"criteria": criteria(&[1, 2, 3, 4, 5], "PASS")});
        assert!(matches!(validate_response(&missing), Err(ValidationError::Shape(_))));
    }
}
