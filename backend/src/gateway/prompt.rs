//! Prompt text sent to the model.
//!
//! The prompt is deterministic for a given record: fixed challenge context,
//! fixed criteria and every descriptive field in [`SolutionField::ALL`] order.
//! Missing fields are rendered empty rather than left out, so the model always
//! sees the same shape.

use std::fmt::Write;

use common::model::evaluation::CRITERIA;
use common::model::solution::{SolutionField, SolutionRecord};

const CHALLENGE_CONTEXT: &str = "You are screening submissions to an open innovation challenge that \
looks for technology-enabled solutions to pressing social, economic and environmental problems. \
Screening only removes submissions that should not reach expert reviewers; it does not rank them. \
When in doubt, a submission should pass a criterion.";

const RESPONSE_FORMAT: &str = r#"Respond with a single JSON object inside a ```json fenced block and nothing else:
```json
{
  "criteria": [
    {"id": 1, "name": "<criterion name>", "result": "PASS" or "FAIL", "reasoning": "<one or two sentences>"}
  ],
  "overallVerdict": "PASS" or "FAIL"
}
```
Include all five criteria in order. "overallVerdict" is PASS only if every criterion is PASS."#;

pub fn build_prompt(solution: &SolutionRecord) -> String {
    let mut prompt = String::with_capacity(4096);
    prompt.push_str(CHALLENGE_CONTEXT);
    prompt.push_str("\n\nEvaluate the submission against these criteria:\n");
    for criterion in CRITERIA.iter() {
        let _ = writeln!(
            prompt,
            "{}. {}: {}",
            criterion.id, criterion.name, criterion.description
        );
    }

    let _ = write!(prompt, "\nSubmission (Solution ID {}):\n", solution.solution_id);
    for field in SolutionField::ALL {
        let value = solution.fields.get(field).unwrap_or_default();
        let _ = writeln!(prompt, "{}: {}", field.label(), value);
    }

    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::solution::SolutionFields;

    #[test]
    fn every_field_is_rendered_even_when_missing() {
        let mut fields = SolutionFields::default();
        fields.set(SolutionField::Summary, Some("Solar water pumps".to_string()));
        let record = SolutionRecord {
            id: 1,
            solution_id: "S-42".to_string(),
            fields,
        };

        let prompt = build_prompt(&record);

        assert!(prompt.contains("Solution ID S-42"));
        assert!(prompt.contains("Summary: Solar water pumps\n"));
        assert!(prompt.contains("Financial Sustainability: \n"));
        for field in SolutionField::ALL {
            assert!(prompt.contains(&format!("{}:", field.label())), "{field:?} missing");
        }
        for criterion in CRITERIA.iter() {
            assert!(prompt.contains(criterion.name));
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let record = SolutionRecord {
            id: 9,
            solution_id: "S-1".to_string(),
            fields: SolutionFields::default(),
        };
        assert_eq!(build_prompt(&record), build_prompt(&record));
    }
}
