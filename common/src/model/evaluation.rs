use serde::{Deserialize, Serialize};

/// Pass/fail outcome of a single criterion or of a whole evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

/// A fixed screening criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criterion {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
}

/// The five screening criteria, in evaluation order.
pub const CRITERIA: [Criterion; 5] = [
    Criterion {
        id: 1,
        name: "Complete Application",
        description: "The submission answers the required questions in English with enough \
                      substance to understand what the solution is and who it serves. Placeholder, \
                      copied or empty answers fail.",
    },
    Criterion {
        id: 2,
        name: "Appropriate Content",
        description: "The submission contains no offensive, discriminatory, fraudulent or \
                      promotional spam content and does not advocate violence or illegal activity.",
    },
    Criterion {
        id: 3,
        name: "Relevant to Challenge",
        description: "The problem statement and solution description address the challenge the \
                      submission was entered into, rather than an unrelated topic.",
    },
    Criterion {
        id: 4,
        name: "Feasible Approach",
        description: "The solution describes a concrete approach (technology, service or \
                      business model) that could plausibly be delivered by the team described.",
    },
    Criterion {
        id: 5,
        name: "Quality for Review",
        description: "The submission is coherent and specific enough that an expert reviewer \
                      could meaningfully score it; vague or contradictory submissions fail.",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionResult {
    pub id: u8,
    pub name: String,
    pub result: Verdict,
    pub reasoning: String,
}

/// Validated answer of the language model for one solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub criteria: Vec<CriterionResult>,
    pub overall_verdict: Verdict,
}

impl EvaluationResponse {
    /// PASS only when every criterion passed.
    pub fn derived_verdict(&self) -> Verdict {
        if !self.criteria.is_empty() && self.criteria.iter().all(|c| c.result.is_pass()) {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn criterion(&self, id: u8) -> Option<&CriterionResult> {
        self.criteria.iter().find(|c| c.id == id)
    }
}

/// One entry of the append-only evaluation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    pub id: u64,
    pub solution_id: String,
    /// RFC 3339 timestamp of when the evaluation was stored.
    pub timestamp: String,
    /// The provider JSON exactly as parsed, before validation.
    pub results: serde_json::Value,
    pub overall_verdict: Verdict,
    pub model_used: String,
    pub temperature: String,
}
