//! In-memory record store for accounts, solutions and evaluations.
//!
//! The store is a plain struct with no interior locking. One instance is
//! created at startup and shared with the HTTP handlers as [`SharedStore`]
//! through `web::Data`; the `RwLock` around it serializes writers across
//! actix workers. Nothing is persisted: a restart starts from an empty store
//! (plus whatever the startup CSV load brings back).
//!
//! Collections are small, so lookups are linear scans and every list keeps
//! insertion order.

use std::sync::Arc;

use chrono::Utc;
use common::model::account::Account;
use common::model::evaluation::{EvaluationRecord, Verdict};
use common::model::solution::{SolutionInput, SolutionRecord};
use thiserror::Error;
use tokio::sync::RwLock;

/// The store as shared between handlers.
pub type SharedStore = Arc<RwLock<RecordStore>>;

const FIRST_ID: u64 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("username '{0}' is already registered")]
    UsernameTaken(String),
}

/// Evaluation data to append; the store adds the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub solution_id: String,
    pub results: serde_json::Value,
    pub overall_verdict: Verdict,
    pub model_used: String,
    pub temperature: String,
}

#[derive(Debug)]
pub struct RecordStore {
    accounts: Vec<Account>,
    next_account_id: u64,
    solutions: Vec<SolutionRecord>,
    next_solution_id: u64,
    evaluations: Vec<EvaluationRecord>,
    next_evaluation_id: u64,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            next_account_id: FIRST_ID,
            solutions: Vec::new(),
            next_solution_id: FIRST_ID,
            evaluations: Vec::new(),
            next_evaluation_id: FIRST_ID,
        }
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn create_account(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Account, StoreError> {
        if self.account_by_username(username).is_some() {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }
        let account = Account {
            id: self.next_account_id,
            username: username.to_string(),
            password: password.to_string(),
        };
        self.next_account_id += 1;
        self.accounts.push(account.clone());
        Ok(account)
    }

    pub fn account_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    /// Inserts `input`, or replaces every descriptive field of the record with
    /// the same natural key. Fields absent from `input` become `None`; the
    /// existing internal id is kept.
    pub fn upsert_solution(&mut self, input: SolutionInput) -> SolutionRecord {
        let fields = input.fields.normalized();

        if let Some(existing) = self
            .solutions
            .iter_mut()
            .find(|s| s.solution_id == input.solution_id)
        {
            existing.fields = fields;
            return existing.clone();
        }

        let record = SolutionRecord {
            id: self.next_solution_id,
            solution_id: input.solution_id,
            fields,
        };
        self.next_solution_id += 1;
        self.solutions.push(record.clone());
        record
    }

    pub fn solution_by_key(&self, solution_id: &str) -> Option<&SolutionRecord> {
        self.solutions.iter().find(|s| s.solution_id == solution_id)
    }

    pub fn solutions(&self) -> &[SolutionRecord] {
        &self.solutions
    }

    /// Drops every solution and restarts id assignment. Evaluation history is kept.
    pub fn clear_solutions(&mut self) {
        self.solutions.clear();
        self.next_solution_id = FIRST_ID;
    }

    /// Appends a new evaluation; earlier evaluations are never touched.
    pub fn append_evaluation(&mut self, new: NewEvaluation) -> EvaluationRecord {
        let record = EvaluationRecord {
            id: self.next_evaluation_id,
            solution_id: new.solution_id,
            timestamp: Utc::now().to_rfc3339(),
            results: new.results,
            overall_verdict: new.overall_verdict,
            model_used: new.model_used,
            temperature: new.temperature,
        };
        self.next_evaluation_id += 1;
        self.evaluations.push(record.clone());
        record
    }

    /// Evaluation history of one solution, oldest first.
    pub fn evaluations_for(&self, solution_id: &str) -> Vec<EvaluationRecord> {
        self.evaluations
            .iter()
            .filter(|e| e.solution_id == solution_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::solution::{SolutionField, SolutionFields};
    use serde_json::json;

    fn input(key: &str, summary: Option<&str>, team_size: Option<&str>) -> SolutionInput {
        let mut fields = SolutionFields::default();
        fields.set(SolutionField::Summary, summary.map(str::to_string));
        fields.set(SolutionField::TeamSize, team_size.map(str::to_string));
        SolutionInput {
            solution_id: key.to_string(),
            fields,
        }
    }

    fn evaluation(key: &str, verdict: Verdict) -> NewEvaluation {
        NewEvaluation {
            solution_id: key.to_string(),
            results: json!({ "overallVerdict": verdict.as_str() }),
            overall_verdict: verdict,
            model_used: "gemini-1.5-flash".to_string(),
            temperature: "0.2".to_string(),
        }
    }

    #[test]
    fn upsert_replaces_fields_and_keeps_internal_id() {
        let mut store = RecordStore::new();
        let first = store.upsert_solution(input("S1", Some("old"), Some("4")));
        store.upsert_solution(input("S2", Some("other"), None));

        let second = store.upsert_solution(input("S1", Some("new"), None));

        assert_eq!(second.id, first.id);
        assert_eq!(store.solutions().len(), 2);
        let stored = store.solution_by_key("S1").unwrap();
        assert_eq!(stored.fields.get(SolutionField::Summary), Some("new"));
        // Not merged: the stale team size must not survive.
        assert_eq!(stored.fields.get(SolutionField::TeamSize), None);
    }

    #[test]
    fn upsert_coerces_blank_strings_to_none() {
        let mut store = RecordStore::new();
        let mut fields = SolutionFields::default();
        fields.summary = Some("  ".to_string());

        let record = store.upsert_solution(SolutionInput {
            solution_id: "S1".to_string(),
            fields,
        });

        assert_eq!(record.fields.summary, None);
    }

    #[test]
    fn clear_resets_collection_and_id_counter() {
        let mut store = RecordStore::new();
        store.upsert_solution(input("S1", None, None));
        store.upsert_solution(input("S2", None, None));

        store.clear_solutions();
        assert!(store.solutions().is_empty());
        assert!(store.solution_by_key("S1").is_none());

        let again = store.upsert_solution(input("S9", None, None));
        assert_eq!(again.id, FIRST_ID);
    }

    #[test]
    fn evaluations_are_appended_and_listed_chronologically() {
        let mut store = RecordStore::new();
        let a = store.append_evaluation(evaluation("S1", Verdict::Fail));
        store.append_evaluation(evaluation("S2", Verdict::Pass));
        let b = store.append_evaluation(evaluation("S1", Verdict::Pass));

        let history = store.evaluations_for("S1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, a.id);
        assert_eq!(history[1].id, b.id);
        assert_ne!(a.id, b.id);
        assert_eq!(history[0].overall_verdict, Verdict::Fail);
        assert!(store.evaluations_for("missing").is_empty());
    }

    #[test]
    fn usernames_are_unique() {
        let mut store = RecordStore::new();
        let first = store.create_account("reviewer", "pw").unwrap();
        let second = store.create_account("other", "pw").unwrap();

        assert_eq!(second.id, first.id + 1);
        assert_eq!(
            store.create_account("reviewer", "x"),
            Err(StoreError::UsernameTaken("reviewer".to_string()))
        );
        assert_eq!(store.account_by_username("other").map(|a| a.id), Some(second.id));
    }
}
