use std::collections::{BTreeMap, HashMap, HashSet};

use common::batch::{BatchEvent, ItemState};
use common::model::evaluation::{EvaluationRecord, EvaluationResponse};
use common::model::solution::SolutionRecord;
use yew::NodeRef;

use super::helpers::describe_event;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TEMPERATURE: &str = "0.2";

/// Progress of the running batch, rebuilt from orchestrator events.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    pub total: usize,
    /// Items that reached a final state (succeeded or skipped).
    pub finished: usize,
    pub status: String,
}

pub struct SolutionsComponent {
    pub solutions: Vec<SolutionRecord>,
    pub loading: bool,

    /// Case-insensitive match on solution id or challenge name. The batch
    /// evaluates exactly the rows this filter leaves visible.
    pub filter: String,

    pub model: String,
    pub temperature: String,

    /// Latest successful evaluation per solution id, single or batch.
    pub results: BTreeMap<String, EvaluationResponse>,

    /// Last error of a single evaluation; the row offers a retry button.
    pub errors: HashMap<String, String>,

    /// Single evaluations currently waiting on the server.
    pub evaluating: HashSet<String>,

    pub item_states: HashMap<String, ItemState>,
    pub batch: Option<BatchProgress>,
    pub last_summary: Option<String>,

    pub history_for: Option<String>,
    pub history: Vec<EvaluationRecord>,
    pub history_ref: NodeRef,

    pub loaded: bool,
}

impl SolutionsComponent {
    pub fn new() -> Self {
        Self {
            solutions: Vec::new(),
            loading: false,
            filter: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE.to_string(),
            results: BTreeMap::new(),
            errors: HashMap::new(),
            evaluating: HashSet::new(),
            item_states: HashMap::new(),
            batch: None,
            last_summary: None,
            history_for: None,
            history: Vec::new(),
            history_ref: NodeRef::default(),
            loaded: false,
        }
    }

    pub fn batch_running(&self) -> bool {
        self.batch.is_some()
    }

    /// Folds one orchestrator event into row states and the progress line.
    /// A batch success also clears an earlier single-evaluation error.
    pub fn record_batch_event(&mut self, event: &BatchEvent) {
        self.item_states
            .insert(event.solution_id().to_string(), event.state());
        if let Some(progress) = self.batch.as_mut() {
            if matches!(event, BatchEvent::Succeeded { .. } | BatchEvent::Skipped { .. }) {
                progress.finished += 1;
            }
            progress.status = describe_event(event, progress.total);
        }
        if let BatchEvent::Succeeded { solution_id, .. } = event {
            self.errors.remove(solution_id);
        }
    }
}
