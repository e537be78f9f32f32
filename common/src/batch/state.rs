use std::time::Duration;

/// Lifecycle of one item in a batch run.
///
/// `Pending -> InFlight -> {Succeeded | Retrying -> InFlight | Skipped}`.
/// A rate-limited reply also goes back through `Retrying`, but does not use
/// up an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    InFlight,
    Retrying,
    Succeeded,
    Skipped,
}

/// Progress notification emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    InFlight {
        index: usize,
        solution_id: String,
        attempt: u32,
    },
    RateLimited {
        index: usize,
        solution_id: String,
        wait: Duration,
    },
    Retrying {
        index: usize,
        solution_id: String,
        attempt: u32,
        wait: Duration,
        reason: String,
    },
    Succeeded {
        index: usize,
        solution_id: String,
    },
    Skipped {
        index: usize,
        solution_id: String,
        reason: String,
    },
}

impl BatchEvent {
    pub fn index(&self) -> usize {
        match self {
            BatchEvent::InFlight { index, .. }
            | BatchEvent::RateLimited { index, .. }
            | BatchEvent::Retrying { index, .. }
            | BatchEvent::Succeeded { index, .. }
            | BatchEvent::Skipped { index, .. } => *index,
        }
    }

    pub fn solution_id(&self) -> &str {
        match self {
            BatchEvent::InFlight { solution_id, .. }
            | BatchEvent::RateLimited { solution_id, .. }
            | BatchEvent::Retrying { solution_id, .. }
            | BatchEvent::Succeeded { solution_id, .. }
            | BatchEvent::Skipped { solution_id, .. } => solution_id,
        }
    }

    /// State the item is in once this event has been emitted.
    pub fn state(&self) -> ItemState {
        match self {
            BatchEvent::InFlight { .. } => ItemState::InFlight,
            BatchEvent::RateLimited { .. } | BatchEvent::Retrying { .. } => ItemState::Retrying,
            BatchEvent::Succeeded { .. } => ItemState::Succeeded,
            BatchEvent::Skipped { .. } => ItemState::Skipped,
        }
    }
}
