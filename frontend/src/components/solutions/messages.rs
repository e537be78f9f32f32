use common::batch::{BatchEvent, BatchOutcome};
use common::model::evaluation::{EvaluationRecord, EvaluationResponse};
use common::model::solution::SolutionRecord;

pub enum Msg {
    LoadSolutions,
    SolutionsLoaded(Result<Vec<SolutionRecord>, String>),
    SetFilter(String),
    SetModel(String),
    SetTemperature(String),
    Evaluate(String),
    EvaluationDone {
        solution_id: String,
        result: Result<EvaluationResponse, String>,
    },
    StartBatch,
    Batch(BatchEvent),
    BatchFinished(BatchOutcome),
    ShowHistory(String),
    HistoryLoaded {
        solution_id: String,
        result: Result<Vec<EvaluationRecord>, String>,
    },
    CloseHistory,
    ExportResults,
    ClearSolutions,
    SolutionsCleared(Result<String, String>),
}
