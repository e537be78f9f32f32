//! Update function of the solutions screen.
//!
//! Network work runs in `spawn_local` tasks that report back through
//! messages; the batch task forwards every orchestrator event as
//! `Msg::Batch` so progress renders while it runs.

use common::batch::{BatchEvent, BatchOrchestrator, BatchPolicy, ItemState};
use common::batch::export;
use common::requests::EvaluateRequest;
use gloo_console::{error, log};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::services::api::{self, BrowserPacer, HttpTransport};
use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet};

use super::helpers::{
    describe_event, download_csv, parse_temperature, show_toast, visible_solutions,
};
use super::messages::Msg;
use super::state::{BatchProgress, SolutionsComponent};

pub fn update(
    component: &mut SolutionsComponent,
    ctx: &Context<SolutionsComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::LoadSolutions => {
            component.loading = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::SolutionsLoaded(api::fetch_solutions().await));
            });
            true
        }
        Msg::SolutionsLoaded(result) => {
            component.loading = false;
            match result {
                Ok(solutions) => component.solutions = solutions,
                Err(e) => {
                    error!(format!("Loading solutions failed: {}", e));
                    show_toast("Could not load solutions");
                }
            }
            true
        }
        Msg::SetFilter(filter) => {
            component.filter = filter;
            true
        }
        Msg::SetModel(model) => {
            component.model = model;
            false
        }
        Msg::SetTemperature(temperature) => {
            component.temperature = temperature;
            false
        }
        Msg::Evaluate(solution_id) => {
            let Some(request) = evaluate_request(component) else {
                return false;
            };
            if !component.evaluating.insert(solution_id.clone()) {
                return false;
            }
            component.errors.remove(&solution_id);

            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::evaluate_once(&solution_id, &request).await;
                link.send_message(Msg::EvaluationDone { solution_id, result });
            });
            true
        }
        Msg::EvaluationDone { solution_id, result } => {
            component.evaluating.remove(&solution_id);
            match result {
                Ok(response) => {
                    component.results.insert(solution_id, response);
                }
                Err(e) => {
                    error!(format!("Evaluation of {} failed: {}", solution_id, e));
                    component.errors.insert(solution_id, e);
                }
            }
            true
        }
        Msg::StartBatch => {
            if component.batch_running() {
                return false;
            }
            let Some(request) = evaluate_request(component) else {
                return false;
            };
            let ids: Vec<String> = visible_solutions(&component.solutions, &component.filter)
                .into_iter()
                .map(|s| s.solution_id.clone())
                .collect();
            if ids.is_empty() {
                show_toast("No visible solutions to evaluate");
                return false;
            }

            component.item_states = ids
                .iter()
                .map(|id| (id.clone(), ItemState::Pending))
                .collect();
            component.batch = Some(BatchProgress {
                total: ids.len(),
                finished: 0,
                status: format!("Starting batch of {}", ids.len()),
            });
            component.last_summary = None;
            log!(format!("Batch evaluation of {} solutions started", ids.len()));

            let link = ctx.link().clone();
            spawn_local(async move {
                let orchestrator = BatchOrchestrator::new(BatchPolicy::default());
                let mut pacer = BrowserPacer;
                let outcome = orchestrator
                    .run(&ids, &request, &HttpTransport, &mut pacer, |event| {
                        link.send_message(Msg::Batch(event.clone()))
                    })
                    .await;
                link.send_message(Msg::BatchFinished(outcome));
            });
            true
        }
        Msg::Batch(event) => {
            if let BatchEvent::Skipped { solution_id, reason, .. } = &event {
                error!(format!("Skipped {}: {}", solution_id, reason));
            }
            component.record_batch_event(&event);
            true
        }
        Msg::BatchFinished(outcome) => {
            let summary = outcome.summary();
            log!(format!("Batch evaluation finished: {}", summary));
            show_toast(&format!("Batch finished: {}", summary));
            component.results.extend(outcome.results);
            component.batch = None;
            component.last_summary = Some(summary);
            true
        }
        Msg::ShowHistory(solution_id) => {
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::fetch_history(&solution_id).await;
                link.send_message(Msg::HistoryLoaded { solution_id, result });
            });
            false
        }
        Msg::HistoryLoaded { solution_id, result } => match result {
            Ok(history) => {
                component.history_for = Some(solution_id);
                component.history = history;
                open_top_sheet(component.history_ref.clone());
                true
            }
            Err(e) => {
                error!(format!("Loading history of {} failed: {}", solution_id, e));
                show_toast("Could not load evaluation history");
                false
            }
        },
        Msg::CloseHistory => {
            close_top_sheet(component.history_ref.clone());
            false
        }
        Msg::ExportResults => {
            if component.results.is_empty() {
                show_toast("Nothing to export yet");
                return false;
            }
            let rows = component.results.iter().map(|(id, r)| (id.as_str(), r));
            match export::to_csv(rows) {
                Ok(csv) => {
                    if download_csv("evaluation_results.csv", &csv).is_err() {
                        show_toast("Download failed");
                    }
                }
                Err(e) => {
                    error!(format!("Export failed: {}", e));
                    show_toast("Export failed");
                }
            }
            false
        }
        Msg::ClearSolutions => {
            if component.batch_running() {
                show_toast("Wait for the batch to finish");
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::SolutionsCleared(api::clear_solutions().await));
            });
            false
        }
        Msg::SolutionsCleared(result) => {
            match result {
                Ok(message) => {
                    show_toast(&message);
                    component.solutions.clear();
                    component.item_states.clear();
                    component.errors.clear();
                }
                Err(e) => {
                    error!(format!("Clearing solutions failed: {}", e));
                    show_toast("Could not clear solutions");
                }
            }
            true
        }
    }
}

/// Model and temperature from the inputs, or a toast explaining what is wrong.
fn evaluate_request(component: &SolutionsComponent) -> Option<EvaluateRequest> {
    let model = component.model.trim();
    if model.is_empty() {
        show_toast("Choose a model first");
        return None;
    }
    match parse_temperature(&component.temperature) {
        Ok(temperature) => Some(EvaluateRequest::new(model, temperature)),
        Err(e) => {
            show_toast(&e);
            None
        }
    }
}
