//! Markup of the solutions screen: toolbar, batch progress, the solutions
//! table and the history top sheet.

use common::model::evaluation::{EvaluationResponse, Verdict, CRITERIA};
use common::model::solution::SolutionRecord;
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use crate::components::data_sources::csv::CsvDataSourceComponent;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

use super::helpers::{state_label, visible_solutions};
use super::messages::Msg;
use super::state::SolutionsComponent;

pub fn view(component: &SolutionsComponent, ctx: &Context<SolutionsComponent>) -> Html {
    let link = ctx.link();
    let visible = visible_solutions(&component.solutions, &component.filter);

    html! {
        <div class="solutions-root">
            { build_toolbar(component, link, visible.len()) }
            { build_progress(component) }
            {
                if component.loading {
                    html! { <div class="loading">{ "Loading solutions..." }</div> }
                } else if visible.is_empty() {
                    html! {
                        <div class="empty">{ "No solutions. Upload a CSV to get started." }</div>
                    }
                } else {
                    build_table(component, link, &visible)
                }
            }
            { history_sheet(component, link) }
        </div>
    }
}

fn build_toolbar(
    component: &SolutionsComponent,
    link: &Scope<SolutionsComponent>,
    visible: usize,
) -> Html {
    let busy = component.batch_running();
    let batch_label = format!("Evaluate {} visible", visible);
    let nothing_to_export = component.results.is_empty();
    html! {
        <div class="icon-toolbar">
            <input
                class="filter"
                placeholder="Filter by id or challenge"
                value={component.filter.clone()}
                oninput={link.callback(|e: InputEvent| Msg::SetFilter(input_value(&e)))}
            />
            <input
                class="model"
                title="Model"
                value={component.model.clone()}
                oninput={link.callback(|e: InputEvent| Msg::SetModel(input_value(&e)))}
            />
            <input
                class="temperature"
                title="Temperature"
                type="number"
                step="0.1"
                min="0"
                max="2"
                value={component.temperature.clone()}
                oninput={link.callback(|e: InputEvent| Msg::SetTemperature(input_value(&e)))}
            />
            { icon_button("playlist_play", &batch_label, link.callback(|_| Msg::StartBatch), busy) }
            { icon_button("download", "Export results", link.callback(|_| Msg::ExportResults), nothing_to_export) }
            { icon_button("refresh", "Reload", link.callback(|_| Msg::LoadSolutions), busy) }
            { icon_button("delete_sweep", "Clear all", link.callback(|_| Msg::ClearSolutions), busy) }
            <CsvDataSourceComponent on_uploaded={link.callback(|_| Msg::LoadSolutions)} />
        </div>
    }
}

fn icon_button(icon: &str, label: &str, onclick: Callback<MouseEvent>, disabled: bool) -> Html {
    html! {
        <button class="icon-btn" title={label.to_string()} {onclick} {disabled}>
            <i class="material-icons">{ icon.to_string() }</i>
            <span class="icon-label">{ label.to_string() }</span>
        </button>
    }
}

fn input_value(e: &InputEvent) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn build_progress(component: &SolutionsComponent) -> Html {
    match (&component.batch, &component.last_summary) {
        (Some(progress), _) => html! {
            <div class="batch-progress">
                <progress max={progress.total.to_string()} value={progress.finished.to_string()} />
                <span>{ progress.status.clone() }</span>
            </div>
        },
        (None, Some(summary)) => html! {
            <div class="batch-progress done">{ format!("Last batch: {}", summary) }</div>
        },
        (None, None) => html! {},
    }
}

fn build_table(
    component: &SolutionsComponent,
    link: &Scope<SolutionsComponent>,
    rows: &[&SolutionRecord],
) -> Html {
    html! {
        <table class="solutions">
            <thead>
                <tr>
                    <th>{ "Solution ID" }</th>
                    <th>{ "Challenge" }</th>
                    <th>{ "Summary" }</th>
                    { for CRITERIA.iter().map(|c| html! {
                        <th title={c.description}>{ c.id.to_string() }</th>
                    }) }
                    <th>{ "Overall" }</th>
                    <th>{ "Status" }</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                { for rows.iter().map(|s| build_row(component, link, s)) }
            </tbody>
        </table>
    }
}

fn build_row(
    component: &SolutionsComponent,
    link: &Scope<SolutionsComponent>,
    solution: &SolutionRecord,
) -> Html {
    let id = solution.solution_id.clone();
    let result = component.results.get(&id);
    let error = component.errors.get(&id);
    let evaluating = component.evaluating.contains(&id);

    let status = if evaluating {
        html! { <span class="state">{ "evaluating" }</span> }
    } else if let Some(e) = error {
        let retry_id = id.clone();
        html! {
            <span class="state error" title={e.clone()}>
                { "failed " }
                <button onclick={link.callback(move |_| Msg::Evaluate(retry_id.clone()))}>
                    { "Retry" }
                </button>
            </span>
        }
    } else if let Some(state) = component.item_states.get(&id) {
        html! { <span class="state">{ state_label(*state) }</span> }
    } else {
        html! {}
    };

    let evaluate_id = id.clone();
    let history_id = id.clone();
    html! {
        <tr key={id.clone()}>
            <td>{ id.clone() }</td>
            <td>{ solution.fields.challenge_name.clone().unwrap_or_default() }</td>
            <td class="summary">{ solution.fields.summary.clone().unwrap_or_default() }</td>
            { criteria_cells(result) }
            <td>{ result.map(|r| verdict_badge(r.overall_verdict)).unwrap_or_default() }</td>
            <td>{ status }</td>
            <td>
                <button
                    disabled={evaluating || component.batch_running()}
                    onclick={link.callback(move |_| Msg::Evaluate(evaluate_id.clone()))}
                >
                    { "Evaluate" }
                </button>
                <button onclick={link.callback(move |_| Msg::ShowHistory(history_id.clone()))}>
                    { "History" }
                </button>
            </td>
        </tr>
    }
}

fn criteria_cells(result: Option<&EvaluationResponse>) -> Html {
    html! {
        <>
        { for CRITERIA.iter().map(|c| {
            let cell = result.and_then(|r| r.criterion(c.id));
            match cell {
                Some(criterion) => html! {
                    <td title={criterion.reasoning.clone()}>{ verdict_badge(criterion.result) }</td>
                },
                None => html! { <td></td> },
            }
        }) }
        </>
    }
}

fn verdict_badge(verdict: Verdict) -> Html {
    let class = if verdict.is_pass() { "badge pass" } else { "badge fail" };
    html! { <span class={class}>{ verdict.as_str() }</span> }
}

fn history_sheet(component: &SolutionsComponent, link: &Scope<SolutionsComponent>) -> Html {
    let title = component
        .history_for
        .as_deref()
        .map(|id| format!("Evaluation history of {}", id))
        .unwrap_or_default();

    html! {
        <YwMaterialTopSheet node_ref={component.history_ref.clone()}>
            <div class="history">
                <div class="history-header">
                    <h3>{ title }</h3>
                    <button onclick={link.callback(|_| Msg::CloseHistory)}>{ "✕" }</button>
                </div>
                {
                    if component.history.is_empty() {
                        html! { <p>{ "No evaluations yet." }</p> }
                    } else {
                        html! {
                            <table>
                                <thead>
                                    <tr>
                                        <th>{ "#" }</th>
                                        <th>{ "When" }</th>
                                        <th>{ "Model" }</th>
                                        <th>{ "Temperature" }</th>
                                        <th>{ "Verdict" }</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    { for component.history.iter().map(|e| html! {
                                        <tr key={e.id.to_string()}>
                                            <td>{ e.id.to_string() }</td>
                                            <td>{ e.timestamp.clone() }</td>
                                            <td>{ e.model_used.clone() }</td>
                                            <td>{ e.temperature.clone() }</td>
                                            <td>{ verdict_badge(e.overall_verdict) }</td>
                                        </tr>
                                    }) }
                                </tbody>
                            </table>
                        }
                    }
                }
            </div>
        </YwMaterialTopSheet>
    }
}
