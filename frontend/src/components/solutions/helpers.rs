//! Pure helpers of the solutions view plus the toast and download DOM glue.

use common::batch::{BatchEvent, ItemState};
use common::model::solution::SolutionRecord;
use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlElement, Url};

/// Rows matching `filter` on solution id or challenge name, in store order.
pub fn visible_solutions<'a>(
    solutions: &'a [SolutionRecord],
    filter: &str,
) -> Vec<&'a SolutionRecord> {
    let needle = filter.trim().to_lowercase();
    solutions
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.solution_id.to_lowercase().contains(&needle)
                || s.fields
                    .challenge_name
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn parse_temperature(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("Temperature '{}' is not a number", raw.trim()))?;
    if !(0.0..=2.0).contains(&value) {
        return Err(format!("Temperature {} is outside 0 to 2", value));
    }
    Ok(value)
}

pub fn state_label(state: ItemState) -> &'static str {
    match state {
        ItemState::Pending => "pending",
        ItemState::InFlight => "evaluating",
        ItemState::Retrying => "retrying",
        ItemState::Succeeded => "done",
        ItemState::Skipped => "skipped",
    }
}

/// One-line status for the progress bar.
pub fn describe_event(event: &BatchEvent, total: usize) -> String {
    let position = format!("{}/{}", event.index() + 1, total);
    match event {
        BatchEvent::InFlight { solution_id, attempt, .. } if *attempt > 1 => {
            format!("{} evaluating {} (attempt {})", position, solution_id, attempt)
        }
        BatchEvent::InFlight { solution_id, .. } => {
            format!("{} evaluating {}", position, solution_id)
        }
        BatchEvent::RateLimited { solution_id, wait, .. } => format!(
            "{} rate limited on {}, waiting {}s",
            position,
            solution_id,
            wait.as_secs()
        ),
        BatchEvent::Retrying { solution_id, wait, reason, .. } => format!(
            "{} {} failed ({}), retrying in {}s",
            position,
            solution_id,
            reason,
            wait.as_secs()
        ),
        BatchEvent::Succeeded { solution_id, .. } => format!("{} {} done", position, solution_id),
        BatchEvent::Skipped { solution_id, reason, .. } => {
            format!("{} {} skipped: {}", position, solution_id, reason)
        }
    }
}

/// Temporary notification at the bottom of the screen.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        html_toast.remove();
                    });
                }
            }
        }
    }
}

/// Delay before the object URL of a download is revoked.
const REVOKE_DELAY_MS: u32 = 1000;

/// Offers `content` as a file download through a temporary object URL.
/// The URL is revoked once the browser has had time to start the download.
pub fn download_csv(filename: &str, content: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(REVOKE_DELAY_MS).await;
        Url::revoke_object_url(&url).ok();
    });
    Ok(())
}
