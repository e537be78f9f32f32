//! CSV upload button. Picks a file, posts it to `/api/solutions/upload` and
//! tells the parent once the server has imported it.

use gloo_console::error;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::solutions::show_toast;
use crate::services::api;

#[derive(Properties, PartialEq)]
pub struct CsvDataSourceProps {
    /// Called with the number of imported solutions.
    pub on_uploaded: Callback<usize>,
}

pub enum Msg {
    OpenFileDialog,
    FileSelected(web_sys::File),
    Uploaded(Result<common::responses::UploadSummary, String>),
}

pub struct CsvDataSourceComponent {
    file_input_ref: NodeRef,
    uploading: bool,
}

impl Component for CsvDataSourceComponent {
    type Message = Msg;
    type Properties = CsvDataSourceProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            file_input_ref: NodeRef::default(),
            uploading: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::OpenFileDialog => {
                if let Some(input) = self.file_input_ref.cast::<HtmlInputElement>() {
                    input.click();
                }
                false
            }
            Msg::FileSelected(file) => {
                self.uploading = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Uploaded(api::upload_solutions(file).await));
                });
                true
            }
            Msg::Uploaded(result) => {
                self.uploading = false;
                if let Some(input) = self.file_input_ref.cast::<HtmlInputElement>() {
                    input.set_value("");
                }
                match result {
                    Ok(summary) => {
                        show_toast(&summary.message);
                        ctx.props().on_uploaded.emit(summary.imported);
                    }
                    Err(e) => {
                        error!(format!("CSV upload failed: {}", e));
                        show_toast(&e);
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let label = if self.uploading { "Uploading..." } else { "CSV" };
        let onchange = link.batch_callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            input
                .files()
                .and_then(|files| files.get(0))
                .map(Msg::FileSelected)
        });

        html! {
            <>
                <input
                    type="file"
                    accept=".csv,text/csv"
                    style="display:none"
                    ref={self.file_input_ref.clone()}
                    {onchange}
                />
                <button
                    class="icon-btn"
                    title="Upload solutions CSV"
                    disabled={self.uploading}
                    onclick={link.callback(|_| Msg::OpenFileDialog)}
                >
                    <i class="material-icons">{ "table_chart" }</i>
                    <span class="icon-label">{ label }</span>
                </button>
            </>
        }
    }
}
