use crate::components::solutions::SolutionsComponent;
use yew::{html, Component, Context, Html};

pub struct App;

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="app">
                <header class="app-header">
                    <h1>{ "Solution Screener" }</h1>
                </header>
                <SolutionsComponent />
            </div>
        }
    }
}
