//! Solutions screen: table of uploaded solutions with single and batch
//! evaluation, evaluation history and results export.
//!
//! Layout follows the other components: `state` holds the struct, `update`
//! the message handling, `view` the markup and `helpers` the pure functions
//! plus DOM glue.

use yew::prelude::*;

mod helpers;
mod messages;
mod state;
mod update;
mod view;

pub use helpers::show_toast;
pub use messages::Msg;
pub use state::SolutionsComponent;

impl Component for SolutionsComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        SolutionsComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            ctx.link().send_message(Msg::LoadSolutions);
        }
    }
}
