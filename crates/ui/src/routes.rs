use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{CompleteView, IntakeView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", IntakeView)] Intake {},
        #[route("/complete/:responses/:percentage", CompleteView)] Complete { responses: usize, percentage: u32 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
