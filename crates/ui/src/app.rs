use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::AppContext;
use crate::routes::Route;

/// Root component. Expects an `AppContext` in the launch context.
#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let meta = ctx.schema().meta().clone();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "{meta.title}" }
        document::Meta { name: "description", content: "{meta.description}" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| {
                    tracing::error!(?errors, "intake view crashed");
                    rsx! {
                        div { class: "fatal",
                            h1 { "The form stopped unexpectedly" }
                            p { "Answers saved before this point are kept. Restart to continue." }
                            pre { "{errors:?}" }
                        }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
