use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn CompleteView(responses: usize, percentage: u32) -> Element {
    let ctx = use_context::<AppContext>();
    let exporter = ctx.exporter();
    let export_dir = exporter.export_dir().display().to_string();
    let opener = ctx.link_opener();
    let dir_for_open = export_dir.clone();

    rsx! {
        div { class: "page complete",
            h2 { "🎉 Thank you!" }
            p { "Your responses have been exported." }
            div { class: "modal-stats",
                div {
                    div { class: "stat-value", "{responses}" }
                    div { class: "stat-label", "Responses" }
                }
                div {
                    div { class: "stat-value", "{percentage}%" }
                    div { class: "stat-label", "Complete" }
                }
            }
            p { class: "complete-path", "Saved to {export_dir}" }
            div { class: "complete-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| opener.open_url(&dir_for_open),
                    "Open export folder"
                }
                Link { class: "btn btn-primary", to: Route::Intake {}, "Back to form" }
            }
        }
    }
}
