use dioxus::prelude::*;

use intake_core::model::QuestionId;

use crate::vm::{ExportDialogVm, ProgressBarVm, QuestionVm, SectionTileVm};

#[component]
pub fn IntakeHeader(title: String, description: String) -> Element {
    rsx! {
        header { class: "intake-header",
            h1 { "{title}" }
            if !description.is_empty() {
                p { class: "intake-description", "{description}" }
            }
        }
    }
}

#[component]
pub fn EmailField(value: String, on_change: Callback<String>) -> Element {
    rsx! {
        div { class: "panel email-field",
            label { r#for: "user-email", "Email (optional - for saving progress)" }
            input {
                id: "user-email",
                r#type: "email",
                value: "{value}",
                placeholder: "your.email@example.com",
                oninput: move |evt| on_change.call(evt.value()),
            }
        }
    }
}

#[component]
pub fn ProgressBar(vm: ProgressBarVm) -> Element {
    rsx! {
        div { class: "panel progress",
            div { class: "progress-head",
                span { class: "progress-title", "Overall Progress" }
                span { class: "progress-value", "{vm.percentage}% complete" }
            }
            div { class: "progress-track",
                div { class: "progress-fill", style: "{vm.width_style()}" }
            }
            div { class: "progress-foot",
                span { "Section {vm.section_position} of {vm.section_count}" }
                span { class: "progress-autosave", "Auto-saving enabled" }
            }
        }
    }
}

#[component]
pub fn SectionNav(tiles: Vec<SectionTileVm>, total_label: String, on_select: Callback<usize>) -> Element {
    rsx! {
        nav { class: "panel section-nav",
            h3 { "Choose Any Section to Start Filling" }
            div { class: "section-tiles",
                for tile in tiles {
                    SectionTile { key: "{tile.index}", tile: tile.clone(), on_select }
                }
            }
            div { class: "section-total", "{total_label}" }
        }
    }
}

#[component]
fn SectionTile(tile: SectionTileVm, on_select: Callback<usize>) -> Element {
    let index = tile.index;
    let current_class = if tile.is_current { "current" } else { "" };
    rsx! {
        button {
            class: "section-tile {tile.status_class} {current_class}",
            r#type: "button",
            onclick: move |_| on_select.call(index),
            div { class: "section-icon", "{tile.icon}" }
            div { class: "section-title", "{tile.title}" }
            div { class: "section-count", "{tile.answered_label}" }
            if let Some(style) = tile.inline_bar_style.as_ref() {
                div { class: "section-bar",
                    div { class: "section-bar-fill", style: "{style}" }
                }
            }
        }
    }
}

#[component]
pub fn QuestionCard(question: QuestionVm, on_change: Callback<(QuestionId, String)>) -> Element {
    let id = question.id.clone();
    rsx! {
        article { class: "question-card",
            div { class: "question-head",
                h3 { "{question.number}. {question.text}" }
                if question.answered {
                    span { class: "badge-answered", "✓ Answered" }
                }
            }
            if let Some(hint) = question.hint.as_ref() {
                p { class: "question-hint", "💡 {hint}" }
            }
            div { class: "question-examples",
                if let Some(good) = question.example_good.as_ref() {
                    div { class: "example-good",
                        div { class: "example-label", "✅ Good example:" }
                        div { "{good}" }
                    }
                }
                if let Some(bad) = question.example_bad.as_ref() {
                    div { class: "example-bad",
                        div { class: "example-label", "❌ Avoid:" }
                        div { "{bad}" }
                    }
                }
            }
            textarea {
                id: "{question.id}",
                rows: "4",
                placeholder: "Share your thoughts here...",
                value: "{question.answer}",
                oninput: move |evt| on_change.call((id.clone(), evt.value())),
            }
            div { class: "question-foot",
                span { "Recommended: 30-100 words" }
                span { class: "{question.band_class}", "{question.word_count_label}" }
            }
        }
    }
}

#[component]
pub fn NavButtons(
    position: usize,
    count: usize,
    section_title: String,
    is_first: bool,
    is_last: bool,
    finalizing: bool,
    on_previous: Callback<()>,
    on_next: Callback<()>,
    on_finalize: Callback<()>,
) -> Element {
    rsx! {
        div { class: "nav-buttons",
            button {
                class: "btn btn-secondary",
                r#type: "button",
                disabled: is_first,
                onclick: move |_| on_previous.call(()),
                "← Previous Section"
            }
            div { class: "nav-position",
                div { "Section {position} of {count}" }
                div { class: "nav-section-title", "{section_title}" }
            }
            if is_last {
                button {
                    class: "btn btn-complete",
                    r#type: "button",
                    disabled: finalizing,
                    onclick: move |_| on_finalize.call(()),
                    if finalizing { "Saving..." } else { "Complete & Export" }
                }
            } else {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_next.call(()),
                    "Next Section →"
                }
            }
        }
    }
}

#[component]
pub fn AutoSaveBadge(label: Option<String>, saving: bool) -> Element {
    let Some(label) = label else {
        return rsx! {};
    };
    let class = if saving { "autosave-badge saving" } else { "autosave-badge saved" };
    rsx! {
        div { class: "{class}", "{label}" }
    }
}

#[component]
pub fn AlertBanner(message: String, on_dismiss: Callback<()>) -> Element {
    rsx! {
        div { class: "alert", role: "alert",
            span { "{message}" }
            button {
                class: "btn alert-dismiss",
                r#type: "button",
                onclick: move |_| on_dismiss.call(()),
                "Dismiss"
            }
        }
    }
}

#[component]
pub fn ExportDialog(
    vm: ExportDialogVm,
    exporting: bool,
    on_download: Callback<()>,
    on_close: Callback<()>,
) -> Element {
    rsx! {
        div { class: "modal-overlay",
            div { class: "modal",
                h2 { "Ready to Export!" }
                p { "Your responses have been saved and are ready for download." }
                div { class: "modal-stats",
                    div {
                        div { class: "stat-value", "{vm.response_count}" }
                        div { class: "stat-label", "Responses" }
                    }
                    div {
                        div { class: "stat-value", "{vm.percentage_label}" }
                        div { class: "stat-label", "Complete" }
                    }
                }
                if let Some(email) = vm.linked_email.as_ref() {
                    p { class: "modal-email", "Linked to: {email}" }
                }
                p { class: "modal-file", "{vm.file_name}" }
                div { class: "modal-actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: exporting,
                        onclick: move |_| on_close.call(()),
                        "Close"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: exporting,
                        onclick: move |_| on_download.call(()),
                        if exporting { "Exporting..." } else { "Download JSON" }
                    }
                }
            }
        }
    }
}
