use dioxus::prelude::*;

use intake_core::model::FormState;
use intake_core::progress::ProgressSnapshot;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    local_autosave_label, map_export_dialog, map_progress_bar, map_questions, map_section_tiles,
    question_count_label, total_progress_label,
};

use super::actions::use_intake_actions;
use super::components::{
    AlertBanner, AutoSaveBadge, EmailField, ExportDialog, IntakeHeader, NavButtons, ProgressBar,
    QuestionCard, SectionNav,
};
use super::state::{FinalizeState, use_intake_state};

#[component]
pub fn IntakeView() -> Element {
    let ctx = use_context::<AppContext>();
    let intake = ctx.intake();

    let resource = use_resource(move || {
        let intake = intake.clone();
        async move {
            intake.load().await.map_err(|err| {
                tracing::error!(error = %err, "failed to load intake state");
                ViewError::from(&err)
            })
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page intake",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "loading", "Loading..." }
                },
                ViewState::Ready(initial) => rsx! {
                    IntakeForm { initial }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn IntakeForm(initial: FormState) -> Element {
    let ctx = use_context::<AppContext>();
    let schema = ctx.schema();
    let state = use_intake_state(&initial, &ctx.autosaver());
    let actions = use_intake_actions(&ctx, state);

    let form = (state.form)();
    let meta = schema.meta();
    let progress = ProgressSnapshot::compute(&schema, form.responses());
    let cursor = form.cursor();
    let current_index = cursor.index();

    let tiles = map_section_tiles(&schema, &progress, current_index);
    let total_label = total_progress_label(&progress);
    let bar = map_progress_bar(&progress, current_index);
    let current_section = form.current_section(&schema);
    let section_title = current_section
        .map(|s| s.title().to_string())
        .unwrap_or_default();
    let section_count_label = current_section
        .map(question_count_label)
        .unwrap_or_default();
    let questions = current_section
        .map(|s| map_questions(s, form.responses()))
        .unwrap_or_default();

    let autosave_status = (state.autosave_status)();
    let autosave_text = local_autosave_label(autosave_status);
    let email_value = form.user_email().unwrap_or_default().to_string();
    let finalizing = (state.finalize_state)() == FinalizeState::Saving;
    let exporting = (state.exporting)();
    let alert = (state.alert)();
    let dialog = (state.dialog)().map(|receipt| {
        let file_name = intake_core::export::export_file_name(ctx.intake().clock().today());
        map_export_dialog(receipt, form.user_email(), file_name)
    });

    rsx! {
        IntakeHeader {
            title: meta.title.clone(),
            description: meta.description.clone(),
        }

        if let Some(message) = alert {
            AlertBanner { message, on_dismiss: actions.dismiss_alert }
        }

        if meta.settings.collect_email {
            EmailField { value: email_value, on_change: actions.set_email }
        }

        if meta.settings.show_progress_bar {
            ProgressBar { vm: bar }
        }

        SectionNav {
            tiles,
            total_label,
            on_select: actions.go_to_section,
        }

        if schema.section_count() == 0 {
            p { class: "empty", "This form has no sections." }
        } else {
            section { class: "question-form",
                div { class: "section-heading",
                    h2 { "{section_title}" }
                    div { class: "section-subtitle", "{section_count_label}" }
                }
                for question in questions {
                    QuestionCard {
                        key: "{question.id}",
                        question: question.clone(),
                        on_change: actions.answer,
                    }
                }
            }

            NavButtons {
                position: cursor.position(),
                count: cursor.count(),
                section_title,
                is_first: cursor.is_first(),
                is_last: cursor.is_last(),
                finalizing,
                on_previous: actions.previous_section,
                on_next: actions.next_section,
                on_finalize: actions.finalize,
            }
        }

        AutoSaveBadge { label: autosave_text, saving: autosave_status.is_saving() }

        if let Some(vm) = dialog {
            ExportDialog {
                vm,
                exporting,
                on_download: actions.download,
                on_close: actions.close_dialog,
            }
        }
    }
}
