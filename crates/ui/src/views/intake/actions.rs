use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tracing::error;

use intake_core::model::QuestionId;

use crate::context::AppContext;
use crate::routes::Route;

use super::state::{FinalizeState, IntakeState};

const SAVE_FAILED: &str = "Error saving data. Please try again.";
const EXPORT_FAILED: &str = "Export failed. Please try again.";

#[derive(Clone, Copy)]
pub struct IntakeActions {
    pub answer: Callback<(QuestionId, String)>,
    pub set_email: Callback<String>,
    pub go_to_section: Callback<usize>,
    pub next_section: Callback<()>,
    pub previous_section: Callback<()>,
    pub finalize: Callback<()>,
    pub download: Callback<()>,
    pub close_dialog: Callback<()>,
    pub dismiss_alert: Callback<()>,
}

#[allow(clippy::too_many_lines)]
pub fn use_intake_actions(ctx: &AppContext, state: IntakeState) -> IntakeActions {
    let navigator = use_navigator();
    let IntakeState {
        mut form,
        mut alert,
        mut finalize_state,
        mut dialog,
        mut exporting,
        ..
    } = state;

    let answer = {
        let ctx = ctx.clone();
        use_callback(move |(question_id, text): (QuestionId, String)| {
            let schema = ctx.schema();
            if let Err(err) = form.write().set_answer(&schema, &question_id, text) {
                error!(error = %err, "answer rejected");
                return;
            }
            // Responses reach the store only through the auto-saver.
            ctx.autosaver().schedule_form(&form.read());
        })
    };

    let set_email = {
        let ctx = ctx.clone();
        use_callback(move |value: String| {
            form.write().set_user_email(Some(value));
            let email = form.read().user_email().map(str::to_string);
            let intake = ctx.intake();
            spawn(async move {
                if let Err(err) = intake.save_user_email(email.as_deref()).await {
                    error!(error = %err, "failed to persist email");
                }
            });
        })
    };

    let go_to_section = {
        let ctx = ctx.clone();
        use_callback(move |index: usize| {
            let selected = form.write().jump_to(index);
            let autosaver = ctx.autosaver();
            let intake = ctx.intake();
            spawn(async move {
                if let Err(err) = autosaver.flush().await {
                    error!(error = %err, "auto-save flush failed");
                }
                if let Err(err) = intake.save_current_section(selected).await {
                    error!(error = %err, "failed to persist current section");
                }
            });
            let _ = eval("window.scrollTo(0, 0);");
        })
    };

    let next_section = use_callback(move |()| {
        let current = form.read().current_index();
        go_to_section.call(current.saturating_add(1));
    });

    let previous_section = use_callback(move |()| {
        let current = form.read().current_index();
        go_to_section.call(current.saturating_sub(1));
    });

    let finalize = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            if finalize_state() == FinalizeState::Saving {
                return;
            }
            finalize_state.set(FinalizeState::Saving);
            let exporter = ctx.exporter();
            let autosaver = ctx.autosaver();
            let snapshot = form();
            spawn(async move {
                autosaver.cancel();
                match exporter.finalize(&snapshot).await {
                    Ok(receipt) => dialog.set(Some(receipt)),
                    Err(err) => {
                        error!(error = %err, "finalize failed");
                        dialog.set(None);
                        alert.set(Some(SAVE_FAILED.to_string()));
                    }
                }
                finalize_state.set(FinalizeState::Idle);
            });
        })
    };

    let download = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            if exporting() {
                return;
            }
            exporting.set(true);
            let exporter = ctx.exporter();
            let snapshot = form();
            spawn(async move {
                match exporter.export(&snapshot).await {
                    Ok(outcome) => {
                        exporting.set(false);
                        dialog.set(None);
                        navigator.push(Route::Complete {
                            responses: outcome.receipt.response_count,
                            percentage: outcome.receipt.completion_percentage,
                        });
                    }
                    Err(err) => {
                        error!(error = %err, "export failed");
                        exporting.set(false);
                        exporter.reset();
                        alert.set(Some(EXPORT_FAILED.to_string()));
                    }
                }
            });
        })
    };

    let close_dialog = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            if exporting() {
                return;
            }
            dialog.set(None);
            ctx.exporter().reset();
        })
    };

    let dismiss_alert = use_callback(move |()| alert.set(None));

    IntakeActions {
        answer,
        set_email,
        go_to_section,
        next_section,
        previous_section,
        finalize,
        download,
        close_dialog,
        dismiss_alert,
    }
}
