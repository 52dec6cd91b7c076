use dioxus::prelude::*;

use intake_core::autosave::AutoSaveStatus;
use intake_core::export::ExportReceipt;
use intake_core::model::FormState;
use services::AutoSaver;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalizeState {
    Idle,
    Saving,
}

#[derive(Clone, Copy)]
pub struct IntakeState {
    pub form: Signal<FormState>,
    pub alert: Signal<Option<String>>,
    pub finalize_state: Signal<FinalizeState>,
    pub dialog: Signal<Option<ExportReceipt>>,
    pub exporting: Signal<bool>,
    pub autosave_status: Signal<AutoSaveStatus>,
}

pub fn use_intake_state(initial: &FormState, autosaver: &AutoSaver) -> IntakeState {
    let initial = initial.clone();
    let form = use_signal(move || initial);
    let alert = use_signal(|| None);
    let finalize_state = use_signal(|| FinalizeState::Idle);
    let dialog = use_signal(|| None);
    let exporting = use_signal(|| false);
    let autosave_status = use_autosave_status(autosaver);

    IntakeState {
        form,
        alert,
        finalize_state,
        dialog,
        exporting,
        autosave_status,
    }
}

/// Mirror the auto-saver's watch channel into a signal.
fn use_autosave_status(autosaver: &AutoSaver) -> Signal<AutoSaveStatus> {
    let initial = autosaver.status();
    let mut status = use_signal(move || initial);
    let autosaver = autosaver.clone();
    use_future(move || {
        let mut updates = autosaver.subscribe();
        async move {
            while updates.changed().await.is_ok() {
                let next = *updates.borrow_and_update();
                status.set(next);
            }
        }
    });
    status
}
