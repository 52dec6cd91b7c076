//! Debounced auto-save.
//!
//! One deferred task lives in a single slot. Every edit aborts the pending
//! sleeper and arms a new one, so a save fires once, `delay` after the last
//! edit. A save that has already left the slot runs to completion; the save
//! lock keeps consecutive saves from overlapping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use intake_core::autosave::AutoSaveStatus;
use intake_core::model::{FormState, Responses};
use intake_core::wire::SaveProgressRequest;

use crate::error::{AutoSaveError, SyncError};
use crate::intake_service::IntakeService;
use crate::sync::ProgressSync;

#[derive(Clone)]
pub struct AutoSaver {
    inner: Arc<Inner>,
}

struct Inner {
    intake: Arc<IntakeService>,
    sync: Arc<dyn ProgressSync>,
    delay: Duration,
    runtime: Handle,
    generation: AtomicU64,
    slot: Mutex<Option<Pending>>,
    save_lock: tokio::sync::Mutex<()>,
    status: watch::Sender<AutoSaveStatus>,
}

struct Pending {
    generation: u64,
    payload: Payload,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
struct Payload {
    responses: Responses,
    user_email: Option<String>,
}

impl AutoSaver {
    #[must_use]
    pub fn new(
        intake: Arc<IntakeService>,
        sync: Arc<dyn ProgressSync>,
        delay: Duration,
        runtime: Handle,
    ) -> Self {
        let (status, _) = watch::channel(AutoSaveStatus::idle());
        Self {
            inner: Arc::new(Inner {
                intake,
                sync,
                delay,
                runtime,
                generation: AtomicU64::new(0),
                slot: Mutex::new(None),
                save_lock: tokio::sync::Mutex::new(()),
                status,
            }),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    #[must_use]
    pub fn status(&self) -> AutoSaveStatus {
        *self.inner.status.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AutoSaveStatus> {
        self.inner.status.subscribe()
    }

    /// True while a save is armed but has not fired yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner
            .slot
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Re-arm the deferred save with the latest responses.
    pub fn schedule(&self, responses: Responses, user_email: Option<String>) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let payload = Payload {
            responses,
            user_email,
        };

        let inner = Arc::clone(&self.inner);
        let handle = self.inner.runtime.spawn(async move {
            tokio::time::sleep(inner.delay).await;
            let Some(payload) = inner.take_if_current(generation) else {
                return;
            };
            // Errors are logged inside `save`.
            let _ = inner.save(payload).await;
        });

        let Ok(mut slot) = self.inner.slot.lock() else {
            handle.abort();
            return;
        };
        if let Some(previous) = slot.replace(Pending {
            generation,
            payload,
            handle,
        }) {
            previous.handle.abort();
        }
    }

    /// Re-arm the deferred save from the current form. Nothing is written
    /// until the timer fires or the save is flushed.
    pub fn schedule_form(&self, form: &FormState) {
        self.schedule(
            form.responses().clone(),
            form.user_email().map(str::to_string),
        );
    }

    /// Drop a pending save without running it.
    pub fn cancel(&self) {
        if let Some(pending) = self.inner.take_pending() {
            pending.handle.abort();
        }
    }

    /// Run the pending save now, if there is one.
    ///
    /// Returns the save timestamp, or `None` when nothing was pending or the
    /// responses were empty.
    ///
    /// # Errors
    ///
    /// Returns `AutoSaveError` if the local store rejects the write.
    pub async fn flush(&self) -> Result<Option<DateTime<Utc>>, AutoSaveError> {
        let Some(pending) = self.inner.take_pending() else {
            return Ok(None);
        };
        pending.handle.abort();
        self.inner.save(pending.payload).await
    }

    /// Save immediately, bypassing the timer.
    ///
    /// # Errors
    ///
    /// Returns `AutoSaveError` if the local store rejects the write.
    pub async fn save_now(
        &self,
        responses: Responses,
        user_email: Option<String>,
    ) -> Result<Option<DateTime<Utc>>, AutoSaveError> {
        self.cancel();
        self.inner
            .save(Payload {
                responses,
                user_email,
            })
            .await
    }
}

impl Inner {
    fn take_pending(&self) -> Option<Pending> {
        self.slot.lock().ok().and_then(|mut slot| slot.take())
    }

    fn take_if_current(&self, generation: u64) -> Option<Payload> {
        let mut slot = self.slot.lock().ok()?;
        if slot.as_ref().map(|pending| pending.generation) != Some(generation) {
            return None;
        }
        slot.take().map(|pending| pending.payload)
    }

    async fn save(&self, payload: Payload) -> Result<Option<DateTime<Utc>>, AutoSaveError> {
        if payload.responses.is_empty() {
            return Ok(None);
        }

        let _guard = self.save_lock.lock().await;
        self.status.send_modify(|status| *status = status.begin());

        if let Err(err) = self.intake.save_snapshot(&payload.responses).await {
            error!(error = %err, "auto-save to local store failed");
            self.status.send_modify(|status| *status = status.abandon());
            return Err(err.into());
        }

        let request = SaveProgressRequest {
            responses: Some(payload.responses),
            user_email: payload.user_email,
            is_auto_save: true,
        };
        match self.sync.save_progress(&request).await {
            Ok(_) => debug!("auto-save synced"),
            Err(SyncError::Disabled) => debug!("progress sync disabled; saved locally only"),
            Err(err) => warn!(error = %err, "auto-save sync failed"),
        }

        // Stamped once the sync attempt has settled, not when the write began.
        let saved_at = self.intake.clock().now();
        self.status
            .send_modify(|status| *status = status.finish(saved_at));
        Ok(Some(saved_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use intake_core::model::{QuestionId, Schema};
    use intake_core::time::fixed_now;
    use storage::repository::Storage;

    use crate::Clock;
    use crate::sync::DisabledSync;

    fn saver(storage: &Storage, delay: Duration) -> AutoSaver {
        let intake = Arc::new(IntakeService::new(
            Clock::fixed(fixed_now()),
            Arc::new(Schema::builtin().unwrap()),
            Arc::clone(&storage.form_state),
        ));
        AutoSaver::new(intake, Arc::new(DisabledSync), delay, Handle::current())
    }

    fn one_answer(text: &str) -> Responses {
        let mut responses = Responses::new();
        responses.set(QuestionId::new("identity_intro"), text);
        responses
    }

    #[tokio::test(start_paused = true)]
    async fn save_fires_after_delay() {
        let storage = Storage::in_memory();
        let saver = saver(&storage, Duration::from_secs(10));

        saver.schedule(one_answer("hi"), None);
        assert!(saver.is_pending());

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(storage.form_state.load_responses().await.unwrap(), None);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(
            storage.form_state.load_responses().await.unwrap(),
            Some(one_answer("hi"))
        );
        assert!(!saver.is_pending());
        assert_eq!(saver.status().last_saved, Some(fixed_now()));
    }

    #[tokio::test(start_paused = true)]
    async fn flush_saves_immediately() {
        let storage = Storage::in_memory();
        let saver = saver(&storage, Duration::from_secs(10));

        saver.schedule(one_answer("now"), Some("a@b.c".into()));
        let saved = saver.flush().await.unwrap();
        assert_eq!(saved, Some(fixed_now()));
        assert!(!saver.is_pending());
        assert!(storage.form_state.load_autosave().await.unwrap().is_some());

        assert_eq!(saver.flush().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_responses_are_not_saved() {
        let storage = Storage::in_memory();
        let saver = saver(&storage, Duration::from_secs(1));

        saver.schedule(Responses::new(), None);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(storage.form_state.load_responses().await.unwrap(), None);
        assert!(saver.status().last_saved.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn form_edits_reach_the_store_only_through_the_timer() {
        let storage = Storage::in_memory();
        let saver = saver(&storage, Duration::from_secs(10));
        let schema = Schema::builtin().unwrap();

        let mut form = FormState::new(&schema);
        for text in ["d", "dr", "dra", "draft"] {
            form.set_answer(&schema, &QuestionId::new("identity_intro"), text)
                .unwrap();
            saver.schedule_form(&form);
            tokio::task::yield_now().await;
            assert_eq!(storage.form_state.load_responses().await.unwrap(), None);
        }

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(
            storage.form_state.load_responses().await.unwrap(),
            Some(one_answer("draft"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_save() {
        let storage = Storage::in_memory();
        let saver = saver(&storage, Duration::from_secs(1));

        saver.schedule(one_answer("gone"), None);
        saver.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(storage.form_state.load_responses().await.unwrap(), None);
    }
}
