use std::sync::Arc;

use async_trait::async_trait;
use intake_core::model::{QuestionId, Responses};
use storage::repository::{LocalStore, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_storage};

struct FailingStore;

#[async_trait]
impl LocalStore for FailingStore {
    async fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn intake_view_smoke_renders_first_section() {
    let mut harness = setup_view_harness(ViewKind::Intake);
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Mindclone Data Intake"), "missing title in {html}");
    assert!(html.contains("Background"), "missing section title in {html}");
    assert!(html.contains("0% complete"), "missing percentage in {html}");
    assert!(html.contains("Section 1 of 5"), "missing position in {html}");
    assert!(
        html.contains("Total Progress: 0 / 15 questions completed"),
        "missing total in {html}"
    );
    assert!(html.contains("your.email@example.com"), "missing email field in {html}");
    assert!(html.contains("Next Section"), "missing next button in {html}");
    assert!(!html.contains("btn-complete"), "unexpected finalize in {html}");
    assert!(!html.contains("Ready to Export!"), "dialog should be closed in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn intake_view_smoke_restores_answers() {
    let storage = Storage::in_memory();
    let mut responses = Responses::new();
    responses.set(QuestionId::new("identity_intro"), "I grew up by the sea.");
    storage.form_state.save_responses(&responses).await.unwrap();
    storage.form_state.save_current_section(0).await.unwrap();

    let mut harness = setup_view_harness_with_storage(ViewKind::Intake, storage);
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("✓ Answered"), "missing answered badge in {html}");
    assert!(html.contains("I grew up by the sea."), "missing answer in {html}");
    assert!(html.contains("7% complete"), "missing percentage in {html}");
    assert!(html.contains("1/3 questions"), "missing tile count in {html}");
    assert!(html.contains("6 words"), "missing word count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn intake_view_smoke_last_section_offers_export() {
    let storage = Storage::in_memory();
    storage.form_state.save_current_section(99).await.unwrap();

    let mut harness = setup_view_harness_with_storage(ViewKind::Intake, storage);
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Section 5 of 5"), "missing position in {html}");
    assert!(html.contains("btn-complete"), "missing finalize in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn intake_view_smoke_renders_error_state() {
    let storage = Storage::from_local(Arc::new(FailingStore));
    let mut harness = setup_view_harness_with_storage(ViewKind::Intake, storage);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Your saved answers could not be loaded"),
        "missing store error in {html}"
    );
    assert!(!html.contains("Something went wrong"), "generic error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn complete_view_smoke_renders_counts() {
    let mut harness = setup_view_harness(ViewKind::Complete {
        responses: 12,
        percentage: 80,
    });
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Thank you!"), "missing heading in {html}");
    assert!(html.contains("12"), "missing count in {html}");
    assert!(html.contains("80%"), "missing percentage in {html}");
    assert!(html.contains("Open export folder"), "missing open button in {html}");
    assert!(harness.opener.opened.lock().unwrap().is_empty());
}
