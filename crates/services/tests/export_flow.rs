mod support;

use std::sync::Arc;

use intake_core::export::{ExportDocument, ExportFlow};
use intake_core::model::{ExportFormat, FormState, QuestionId, Schema};
use intake_core::time::fixed_now;
use services::{Clock, ExportError, ExportService, IntakeService};
use storage::repository::Storage;

use support::RecordingSync;

fn build(
    storage: &Storage,
    sync: Arc<RecordingSync>,
    dir: &std::path::Path,
) -> (Arc<IntakeService>, ExportService) {
    let intake = Arc::new(IntakeService::new(
        Clock::fixed(fixed_now()),
        Arc::new(Schema::builtin().unwrap()),
        Arc::clone(&storage.form_state),
    ));
    let exporter = ExportService::new(
        Arc::clone(&intake),
        sync,
        dir.join("exports"),
        ExportFormat::WithQuestions,
    );
    (intake, exporter)
}

async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn finalize_then_export_writes_dated_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::in_memory();
    let sync = Arc::new(RecordingSync::default());
    let (intake, exporter) = build(&storage, Arc::clone(&sync), dir.path());

    let mut state = intake.load().await.unwrap();
    state.set_user_email(Some("me@example.com".into()));
    intake
        .record_answer(&mut state, &QuestionId::new("identity_intro"), "I build things.")
        .await
        .unwrap();
    intake
        .record_answer(&mut state, &QuestionId::new("values_core"), "   ")
        .await
        .unwrap();

    let receipt = exporter.finalize(&state).await.unwrap();
    assert_eq!(receipt.response_count, 1);
    assert_eq!(receipt.completion_percentage, 7);
    assert_eq!(sync.save_count(), 1);
    assert!(!sync.saves.lock().unwrap()[0].is_auto_save);

    let outcome = exporter.export(&state).await.unwrap();
    assert_eq!(
        outcome.path.file_name().unwrap().to_str().unwrap(),
        "mindclone-responses-2023-11-14.json"
    );
    assert_eq!(outcome.receipt, receipt);
    assert_eq!(exporter.flow(), ExportFlow::Done(receipt));

    let raw = std::fs::read_to_string(&outcome.path).unwrap();
    assert!(raw.contains("\n  \"timestamp\""));
    let document = ExportDocument::from_json(&raw).unwrap();
    assert_eq!(document.user_email.as_deref(), Some("me@example.com"));
    assert_eq!(&document.responses, state.responses());
    assert_eq!(document.sections.as_ref().unwrap().len(), 5);

    settle().await;
    assert_eq!(sync.export_count(), 1);
}

#[tokio::test]
async fn sink_receives_the_written_document() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::in_memory();
    let sync = Arc::new(RecordingSync::default());
    let (intake, exporter) = build(&storage, Arc::clone(&sync), dir.path());

    let mut state = intake.load().await.unwrap();
    intake
        .record_answer(&mut state, &QuestionId::new("identity_intro"), "Sea town kid.")
        .await
        .unwrap();
    let outcome = exporter.export(&state).await.unwrap();
    settle().await;

    let raw = std::fs::read_to_string(&outcome.path).unwrap();
    let written: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let sent = serde_json::to_value(&sync.exports.lock().unwrap()[0]).unwrap();
    assert_eq!(sent, written);
    for key in ["totalResponses", "completionPercentage", "sections", "metadata"] {
        assert!(sent.get(key).is_some(), "missing {key}");
    }
}

#[tokio::test]
async fn export_then_import_reproduces_responses() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::in_memory();
    let (intake, exporter) = build(&storage, Arc::new(RecordingSync::default()), dir.path());

    let mut state = FormState::new(&intake.schema());
    state
        .set_answer(
            &intake.schema(),
            &QuestionId::new("stories_funny"),
            "Line one\nLine \"two\" - with unicode ✓",
        )
        .unwrap();
    let outcome = exporter.export(&state).await.unwrap();

    intake.clear().await.unwrap();
    let restored = exporter.import(&outcome.path).await.unwrap();
    assert_eq!(&restored, state.responses());
    assert_eq!(
        storage.form_state.load_responses().await.unwrap().as_ref(),
        Some(state.responses())
    );
}

#[tokio::test]
async fn empty_export_is_valid_and_zero_percent() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::in_memory();
    let (intake, exporter) = build(&storage, Arc::new(RecordingSync::default()), dir.path());

    let state = FormState::new(&intake.schema());
    let outcome = exporter.export(&state).await.unwrap();
    assert_eq!(outcome.receipt.completion_percentage, 0);
    assert_eq!(outcome.receipt.response_count, 0);

    let raw = std::fs::read_to_string(&outcome.path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["totalResponses"], 0);
    assert!(value.get("userEmail").is_none());
}

#[tokio::test]
async fn sink_failure_does_not_fail_export() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::in_memory();
    let sync = Arc::new(RecordingSync::failing());
    let (intake, exporter) = build(&storage, Arc::clone(&sync), dir.path());

    let state = FormState::new(&intake.schema());
    exporter.finalize(&state).await.unwrap();
    let outcome = exporter.export(&state).await.unwrap();
    assert!(outcome.path.exists());

    settle().await;
    assert_eq!(sync.export_count(), 1);
}

#[tokio::test]
async fn write_failure_resets_flow() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("exports");
    std::fs::write(&blocker, "not a directory").unwrap();

    let storage = Storage::in_memory();
    let (intake, exporter) = build(&storage, Arc::new(RecordingSync::default()), dir.path());

    let state = FormState::new(&intake.schema());
    let err = exporter.export(&state).await.unwrap_err();
    assert!(matches!(err, ExportError::Write { .. }));
    assert_eq!(exporter.flow(), ExportFlow::Idle);
}

#[tokio::test]
async fn import_rejects_non_export_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bogus.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let storage = Storage::in_memory();
    let (_intake, exporter) = build(&storage, Arc::new(RecordingSync::default()), dir.path());
    let err = exporter.import(&path).await.unwrap_err();
    assert!(matches!(err, ExportError::Document(_)));
}
