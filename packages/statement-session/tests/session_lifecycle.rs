//! Integration tests for the extraction session lifecycle.
//!
//! These tests drive a session the way a front end does:
//! 1. Edit the schema and pick a file
//! 2. Submit against a scripted gateway
//! 3. Read the result through the view models

use std::sync::Arc;

use statement_session::testing::{
    image_document, pdf_document, sample_rows, RecordingPreviews, ScriptedGateway,
};
use statement_session::{
    FilePickerView, GatewayError, Phase, ResultView, Schema, SchemaEdit, SchemaError,
    SelectionError, Session, SessionStatus, Transaction, ViewMode,
};

/// Helper to create a session with a recording preview backend.
fn new_session() -> (Session, RecordingPreviews) {
    let previews = RecordingPreviews::new();
    let session = Session::new(Arc::new(previews.clone()));
    (session, previews)
}

/// Helper to create a session that is ready to submit.
fn ready_session() -> (Session, RecordingPreviews) {
    let (mut session, previews) = new_session();
    session.add_column("Date").unwrap();
    session.add_column("Amount").unwrap();
    session.select_file(pdf_document("statement.pdf")).unwrap();
    (session, previews)
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_happy_path() {
    let (mut session, _) = ready_session();
    let gateway = ScriptedGateway::new().with_rows(sample_rows());

    assert!(session.submit(&gateway).await);

    assert_eq!(session.phase(), Phase::Succeeded);
    assert_eq!(session.rows().len(), 2);
    assert!(session.error_message().is_none());

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].file_name, "statement.pdf");
    assert_eq!(calls[0].column_names, vec!["Date", "Amount"]);
}

#[tokio::test]
async fn test_failure_then_retry() {
    let (mut session, _) = ready_session();
    let gateway = ScriptedGateway::new()
        .with_error(GatewayError::ServiceFailure("HTTP 500: boom".into()))
        .with_rows(sample_rows());

    assert!(session.submit(&gateway).await);
    assert_eq!(session.phase(), Phase::Failed);
    assert!(session.rows().is_empty());
    assert!(session.error_message().is_some());
    assert!(session.can_submit());

    assert!(session.submit(&gateway).await);
    assert_eq!(session.phase(), Phase::Succeeded);
    assert_eq!(session.rows().len(), 2);
    assert!(session.error_message().is_none());
}

#[tokio::test]
async fn test_failed_retry_keeps_previous_rows() {
    let (mut session, _) = ready_session();
    let gateway = ScriptedGateway::new()
        .with_rows(sample_rows())
        .with_error(GatewayError::NetworkFailure("connection refused".into()));

    session.submit(&gateway).await;
    session.submit(&gateway).await;

    assert_eq!(session.phase(), Phase::Failed);
    assert_eq!(session.rows(), sample_rows().as_slice());
    assert_eq!(
        session.last_error(),
        Some(&GatewayError::NetworkFailure("connection refused".into()))
    );
}

#[tokio::test]
async fn test_missing_key_renders_empty_cell() {
    let (mut session, _) = ready_session();
    let gateway =
        ScriptedGateway::new().with_rows(vec![Transaction::new("1").with("Date", "2024-03-01")]);

    session.submit(&gateway).await;

    let view = ResultView::of(&session);
    assert_eq!(
        view.table(),
        vec![vec!["2024-03-01".to_string(), String::new()]]
    );
}

#[tokio::test]
async fn test_export_round_trip() {
    let (mut session, _) = ready_session();
    let gateway = ScriptedGateway::new().with_rows(vec![Transaction::new("1")
        .with("Date", "2024-01-01")
        .with("Amount", 100i64)]);

    session.submit(&gateway).await;

    let csv = ResultView::of(&session).to_csv_string().unwrap();
    assert_eq!(csv, "\"Date\",\"Amount\"\n\"2024-01-01\",\"100\"\n");
}

// =============================================================================
// Submission gating
// =============================================================================

#[tokio::test]
async fn test_submit_is_noop_without_file_or_columns() {
    let gateway = ScriptedGateway::new().with_rows(sample_rows());

    let (mut no_file, _) = new_session();
    no_file.add_column("Date").unwrap();
    assert!(!no_file.can_submit());
    assert!(!no_file.submit(&gateway).await);
    assert_eq!(no_file.phase(), Phase::Idle);

    let (mut no_columns, _) = new_session();
    no_columns.select_file(pdf_document("a.pdf")).unwrap();
    assert!(!no_columns.can_submit());
    assert!(!no_columns.submit(&gateway).await);
    assert_eq!(no_columns.phase(), Phase::Idle);

    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_second_submission_while_in_flight_is_noop() {
    let (mut session, _) = ready_session();
    let gateway = ScriptedGateway::new().with_rows(sample_rows());

    let first = session.begin_submission().expect("accepted");
    assert_eq!(session.phase(), Phase::Submitting);
    assert!(session.is_loading());
    assert!(!session.can_submit());

    assert!(session.begin_submission().is_none());
    assert!(!session.submit(&gateway).await);
    assert_eq!(gateway.call_count(), 0);

    let completion = first.run(&gateway).await;
    assert!(session.complete(completion));
    assert_eq!(session.phase(), Phase::Succeeded);
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn test_can_submit_predicts_submit() {
    let gateway = ScriptedGateway::new()
        .with_rows(sample_rows())
        .with_rows(sample_rows());
    let (mut session, _) = new_session();

    // Walk through states with and without file/columns
    let steps: Vec<Box<dyn Fn(&mut Session)>> = vec![
        Box::new(|_: &mut Session| {}),
        Box::new(|s: &mut Session| {
            s.add_column("Date").unwrap();
        }),
        Box::new(|s: &mut Session| {
            s.select_file(pdf_document("a.pdf")).unwrap();
        }),
        Box::new(|s: &mut Session| s.clear_file()),
    ];

    for step in steps {
        step(&mut session);
        let predicted = session.can_submit();
        let calls_before = gateway.call_count();
        let accepted = session.submit(&gateway).await;
        assert_eq!(predicted, accepted);
        assert_eq!(gateway.call_count() - calls_before, usize::from(accepted));
    }
}

#[tokio::test]
async fn test_edits_during_flight_do_not_affect_captured_request() {
    let (mut session, _) = ready_session();
    let gateway = ScriptedGateway::new().with_rows(sample_rows());

    let submission = session.begin_submission().unwrap();

    session.add_column("Balance").unwrap();
    session.select_file(pdf_document("other.pdf")).unwrap();
    assert_eq!(session.phase(), Phase::Submitting);

    let completion = submission.run(&gateway).await;
    assert!(session.complete(completion));

    let calls = gateway.calls();
    let call = &calls[0];
    assert_eq!(call.file_name, "statement.pdf");
    assert_eq!(call.column_names, vec!["Date", "Amount"]);
    assert_eq!(session.schema().len(), 3);
}

#[tokio::test]
async fn test_stale_and_foreign_completions_are_ignored() {
    let (mut session, _) = ready_session();
    let (mut other, _) = ready_session();
    let gateway = ScriptedGateway::new()
        .with_rows(sample_rows())
        .with_rows(vec![]);

    let submission = session.begin_submission().unwrap();
    let foreign = other.begin_submission().unwrap();

    let completion = submission.run(&gateway).await;
    let replayed = completion.clone();
    assert!(session.complete(completion));

    // Same completion again: this session no longer owns it
    assert!(!session.complete(replayed));
    assert_eq!(session.rows().len(), 2);

    let foreign_completion = foreign.run(&gateway).await;
    assert!(!session.complete(foreign_completion));
    assert_eq!(session.phase(), Phase::Succeeded);
    assert_eq!(session.rows().len(), 2);
}

#[tokio::test]
async fn test_submission_ids_increase() {
    let (mut session, _) = ready_session();
    let gateway = ScriptedGateway::new()
        .with_rows(vec![])
        .with_rows(vec![]);

    let first = session.begin_submission().unwrap();
    let first_id = first.id();
    session.complete(first.run(&gateway).await);

    let second = session.begin_submission().unwrap();
    assert!(second.id().sequence() > first_id.sequence());
    assert_ne!(second.id(), first_id);
}

#[tokio::test]
async fn test_accepting_submission_clears_error() {
    let (mut session, _) = ready_session();
    let gateway = ScriptedGateway::new().with_error(GatewayError::MalformedResponse(
        "missing transactions".into(),
    ));
    session.submit(&gateway).await;
    assert!(session.error_message().is_some());

    let _submission = session.begin_submission().unwrap();
    assert!(session.error_message().is_none());
    assert_eq!(SessionStatus::of(&session).phase_label, "Extracting");
}

// =============================================================================
// Schema and file selection
// =============================================================================

#[test]
fn test_blank_column_names_leave_schema_unchanged() {
    let (mut session, _) = new_session();
    session.add_column("Date").unwrap();
    let before = session.schema().clone();

    assert_eq!(session.add_column("").unwrap_err(), SchemaError::InvalidInput);
    assert_eq!(session.add_column("   ").unwrap_err(), SchemaError::InvalidInput);
    assert_eq!(session.schema(), &before);
}

#[test]
fn test_schema_edits_through_session() {
    let (mut session, _) = new_session();
    session
        .apply_schema_edit(SchemaEdit::Add("Description".into()))
        .unwrap();
    let id = session.schema().columns()[0].id.clone();

    session.remove_column(&id);
    assert!(session.schema().is_empty());

    session.set_schema(Schema::new().with_column("Amount").unwrap());
    assert_eq!(session.schema().column_names(), vec!["Amount"]);
}

#[test]
fn test_non_pdf_keeps_previous_selection_and_preview() {
    let (mut session, previews) = new_session();
    let preview = session
        .select_file(pdf_document("jan.pdf"))
        .unwrap()
        .preview()
        .id();

    let err = session.select_file(image_document("scan.png")).unwrap_err();
    assert!(matches!(err, SelectionError::UnsupportedType { .. }));

    let file = session.file().unwrap();
    assert_eq!(file.document().file_name(), "jan.pdf");
    assert_eq!(file.preview().id(), preview);
    assert_eq!(previews.live(), vec![preview]);
    assert_eq!(previews.released_count(), 0);
}

#[test]
fn test_at_most_one_live_preview() {
    let (mut session, previews) = new_session();

    for name in ["a.pdf", "b.pdf", "c.pdf", "d.pdf"] {
        session.select_file(pdf_document(name)).unwrap();
        assert_eq!(previews.live_count(), 1);
    }
    session.set_file(None).unwrap();
    session.clear_file();

    assert_eq!(previews.live_count(), 0);
    assert_eq!(previews.released_count(), 4);
    assert_eq!(previews.double_releases(), 0);
}

#[test]
fn test_ending_session_releases_preview() {
    let previews = RecordingPreviews::new();
    {
        let mut session = Session::new(Arc::new(previews.clone()));
        session.select_file(pdf_document("a.pdf")).unwrap();
    }
    assert_eq!(previews.live_count(), 0);
    assert_eq!(previews.released_count(), 1);
}

// =============================================================================
// View mode
// =============================================================================

#[test]
fn test_toggle_twice_is_identity() {
    let (mut session, _) = new_session();
    session.select_file(pdf_document("a.pdf")).unwrap();

    let original = session.view_mode();
    session.toggle_view();
    session.toggle_view();
    assert_eq!(session.view_mode(), original);
}

#[test]
fn test_toggle_without_file_is_noop() {
    let (mut session, _) = new_session();
    assert_eq!(session.toggle_view(), ViewMode::Collapsed);
    assert!(!FilePickerView::of(&session).is_expanded);
}

#[test]
fn test_clearing_file_forces_collapsed() {
    let (mut session, _) = new_session();
    session.select_file(pdf_document("a.pdf")).unwrap();
    session.toggle_view();

    let picker = FilePickerView::of(&session);
    assert!(picker.is_expanded);
    assert!(picker.preview_location.is_some());

    session.clear_file();
    assert_eq!(session.view_mode(), ViewMode::Collapsed);
    assert_eq!(FilePickerView::of(&session), FilePickerView {
        file_name: None,
        size_mb: None,
        is_expanded: false,
        preview_location: None,
    });
}
