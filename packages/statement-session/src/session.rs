//! The extraction session state machine.
//!
//! A [`Session`] owns everything the user is working on: the selected file,
//! the column schema, the request lifecycle, the last result set and the
//! preview layout. All mutation goes through named operations.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Succeeded ──submit──▶ Submitting ...
//!                       │
//!                       └──err──▶ Failed ──submit──▶ Submitting ...
//! ```
//!
//! Submission is split in three steps so a front end can keep handling input
//! while the call is in flight:
//!
//! 1. [`Session::begin_submission`] checks readiness and flips to
//!    `Submitting` in one `&mut self` call, capturing file and schema by value.
//! 2. [`Submission::run`] performs the gateway call without touching the
//!    session.
//! 3. [`Session::complete`] applies the outcome, if the session still owns
//!    that submission.
//!
//! [`Session::submit`] chains the three for callers that don't need the split.

use std::sync::Arc;

use serde::Serialize;
use statement_client::{ColumnId, Transaction};
use uuid::Uuid;

use crate::document::Document;
use crate::error::{GatewayError, SchemaError, SelectionError};
use crate::gateway::ExtractionGateway;
use crate::preview::PreviewBackend;
use crate::schema::{Schema, SchemaEdit};
use crate::selection::{FileSelection, SelectedFile};

/// Request lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Submitting => "Extracting",
            Phase::Succeeded => "Done",
            Phase::Failed => "Failed",
        }
    }
}

/// Preview layout. `Expanded` shows the document next to the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Collapsed,
    Expanded,
}

impl ViewMode {
    fn flipped(self) -> Self {
        match self {
            ViewMode::Collapsed => ViewMode::Expanded,
            ViewMode::Expanded => ViewMode::Collapsed,
        }
    }
}

/// Identifies one accepted submission of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId {
    session: Uuid,
    sequence: u64,
}

impl SubmissionId {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// An accepted submission: the file and schema as they were when it was
/// accepted. Later edits to the session don't affect it.
#[derive(Debug, Clone)]
pub struct Submission {
    id: SubmissionId,
    document: Document,
    schema: Schema,
}

impl Submission {
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Call the gateway. Failures are captured in the [`Completion`].
    pub async fn run<G: ExtractionGateway + ?Sized>(self, gateway: &G) -> Completion {
        let outcome = gateway.extract(&self.document, &self.schema).await;
        Completion {
            id: self.id,
            outcome,
        }
    }
}

/// The resolved outcome of a [`Submission`].
#[derive(Debug, Clone)]
pub struct Completion {
    id: SubmissionId,
    outcome: Result<Vec<Transaction>, GatewayError>,
}

impl Completion {
    /// Build a completion outside [`Submission::run`], e.g. when the task
    /// running the submission died before producing one.
    pub fn new(id: SubmissionId, outcome: Result<Vec<Transaction>, GatewayError>) -> Self {
        Self { id, outcome }
    }

    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn outcome(&self) -> &Result<Vec<Transaction>, GatewayError> {
        &self.outcome
    }
}

/// One user's in-progress extraction session.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    schema: Schema,
    selection: FileSelection,
    rows: Vec<Transaction>,
    phase: Phase,
    last_error: Option<GatewayError>,
    view_mode: ViewMode,
    in_flight: Option<SubmissionId>,
    submissions: u64,
}

impl Session {
    pub fn new(previews: Arc<dyn PreviewBackend>) -> Self {
        Self {
            id: Uuid::new_v4(),
            schema: Schema::new(),
            selection: FileSelection::new(previews),
            rows: Vec::new(),
            phase: Phase::Idle,
            last_error: None,
            view_mode: ViewMode::Collapsed,
            in_flight: None,
            submissions: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    // =========================================================================
    // Schema
    // =========================================================================

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Replace the schema snapshot. Allowed in any phase; rows and phase are
    /// untouched.
    pub fn set_schema(&mut self, schema: Schema) {
        tracing::debug!(session = %self.id, columns = schema.len(), "Schema replaced");
        self.schema = schema;
    }

    pub fn add_column(&mut self, name: &str) -> Result<&Schema, SchemaError> {
        self.apply_schema_edit(SchemaEdit::Add(name.to_string()))
    }

    pub fn remove_column(&mut self, id: &ColumnId) -> &Schema {
        self.set_schema(self.schema.without_column(id));
        &self.schema
    }

    pub fn apply_schema_edit(&mut self, edit: SchemaEdit) -> Result<&Schema, SchemaError> {
        let schema = self.schema.apply(edit)?;
        self.set_schema(schema);
        Ok(&self.schema)
    }

    // =========================================================================
    // File selection and layout
    // =========================================================================

    pub fn file(&self) -> Option<&SelectedFile> {
        self.selection.current()
    }

    /// Select (`Some`) or clear (`None`) the input document.
    ///
    /// Does not affect a submission already in flight.
    pub fn set_file(&mut self, document: Option<Document>) -> Result<(), SelectionError> {
        match document {
            Some(document) => self.select_file(document).map(|_| ()),
            None => {
                self.clear_file();
                Ok(())
            }
        }
    }

    pub fn select_file(&mut self, document: Document) -> Result<&SelectedFile, SelectionError> {
        match self.selection.select(document) {
            Ok(file) => Ok(file),
            Err(err) => {
                // A failed preview leaves no file behind
                if matches!(err, SelectionError::Preview(_)) {
                    self.view_mode = ViewMode::Collapsed;
                }
                Err(err)
            }
        }
    }

    pub fn clear_file(&mut self) {
        if self.selection.clear() {
            tracing::info!(session = %self.id, "File cleared");
        }
        self.view_mode = ViewMode::Collapsed;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn is_expanded(&self) -> bool {
        self.view_mode == ViewMode::Expanded
    }

    /// Flip between collapsed and expanded. No-op without a file.
    pub fn toggle_view(&mut self) -> ViewMode {
        if self.selection.is_selected() {
            self.view_mode = self.view_mode.flipped();
        }
        self.view_mode
    }

    // =========================================================================
    // Extraction lifecycle
    // =========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn last_error(&self) -> Option<&GatewayError> {
        self.last_error.as_ref()
    }

    /// Message for the last failed extraction, if the session is `Failed`.
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(GatewayError::user_message)
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// A file is selected and the schema has at least one column.
    pub fn is_ready(&self) -> bool {
        self.selection.is_selected() && !self.schema.is_empty()
    }

    /// Whether [`Session::submit`] would do anything right now.
    pub fn can_submit(&self) -> bool {
        self.is_ready() && self.phase != Phase::Submitting
    }

    /// Accept a submission if the session can submit.
    ///
    /// Returns `None` (and changes nothing) when no file is selected, the
    /// schema is empty or another submission is in flight.
    pub fn begin_submission(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            tracing::debug!(session = %self.id, phase = ?self.phase, ready = self.is_ready(), "Submit ignored");
            return None;
        }
        let file = self.selection.current()?;

        let id = SubmissionId {
            session: self.id,
            sequence: self.submissions + 1,
        };
        let submission = Submission {
            id,
            document: file.document().clone(),
            schema: self.schema.clone(),
        };

        self.submissions = id.sequence;
        self.in_flight = Some(id);
        self.phase = Phase::Submitting;
        self.last_error = None;

        tracing::info!(
            session = %self.id,
            submission = id.sequence,
            file_name = submission.document.file_name(),
            columns = submission.schema.len(),
            "Extraction submitted"
        );
        Some(submission)
    }

    /// Apply a completion. Returns `false` if this session does not own the
    /// submission (stale or foreign completions are ignored).
    pub fn complete(&mut self, completion: Completion) -> bool {
        if self.in_flight != Some(completion.id) {
            tracing::warn!(
                session = %self.id,
                submission = completion.id.sequence,
                "Ignoring completion for a submission this session does not own"
            );
            return false;
        }
        self.in_flight = None;

        match completion.outcome {
            Ok(rows) => {
                tracing::info!(
                    session = %self.id,
                    submission = completion.id.sequence,
                    rows = rows.len(),
                    "Extraction succeeded"
                );
                self.rows = rows;
                self.phase = Phase::Succeeded;
                self.last_error = None;
            }
            Err(err) => {
                // Keep the previous rows so a failed retry doesn't erase them
                tracing::warn!(
                    session = %self.id,
                    submission = completion.id.sequence,
                    kind = ?err.kind(),
                    error = %err,
                    "Extraction failed"
                );
                self.phase = Phase::Failed;
                self.last_error = Some(err);
            }
        }
        true
    }

    /// Submit, wait for the gateway and apply the outcome.
    ///
    /// Returns whether the submission was accepted.
    pub async fn submit<G: ExtractionGateway + ?Sized>(&mut self, gateway: &G) -> bool {
        let Some(submission) = self.begin_submission() else {
            return false;
        };
        let completion = submission.run(gateway).await;
        self.complete(completion)
    }
}
