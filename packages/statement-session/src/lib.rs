//! Bank Statement Extraction Session
//!
//! Owns one user's in-progress extraction: the selected PDF and its preview,
//! the column schema, the single in-flight extraction call, the last result
//! set and the preview layout.
//!
//! # Design
//!
//! - One explicit [`Session`] object, mutated only through named operations
//! - Schema edits replace the whole snapshot
//! - Preview handles have a single owner and are released on every path that
//!   supersedes them
//! - At most one extraction in flight; completions it no longer owns are dropped
//! - Failures end up in [`Phase::Failed`], never escape as errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use statement_session::{ClientConfig, Document, ResultView, Session, StatementClient, TempDirPreviews};
//!
//! let client = StatementClient::new(ClientConfig::default())?;
//! let mut session = Session::new(Arc::new(TempDirPreviews::in_system_temp()));
//!
//! session.add_column("Date")?;
//! session.add_column("Amount")?;
//! session.select_file(Document::from_path("statement.pdf".as_ref())?)?;
//!
//! if session.submit(&client).await {
//!     let csv = ResultView::of(&session).to_csv_string()?;
//! }
//! ```
//!
//! # Modules
//!
//! - [`schema`] - Column schema snapshots and edits
//! - [`document`] - Input documents
//! - [`preview`] - Preview handles and backends
//! - [`selection`] - Single-file selection with preview ownership
//! - [`gateway`] - Extraction gateway seam
//! - [`session`] - The session state machine
//! - [`views`] - View models and CSV export
//! - [`testing`] - Mock implementations for testing

pub mod document;
pub mod error;
pub mod gateway;
pub mod preview;
pub mod schema;
pub mod selection;
pub mod session;
pub mod testing;
pub mod views;

pub use document::{Document, PDF_MEDIA_TYPE};
pub use error::{ExportError, FailureKind, GatewayError, SchemaError, SelectionError};
pub use gateway::ExtractionGateway;
pub use preview::{PreviewBackend, PreviewHandle, TempDirPreviews};
pub use schema::{Schema, SchemaEdit};
pub use selection::{FileSelection, SelectedFile};
pub use session::{Completion, Phase, Session, Submission, SubmissionId, ViewMode};
pub use views::{
    FilePickerView, ResultView, SchemaEditorView, SessionStatus, DEFAULT_EXPORT_FILE_NAME,
};

// Re-export client types used in the public API
pub use statement_client::{
    CellValue, ClientConfig, ColumnDefinition, ColumnId, StatementClient, Transaction,
};
