//! Read-only view models derived from a [`Session`].
//!
//! Front ends render these and send intents back through the session's
//! operations. None of them hold state of their own.

use std::io::Write;

use serde::Serialize;
use statement_client::{ColumnDefinition, Transaction};

use crate::error::ExportError;
use crate::session::{Phase, Session, ViewMode};

/// File name offered for CSV downloads.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "bank_transactions.csv";

/// Derived flags a front end uses to enable or disable controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub phase: Phase,
    pub phase_label: &'static str,
    pub is_ready: bool,
    pub can_submit: bool,
    pub is_loading: bool,
    pub view_mode: ViewMode,
    pub error_message: Option<String>,
    pub row_count: usize,
}

impl SessionStatus {
    pub fn of(session: &Session) -> Self {
        Self {
            phase: session.phase(),
            phase_label: session.phase().label(),
            is_ready: session.is_ready(),
            can_submit: session.can_submit(),
            is_loading: session.is_loading(),
            view_mode: session.view_mode(),
            error_message: session.error_message(),
            row_count: session.rows().len(),
        }
    }
}

/// What the file picker shows.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePickerView<'a> {
    pub file_name: Option<&'a str>,
    pub size_mb: Option<f64>,
    pub is_expanded: bool,
    /// Present only while expanded.
    pub preview_location: Option<&'a std::path::Path>,
}

impl<'a> FilePickerView<'a> {
    pub fn of(session: &'a Session) -> Self {
        let file = session.file();
        let is_expanded = file.is_some() && session.is_expanded();
        Self {
            file_name: file.map(|f| f.document().file_name()),
            size_mb: file.map(|f| f.document().size_mb()),
            is_expanded,
            preview_location: file
                .filter(|_| is_expanded)
                .map(|f| f.preview().location()),
        }
    }

    pub fn has_file(&self) -> bool {
        self.file_name.is_some()
    }

    /// "statement.pdf (1.25 MB)"
    pub fn summary(&self) -> Option<String> {
        match (self.file_name, self.size_mb) {
            (Some(name), Some(size)) => Some(format!("{} ({:.2} MB)", name, size)),
            _ => None,
        }
    }
}

/// Columns listed by the schema editor.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEditorView<'a> {
    pub columns: &'a [ColumnDefinition],
}

impl<'a> SchemaEditorView<'a> {
    pub fn of(session: &'a Session) -> Self {
        Self {
            columns: session.schema().columns(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Names that appear more than once. Their cells are ambiguous because
    /// rows are keyed by name.
    pub fn duplicate_names(&self) -> Vec<&'a str> {
        let mut duplicates: Vec<&str> = Vec::new();
        for (i, column) in self.columns.iter().enumerate() {
            let name = column.name.as_str();
            let seen_before = self.columns[..i].iter().any(|c| c.name == name);
            if seen_before && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }
}

/// Result table: rows projected onto the schema's column names.
#[derive(Debug, Clone)]
pub struct ResultView<'a> {
    pub rows: &'a [Transaction],
    pub column_names: Vec<&'a str>,
    pub is_loading: bool,
}

impl<'a> ResultView<'a> {
    pub fn of(session: &'a Session) -> Self {
        Self::new(
            session.rows(),
            session.schema().column_names(),
            session.is_loading(),
        )
    }

    pub fn new(rows: &'a [Transaction], column_names: Vec<&'a str>, is_loading: bool) -> Self {
        Self {
            rows,
            column_names,
            is_loading,
        }
    }

    pub fn header(&self) -> &[&'a str] {
        &self.column_names
    }

    /// Display values of one row in column order. Missing keys are empty.
    pub fn cells(&self, row: &Transaction) -> Vec<String> {
        self.column_names
            .iter()
            .map(|name| row.display(name))
            .collect()
    }

    pub fn table(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| self.cells(row)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn can_export(&self) -> bool {
        !self.is_loading && !self.rows.is_empty() && !self.column_names.is_empty()
    }

    /// Write the displayed rows as CSV, every field quoted.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(writer);

        csv.write_record(&self.column_names)?;
        for row in self.rows {
            csv.write_record(self.cells(row))?;
        }
        csv.flush()?;

        tracing::debug!(rows = self.rows.len(), columns = self.column_names.len(), "CSV exported");
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
