//! File selection: at most one document plus its preview.

use std::sync::Arc;

use crate::document::Document;
use crate::error::SelectionError;
use crate::preview::{PreviewBackend, PreviewHandle};

/// The currently selected document and the preview derived from it.
#[derive(Debug)]
pub struct SelectedFile {
    document: Document,
    preview: PreviewHandle,
}

impl SelectedFile {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Owns the selected file and its single live preview handle.
///
/// Every path that supersedes or clears the file releases the previous
/// handle first, and dropping the selection releases whatever is left.
pub struct FileSelection {
    backend: Arc<dyn PreviewBackend>,
    current: Option<SelectedFile>,
}

impl FileSelection {
    pub fn new(backend: Arc<dyn PreviewBackend>) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// Select a new document.
    ///
    /// Non-PDF candidates are rejected and the previous selection is kept.
    /// Otherwise the previous preview is released before the new one is
    /// acquired; if acquisition fails the selection is left empty.
    pub fn select(&mut self, document: Document) -> Result<&SelectedFile, SelectionError> {
        if let Err(err) = document.ensure_pdf() {
            tracing::warn!(
                file_name = document.file_name(),
                media_type = document.media_type(),
                "Rejected non-PDF selection"
            );
            return Err(err);
        }

        self.release_current();

        let preview = self
            .backend
            .acquire(&document)
            .map_err(SelectionError::Preview)?;

        tracing::info!(
            file_name = document.file_name(),
            size = document.len(),
            preview = %preview.id(),
            "File selected"
        );
        Ok(self.current.insert(SelectedFile { document, preview }))
    }

    /// Drop the selection, releasing its preview. Idempotent.
    ///
    /// Returns whether a file was selected.
    pub fn clear(&mut self) -> bool {
        let had_file = self.current.is_some();
        self.release_current();
        had_file
    }

    pub fn current(&self) -> Option<&SelectedFile> {
        self.current.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.current.is_some()
    }

    fn release_current(&mut self) {
        if let Some(SelectedFile { document, preview }) = self.current.take() {
            tracing::debug!(file_name = document.file_name(), preview = %preview.id(), "Releasing preview");
            self.backend.release(preview);
        }
    }
}

impl Drop for FileSelection {
    fn drop(&mut self) {
        self.release_current();
    }
}

impl std::fmt::Debug for FileSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSelection")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
