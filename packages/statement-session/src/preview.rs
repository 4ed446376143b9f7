//! Revocable preview handles for the selected document.
//!
//! A [`PreviewHandle`] is neither `Clone` nor `Copy` and
//! [`PreviewBackend::release`] takes it by value, so a handle can be released
//! at most once. Owners are responsible for releasing it at least once.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::document::Document;

/// A live preview of one document.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    id: Uuid,
    location: PathBuf,
}

impl PreviewHandle {
    pub fn new(id: Uuid, location: impl Into<PathBuf>) -> Self {
        Self {
            id,
            location: location.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Where a viewer can read the preview from.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// Creates and revokes preview handles.
pub trait PreviewBackend: Send + Sync {
    fn acquire(&self, document: &Document) -> io::Result<PreviewHandle>;

    fn release(&self, handle: PreviewHandle);
}

/// Materializes previews as files in a directory so a system PDF viewer can
/// open them. Releasing deletes the file.
#[derive(Debug, Clone)]
pub struct TempDirPreviews {
    dir: PathBuf,
}

impl TempDirPreviews {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<system temp>/statement-previews`
    pub fn in_system_temp() -> Self {
        Self::new(std::env::temp_dir().join("statement-previews"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PreviewBackend for TempDirPreviews {
    fn acquire(&self, document: &Document) -> io::Result<PreviewHandle> {
        fs::create_dir_all(&self.dir)?;

        let id = Uuid::new_v4();
        let location = self.dir.join(format!("{}.pdf", id));
        fs::write(&location, document.bytes())?;

        tracing::debug!(%id, path = %location.display(), "Preview created");
        Ok(PreviewHandle::new(id, location))
    }

    fn release(&self, handle: PreviewHandle) {
        match fs::remove_file(&handle.location) {
            Ok(()) => tracing::debug!(id = %handle.id, "Preview released"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(id = %handle.id, "Preview file already gone")
            }
            Err(e) => tracing::warn!(id = %handle.id, error = %e, "Failed to remove preview file"),
        }
    }
}
