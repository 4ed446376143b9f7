//! Input documents selected by the user.

use std::fs;
use std::io;
use std::path::Path;

use bytes::Bytes;

use crate::error::SelectionError;

/// Media type accepted for bank statements.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// An in-memory document. Cloning is cheap; the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    file_name: String,
    media_type: String,
    bytes: Bytes,
}

impl Document {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing the media type from its extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        Ok(Self::new(file_name, media_type, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Size in megabytes, as shown by the file picker.
    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0 / 1024.0
    }

    pub fn is_pdf(&self) -> bool {
        // Ignore parameters such as "; charset=binary"
        let essence = self.media_type.split(';').next().unwrap_or_default().trim();
        essence.eq_ignore_ascii_case(PDF_MEDIA_TYPE)
    }

    /// Reject anything that is not a PDF.
    pub fn ensure_pdf(&self) -> Result<(), SelectionError> {
        if self.is_pdf() {
            Ok(())
        } else {
            Err(SelectionError::UnsupportedType {
                media_type: self.media_type.clone(),
            })
        }
    }
}
