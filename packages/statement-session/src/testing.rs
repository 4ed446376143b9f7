//! Testing utilities including mock implementations.
//!
//! These let front ends and tests drive a [`Session`](crate::Session)
//! without a running extraction service or a preview directory.

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use statement_client::Transaction;
use uuid::Uuid;

use crate::document::{Document, PDF_MEDIA_TYPE};
use crate::error::GatewayError;
use crate::gateway::ExtractionGateway;
use crate::preview::{PreviewBackend, PreviewHandle};
use crate::schema::Schema;

/// A PDF document with a small fake body.
pub fn pdf_document(file_name: &str) -> Document {
    Document::new(file_name, PDF_MEDIA_TYPE, &b"%PDF-1.4\n%fake statement\n"[..])
}

/// A document the selection model must reject.
pub fn image_document(file_name: &str) -> Document {
    Document::new(file_name, "image/png", &b"\x89PNG\r\n"[..])
}

/// Two rows shaped like the extraction service's output.
pub fn sample_rows() -> Vec<Transaction> {
    vec![
        Transaction::new("1")
            .with("Date", "2024-01-01")
            .with("Amount", 100i64),
        Transaction::new("2")
            .with("Date", "2024-01-02")
            .with("Amount", -42.5),
    ]
}

/// Record of a call made to the scripted gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCall {
    pub file_name: String,
    pub column_names: Vec<String>,
}

/// A gateway that replays queued outcomes in order.
///
/// When the queue runs dry it answers with a service failure.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    outcomes: Arc<RwLock<VecDeque<Result<Vec<Transaction>, GatewayError>>>>,
    calls: Arc<RwLock<Vec<GatewayCall>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful extraction.
    pub fn with_rows(self, rows: Vec<Transaction>) -> Self {
        self.push(Ok(rows));
        self
    }

    /// Queue a failed extraction.
    pub fn with_error(self, error: GatewayError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, outcome: Result<Vec<Transaction>, GatewayError>) {
        self.outcomes.write().unwrap().push_back(outcome);
    }

    /// Get all calls made to this gateway.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl ExtractionGateway for ScriptedGateway {
    async fn extract(
        &self,
        document: &Document,
        schema: &Schema,
    ) -> Result<Vec<Transaction>, GatewayError> {
        self.calls.write().unwrap().push(GatewayCall {
            file_name: document.file_name().to_string(),
            column_names: schema.column_names().into_iter().map(String::from).collect(),
        });

        self.outcomes
            .write()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::ServiceFailure("no scripted outcome".into())))
    }
}

#[derive(Debug, Default)]
struct PreviewLedger {
    live: Vec<Uuid>,
    released: Vec<Uuid>,
    double_releases: usize,
    fail_next_acquire: bool,
}

/// In-memory preview backend that records every acquire and release.
#[derive(Debug, Clone, Default)]
pub struct RecordingPreviews {
    ledger: Arc<RwLock<PreviewLedger>>,
}

impl RecordingPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `acquire` fail with an I/O error.
    pub fn fail_next_acquire(&self) {
        self.ledger.write().unwrap().fail_next_acquire = true;
    }

    /// Handles acquired and not yet released, oldest first.
    pub fn live(&self) -> Vec<Uuid> {
        self.ledger.read().unwrap().live.clone()
    }

    pub fn live_count(&self) -> usize {
        self.ledger.read().unwrap().live.len()
    }

    /// Released handles in release order.
    pub fn released_ids(&self) -> Vec<Uuid> {
        self.ledger.read().unwrap().released.clone()
    }

    pub fn released_count(&self) -> usize {
        self.ledger.read().unwrap().released.len()
    }

    /// Releases of handles that were not live.
    pub fn double_releases(&self) -> usize {
        self.ledger.read().unwrap().double_releases
    }
}

impl PreviewBackend for RecordingPreviews {
    fn acquire(&self, document: &Document) -> io::Result<PreviewHandle> {
        let mut ledger = self.ledger.write().unwrap();
        if std::mem::take(&mut ledger.fail_next_acquire) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "preview backend unavailable",
            ));
        }

        let id = Uuid::new_v4();
        ledger.live.push(id);
        Ok(PreviewHandle::new(
            id,
            PathBuf::from(format!("memory://{}/{}", id, document.file_name())),
        ))
    }

    fn release(&self, handle: PreviewHandle) {
        let mut ledger = self.ledger.write().unwrap();
        match ledger.live.iter().position(|id| *id == handle.id()) {
            Some(index) => {
                ledger.live.remove(index);
                ledger.released.push(handle.id());
            }
            None => ledger.double_releases += 1,
        }
    }
}
