//! Extraction gateway trait.
//!
//! The gateway wraps the single network operation "submit file + schema,
//! receive rows". It does not validate its inputs (the session only calls it
//! when a file and a non-empty schema are present) and never retries.

use std::sync::Arc;

use async_trait::async_trait;
use statement_client::{StatementClient, Transaction};

use crate::document::Document;
use crate::error::GatewayError;
use crate::schema::Schema;

#[async_trait]
pub trait ExtractionGateway: Send + Sync {
    /// Extract transaction rows from `document` for the columns in `schema`.
    async fn extract(
        &self,
        document: &Document,
        schema: &Schema,
    ) -> Result<Vec<Transaction>, GatewayError>;
}

#[async_trait]
impl ExtractionGateway for StatementClient {
    async fn extract(
        &self,
        document: &Document,
        schema: &Schema,
    ) -> Result<Vec<Transaction>, GatewayError> {
        self.extract_transactions(
            document.file_name(),
            document.bytes().to_vec(),
            schema.columns(),
        )
        .await
        .map_err(GatewayError::from)
    }
}

#[async_trait]
impl<G: ExtractionGateway + ?Sized> ExtractionGateway for Arc<G> {
    async fn extract(
        &self,
        document: &Document,
        schema: &Schema,
    ) -> Result<Vec<Transaction>, GatewayError> {
        (**self).extract(document, schema).await
    }
}
