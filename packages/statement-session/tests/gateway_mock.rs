//! Session behavior against a mocked extraction gateway.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::{mock, predicate::*, Sequence};
use statement_session::testing::{pdf_document, sample_rows, RecordingPreviews};
use statement_session::{
    Document, ExtractionGateway, FailureKind, GatewayError, Phase, Schema, Session, Transaction,
};

mock! {
    pub Gateway {}

    #[async_trait]
    impl ExtractionGateway for Gateway {
        async fn extract(
            &self,
            document: &Document,
            schema: &Schema,
        ) -> Result<Vec<Transaction>, GatewayError>;
    }
}

fn ready_session() -> Session {
    let mut session = Session::new(Arc::new(RecordingPreviews::new()));
    session.add_column("Date").unwrap();
    session.add_column("Amount").unwrap();
    session.select_file(pdf_document("march.pdf")).unwrap();
    session
}

#[tokio::test]
async fn test_gateway_receives_document_and_schema() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_extract()
        .withf(|document, schema| {
            document.file_name() == "march.pdf"
                && document.is_pdf()
                && schema.column_names() == vec!["Date", "Amount"]
        })
        .times(1)
        .returning(|_, _| Ok(sample_rows()));

    let mut session = ready_session();
    assert!(session.submit(&gateway).await);
    assert_eq!(session.phase(), Phase::Succeeded);
}

#[tokio::test]
async fn test_gateway_not_called_when_not_ready() {
    let mut gateway = MockGateway::new();
    gateway.expect_extract().never();

    let mut session = Session::new(Arc::new(RecordingPreviews::new()));
    session.select_file(pdf_document("march.pdf")).unwrap();

    assert!(!session.submit(&gateway).await);
    assert_eq!(session.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_every_failure_kind_ends_failed() {
    let failures = [
        GatewayError::NetworkFailure("connection reset".into()),
        GatewayError::ServiceFailure("HTTP 502: bad gateway".into()),
        GatewayError::MalformedResponse("missing transactions".into()),
    ];

    for failure in failures {
        let expected_kind = failure.kind();
        let mut gateway = MockGateway::new();
        gateway
            .expect_extract()
            .times(1)
            .return_once(move |_, _| Err(failure));

        let mut session = ready_session();
        assert!(session.submit(&gateway).await);

        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.last_error().map(GatewayError::kind), Some(expected_kind));
        assert!(!session.error_message().unwrap_or_default().is_empty());
        assert!(session.can_submit());
    }
}

#[tokio::test]
async fn test_retry_calls_gateway_again() {
    let mut seq = Sequence::new();
    let mut gateway = MockGateway::new();
    gateway
        .expect_extract()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(GatewayError::NetworkFailure("timed out".into())));
    gateway
        .expect_extract()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(sample_rows()));

    let mut session = ready_session();
    session.submit(&gateway).await;
    assert_eq!(
        session.last_error().map(GatewayError::kind),
        Some(FailureKind::Network)
    );

    session.submit(&gateway).await;
    assert_eq!(session.phase(), Phase::Succeeded);
    assert_eq!(session.rows().len(), 2);
}

#[tokio::test]
async fn test_shared_gateway_through_arc() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_extract()
        .with(always(), always())
        .times(1)
        .returning(|_, _| Ok(vec![]));
    let gateway: Arc<dyn ExtractionGateway> = Arc::new(gateway);

    let mut session = ready_session();
    let submission = session.begin_submission().unwrap();
    let completion = submission.run(&gateway).await;

    assert!(session.complete(completion));
    assert_eq!(session.phase(), Phase::Succeeded);
    assert!(session.rows().is_empty());
}
