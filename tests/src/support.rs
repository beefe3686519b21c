//! Shared fixtures for the integration suite.

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use df_01_event_log::{EventStore, MemoryEventStore};
use df_02_submission_entity::{EntityRegistry, EntityRegistryConfig};
use df_03_raw_ingestion::RawDataIngestor;
use df_04_submission_manager::ManagerRegistry;
use df_05_processing_coordinator::ProcessingCoordinator;
use df_06_api_gateway::{
    ApiGatewayService, AppState, GatewayConfig, InMemoryInstitutionDirectory,
};
use shared_bus::InMemoryEventBus;
use shared_types::{SubmissionEvent, SubmissionId, SystemTimeSource};
use std::sync::Arc;
use tower::util::ServiceExt;

/// One fully wired in-memory node, driven through its router.
pub struct TestNode {
    pub router: Router,
    pub store: Arc<MemoryEventStore>,
    pub bus: Arc<InMemoryEventBus>,
}

/// Node seeded with institution `ABC123`, filing period `2019`.
pub fn test_node() -> TestNode {
    let store = Arc::new(MemoryEventStore::new());
    let registry = EntityRegistry::new(store.clone(), EntityRegistryConfig::for_testing());

    let bus = Arc::new(InMemoryEventBus::new());
    let managers = ManagerRegistry::new(bus.clone());
    let coordinator = ProcessingCoordinator::new(registry.clone(), managers.clone());

    let directory = Arc::new(InMemoryInstitutionDirectory::new());
    directory.add_institution("ABC123");
    directory.add_filing("ABC123", "2019");

    let state = AppState {
        registry: registry.clone(),
        managers,
        coordinator,
        ingestor: Arc::new(RawDataIngestor::default()),
        directory: directory.clone(),
        time: Arc::new(SystemTimeSource),
    };

    let router = ApiGatewayService::build_router(state, &GatewayConfig::default());

    TestNode { router, store, bus }
}

impl TestNode {
    /// Fire one request at the router.
    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// POST a submission creation, returning the response.
    pub async fn create_submission(&self) -> Response<Body> {
        self.request(
            Request::builder()
                .method("POST")
                .uri("/institutions/ABC123/filings/2019/submissions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// POST a multipart upload of `content` as `filename` to submission 1.
    pub async fn upload(&self, filename: &str, content: &str) -> Response<Body> {
        self.upload_to(1, filename, content).await
    }

    /// POST a multipart upload to an arbitrary sequence number.
    pub async fn upload_to(&self, seq: u32, filename: &str, content: &str) -> Response<Body> {
        let (content_type, body) = multipart_body("file", filename, content);
        self.request(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/institutions/ABC123/filings/2019/submissions/{}",
                    seq
                ))
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// GET submission 1's record as JSON.
    pub async fn get_submission_json(&self) -> (StatusCode, serde_json::Value) {
        let response = self
            .request(
                Request::builder()
                    .uri("/institutions/ABC123/filings/2019/submissions/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        let status = response.status();
        (status, read_json(response).await)
    }

    /// Raw lines appended to submission `seq`'s log, in order.
    pub fn appended_lines(&self, seq: u32) -> Vec<String> {
        let key = SubmissionId::new("ABC123", "2019", seq).log_key();
        self.store
            .read_from(&key, 1)
            .unwrap()
            .into_iter()
            .filter_map(|e| match e.event {
                SubmissionEvent::LineAdded { data, .. } => Some(data),
                _ => None,
            })
            .collect()
    }
}

/// Hand-built multipart body, boundary included in the content type.
pub fn multipart_body(field: &str, filename: &str, content: &str) -> (String, Vec<u8>) {
    let boundary = "FILING-TEST-BOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );
    (
        format!("multipart/form-data; boundary={boundary}"),
        body.into_bytes(),
    )
}

/// Drain a response body into JSON.
pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Drain a response body into a string.
pub async fn read_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
