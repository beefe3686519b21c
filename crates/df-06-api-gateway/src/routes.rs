//! # Route Handlers
//!
//! Submission creation, record reads, and the multipart raw-file upload.

use crate::error::ApiError;
use crate::service::AppState;
use axum::extract::{Multipart, OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use shared_types::{Submission, SubmissionId, SubmissionStatus};
use tracing::info;

/// Wire representation of a submission record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    /// Institution identifier.
    pub institution_id: String,
    /// Filing period.
    pub period: String,
    /// Sequence number within the filing.
    pub sequence_number: u32,
    /// Current lifecycle status.
    pub status: SubmissionStatus,
    /// Receipt, empty until issued.
    pub receipt: String,
    /// Creation timestamp, epoch millis.
    pub start: u64,
    /// Completion timestamp, epoch millis (0 until set).
    pub end: u64,
}

impl SubmissionResponse {
    fn from_record(id: &SubmissionId, record: Submission) -> Self {
        Self {
            institution_id: id.institution_id.clone(),
            period: id.period.clone(),
            sequence_number: id.sequence_number,
            status: record.status,
            receipt: record.receipt,
            start: record.start,
            end: record.end,
        }
    }
}

/// POST `/institutions/{id}/filings/{period}/submissions`
pub async fn create_submission(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path((institution_id, period)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path().to_string();
    create_inner(state, institution_id, period)
        .await
        .map_err(|e| e.at(&path))
}

async fn create_inner(
    state: AppState,
    institution_id: String,
    period: String,
) -> Result<impl IntoResponse, ApiError> {
    resolve_filing(&state, &institution_id, &period).await?;

    let sequence = state.directory.next_sequence(&institution_id, &period).await;
    let id = SubmissionId::new(institution_id, period, sequence);

    let entity = state.registry.entity(&id)?;
    entity.create_submission(state.time.now_millis()).await?;
    let record = entity.get_submission().await?;

    info!(subsystem = "df-06", id = %id, "Submission created");
    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse::from_record(&id, record)),
    ))
}

/// GET `/institutions/{id}/filings/{period}/submissions/{seq}`
pub async fn get_submission(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path((institution_id, period, sequence_number)): Path<(String, String, u32)>,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path().to_string();
    get_inner(state, institution_id, period, sequence_number)
        .await
        .map_err(|e| e.at(&path))
}

async fn get_inner(
    state: AppState,
    institution_id: String,
    period: String,
    sequence_number: u32,
) -> Result<impl IntoResponse, ApiError> {
    resolve_filing(&state, &institution_id, &period).await?;

    let id = SubmissionId::new(institution_id, period, sequence_number);
    let record = state.registry.entity(&id)?.get_submission().await?;

    if record.is_empty() {
        return Err(ApiError::submission_not_found(&id));
    }
    Ok(Json(SubmissionResponse::from_record(&id, record)))
}

/// POST `/institutions/{id}/filings/{period}/submissions/{seq}`
///
/// Multipart upload of the raw `.txt` file. `202 Accepted` with body
/// `"uploaded"` once every line is durably appended; the receipt write and
/// the status broadcast run detached afterwards.
pub async fn upload_raw_file(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path((institution_id, period, sequence_number)): Path<(String, String, u32)>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path().to_string();
    upload_inner(state, institution_id, period, sequence_number, multipart)
        .await
        .map_err(|e| e.at(&path))
}

async fn upload_inner(
    state: AppState,
    institution_id: String,
    period: String,
    sequence_number: u32,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    resolve_filing(&state, &institution_id, &period).await?;

    let id = SubmissionId::new(institution_id, period, sequence_number);

    // Duplicate-submission guard: only the initial Created state accepts an
    // upload.
    state.coordinator.verify_upload_allowed(&id).await?;

    // The upload must arrive as a multipart field literally named `file`.
    let field = loop {
        let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::invalid_file(format!("unparseable multipart body: {}", e)))?
        else {
            return Err(ApiError::invalid_file("multipart field 'file' missing"));
        };
        if field.name() == Some("file") {
            break field;
        }
    };

    let filename = field.file_name().unwrap_or_default();
    if !filename.ends_with(".txt") {
        return Err(ApiError::invalid_file("file format not supported"));
    }

    let entity = state.registry.entity(&id)?;
    let timestamp = state.time.now_millis();

    // Durable upload-start marker; the entity serializes concurrent starts,
    // so of two racing uploads exactly one passes this point.
    entity.start_upload(timestamp).await?;
    state
        .coordinator
        .update_submission_status(id.clone(), SubmissionStatus::Uploading);

    let stream = Box::pin(futures::stream::unfold(field, |mut field| async move {
        match field.chunk().await {
            Ok(Some(bytes)) => Some((Ok(bytes), field)),
            Ok(None) => None,
            Err(e) => Some((Err(e), field)),
        }
    }));

    let line_count = state.ingestor.ingest(&entity, stream).await?;

    // Detached post-ingestion coordination: receipt + end + status become
    // durable, and the broadcast goes out, without the response waiting.
    let receipt = format!("{}-{}", id, timestamp);
    state.coordinator.update_submission_status_and_receipt(
        id.clone(),
        timestamp,
        receipt,
        SubmissionStatus::Uploaded,
    );
    {
        let manager = state.managers.manager(&id);
        tokio::spawn(async move { manager.notify_upload_completed(line_count).await });
    }

    info!(subsystem = "df-06", id = %id, lines = line_count, "Upload accepted");
    Ok((StatusCode::ACCEPTED, "uploaded"))
}

/// 404 checks shared by every submission route.
async fn resolve_filing(
    state: &AppState,
    institution_id: &str,
    period: &str,
) -> Result<(), ApiError> {
    if !state.directory.institution_exists(institution_id).await {
        return Err(ApiError::institution_not_found(institution_id));
    }
    if !state.directory.filing_exists(institution_id, period).await {
        return Err(ApiError::filing_not_found(institution_id, period));
    }
    Ok(())
}
