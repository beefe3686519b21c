//! End-to-end upload scenarios driven through the gateway router.

use crate::support::{read_json, read_text, test_node};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use shared_types::{SubmissionId, SubmissionStatus};
use std::time::Duration;

/// Poll the record until the detached receipt write lands: status at the
/// target AND a non-empty receipt, since `CompleteUpload` flips the status
/// durably before the coordinator's receipt write catches up.
async fn wait_for_receipt(
    node: &crate::support::TestNode,
    expected: SubmissionStatus,
) -> serde_json::Value {
    for _ in 0..50 {
        let (status, json) = node.get_submission_json().await;
        assert_eq!(status, StatusCode::OK);
        if json["status"] == format!("{:?}", expected) && json["receipt"] != "" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("submission never reached {:?} with a receipt", expected);
}

#[tokio::test]
async fn test_create_submission_returns_created_record() {
    let node = test_node();

    let response = node.create_submission().await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = read_json(response).await;
    assert_eq!(json["institutionId"], "ABC123");
    assert_eq!(json["period"], "2019");
    assert_eq!(json["sequenceNumber"], 1);
    assert_eq!(json["status"], "Created");
    assert_eq!(json["receipt"], "");
}

#[tokio::test]
async fn test_upload_three_lines_accepted() {
    let node = test_node();
    node.create_submission().await;

    let response = node.upload("file.txt", "a|one\nb|two\nc|three\n").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(read_text(response).await, "uploaded");

    // Exactly one LineAdded per input line, in input order.
    assert_eq!(node.appended_lines(1), vec!["a|one", "b|two", "c|three"]);

    // CompleteUpload moved the record to the post-ingestion state; the
    // detached coordinator write fills in receipt and end.
    let json = wait_for_receipt(&node, SubmissionStatus::Uploaded).await;
    let receipt = json["receipt"].as_str().unwrap();
    assert!(receipt.starts_with("ABC123-2019-1-"));
    assert!(json["end"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_second_upload_conflicts_without_appending() {
    let node = test_node();
    node.create_submission().await;

    let first = node.upload("file.txt", "a|1\nb|2\nc|3\n").await;
    assert_eq!(first.status(), StatusCode::ACCEPTED);

    let second = node.upload("file.txt", "d|4\n").await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let json = read_json(second).await;
    assert_eq!(json["statusCode"], 400);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("create a new submission"));
    assert_eq!(
        json["path"],
        "/institutions/ABC123/filings/2019/submissions/1"
    );

    // No additional lines were appended.
    assert_eq!(node.appended_lines(1).len(), 3);
}

#[tokio::test]
async fn test_unknown_institution_is_404() {
    let node = test_node();

    let response = node
        .request(
            Request::builder()
                .method("POST")
                .uri("/institutions/XYZ999/filings/2019/submissions")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = read_json(response).await;
    assert_eq!(json["statusCode"], 404);
    assert!(json["message"].as_str().unwrap().contains("XYZ999"));
    assert_eq!(json["path"], "/institutions/XYZ999/filings/2019/submissions");
}

#[tokio::test]
async fn test_unknown_filing_is_404() {
    let node = test_node();

    let response = node
        .request(
            Request::builder()
                .method("POST")
                .uri("/institutions/ABC123/filings/2025/submissions")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(read_json(response).await["message"]
        .as_str()
        .unwrap()
        .contains("2025"));
}

#[tokio::test]
async fn test_upload_to_uncreated_submission_is_404() {
    let node = test_node();

    let response = node.upload("file.txt", "a|1\n").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(read_json(response).await["message"]
        .as_str()
        .unwrap()
        .contains("not found"));
}

#[tokio::test]
async fn test_wrong_extension_is_400() {
    let node = test_node();
    node.create_submission().await;

    let response = node.upload("file.csv", "a|1\n").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = read_json(response).await;
    assert_eq!(json["message"], "file format not supported");

    // Nothing was appended; the upload never started.
    assert!(node.appended_lines(1).is_empty());
}

#[tokio::test]
async fn test_missing_file_field_is_400() {
    let node = test_node();
    node.create_submission().await;

    let (content_type, body) =
        crate::support::multipart_body("attachment", "file.txt", "a|1\n");
    let response = node
        .request(
            Request::builder()
                .method("POST")
                .uri("/institutions/ABC123/filings/2019/submissions/1")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["message"]
        .as_str()
        .unwrap()
        .contains("'file' missing"));
}

#[tokio::test]
async fn test_get_unknown_submission_is_404() {
    let node = test_node();

    let (status, json) = node.get_submission_json().await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["message"].as_str().unwrap().contains("ABC123-2019-1"));
}

#[tokio::test]
async fn test_unterminated_final_line_is_ingested() {
    let node = test_node();
    node.create_submission().await;

    let response = node.upload("file.txt", "a|1\nb|2").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(node.appended_lines(1), vec!["a|1", "b|2"]);
}

#[tokio::test]
async fn test_sequences_are_isolated_entities() {
    let node = test_node();
    node.create_submission().await; // seq 1
    node.create_submission().await; // seq 2

    let first = node.upload_to(1, "file.txt", "first|line\n").await;
    assert_eq!(first.status(), StatusCode::ACCEPTED);
    let second = node.upload_to(2, "file.txt", "second|line\n").await;
    assert_eq!(second.status(), StatusCode::ACCEPTED);

    assert_eq!(node.appended_lines(1), vec!["first|line"]);
    assert_eq!(node.appended_lines(2), vec!["second|line"]);

    let key = SubmissionId::new("ABC123", "2019", 1).log_key();
    assert_eq!(key, "Submission-ABC123-2019-1");
}
