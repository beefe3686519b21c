//! Status broadcast behavior across coordinator, manager, and bus.

use crate::support::test_node;
use axum::http::StatusCode;
use shared_bus::{EventFilter, FilingEvent};
use shared_types::{SubmissionId, SubmissionStatus};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_upload_eventually_broadcasts_uploaded() {
    let node = test_node();
    let mut sub = node.bus.subscribe(EventFilter::topics(vec![
        shared_bus::EventTopic::Submission,
    ]));

    node.create_submission().await;
    let response = node.upload("file.txt", "a|1\nb|2\n").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // Broadcasts are unordered relative to the durable writes, so the only
    // dependable observation is that an Uploaded notification arrives.
    let mut statuses = Vec::new();
    loop {
        let event = timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("broadcast timed out")
            .expect("bus closed");
        if let FilingEvent::SubmissionStatusUpdated { submission, .. } = event {
            statuses.push(submission.status);
            if submission.status == SubmissionStatus::Uploaded {
                break;
            }
        }
    }
    assert!(statuses.contains(&SubmissionStatus::Uploaded));
}

#[tokio::test]
async fn test_uploaded_broadcast_carries_receipt() {
    let node = test_node();
    let mut sub = node.bus.subscribe(EventFilter::all());

    node.create_submission().await;
    node.upload("file.txt", "a|1\n").await;

    loop {
        let event = timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("broadcast timed out")
            .expect("bus closed");
        if let FilingEvent::SubmissionStatusUpdated { submission, .. } = &event {
            if submission.status == SubmissionStatus::Uploaded {
                assert!(submission.receipt.starts_with("ABC123-2019-1-"));
                assert!(submission.end > 0);
                break;
            }
        }
    }
}

#[tokio::test]
async fn test_upload_completed_event_has_line_count() {
    let node = test_node();
    let mut sub = node
        .bus
        .subscribe(EventFilter::topics(vec![shared_bus::EventTopic::Upload]));

    node.create_submission().await;
    node.upload("file.txt", "a|1\nb|2\nc|3\n").await;

    let event = timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("broadcast timed out")
        .expect("bus closed");
    match event {
        FilingEvent::UploadCompleted { id, line_count } => {
            assert_eq!(id, SubmissionId::new("ABC123", "2019", 1));
            assert_eq!(line_count, 3);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_no_subscriber_means_no_buffering() {
    let node = test_node();
    node.create_submission().await;
    let response = node.upload("file.txt", "a|1\n").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // Let the detached coordination finish publishing before subscribing.
    for _ in 0..50 {
        let (_, json) = node.get_submission_json().await;
        if json["receipt"] != "" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    // Subscribing after the fact yields nothing: at-most-once, no replay.
    let mut sub = node.bus.subscribe(EventFilter::all());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(matches!(sub.try_recv(), Ok(None)));
}
