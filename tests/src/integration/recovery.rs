//! Durable recovery: entity state survives passivation and process-style
//! restarts via the file-backed log.

use df_01_event_log::{recover, EventStore, FileEventStore, MemoryEventStore, StoreLock};
use df_02_submission_entity::{EntityRegistry, EntityRegistryConfig};
use df_03_raw_ingestion::RawDataIngestor;
use futures::stream;
use shared_types::{Submission, SubmissionId, SubmissionStatus};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

fn make_id() -> SubmissionId {
    SubmissionId::new("ABC123", "2019", 1)
}

fn one_chunk(content: &str) -> impl futures::Stream<Item = Result<bytes::Bytes, Infallible>> + Unpin
{
    stream::iter(vec![Ok(bytes::Bytes::copy_from_slice(content.as_bytes()))])
}

#[tokio::test]
async fn test_registry_restart_over_file_store_replays_identical_state() {
    let dir = tempfile::tempdir().unwrap();
    let id = make_id();

    let before = {
        let store = Arc::new(FileEventStore::open(dir.path()).unwrap());
        let registry = EntityRegistry::new(store, EntityRegistryConfig::for_testing());
        let entity = registry.entity(&id).unwrap();
        entity.create_submission(100).await.unwrap();
        entity.start_upload(150).await.unwrap();

        RawDataIngestor::default()
            .ingest(&entity, one_chunk("a|1\nb|2\nc|3\n"))
            .await
            .unwrap();

        let record = entity.get_submission().await.unwrap();
        registry.shutdown_all().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        record
    };

    // Fresh registry over the same directory: replay must reconstruct the
    // exact record.
    let store = Arc::new(FileEventStore::open(dir.path()).unwrap());
    let registry = EntityRegistry::new(store.clone(), EntityRegistryConfig::for_testing());
    let after = registry
        .entity(&id)
        .unwrap()
        .get_submission()
        .await
        .unwrap();

    assert_eq!(after, before);
    assert_eq!(after.status, SubmissionStatus::Uploaded);

    // Created + Uploading + three lines + Uploaded.
    assert_eq!(store.event_count(&id.log_key()).unwrap(), 6);
}

#[tokio::test]
async fn test_replay_is_batching_independent() {
    let store = MemoryEventStore::new();
    let registry = EntityRegistry::new(
        Arc::new(MemoryEventStore::new()),
        EntityRegistryConfig::for_testing(),
    );
    let id = make_id();

    // Build a log through the entity, then copy it into a bare store.
    let entity = registry.entity(&id).unwrap();
    entity.create_submission(100).await.unwrap();
    entity.start_upload(150).await.unwrap();
    entity.add_line(150, "a|1".into()).await.unwrap();
    entity.add_line(150, "b|2".into()).await.unwrap();
    entity.complete_upload(150).await.unwrap();

    let registry_record = entity.get_submission().await.unwrap();

    // The same history, written out by hand.
    let uploading = Submission::created(100)
        .with_status(SubmissionStatus::Uploading)
        .unwrap();
    let events = vec![
        shared_types::SubmissionEvent::SubmissionCreated(Submission::created(100)),
        shared_types::SubmissionEvent::SubmissionModified(uploading.clone()),
        shared_types::SubmissionEvent::LineAdded {
            timestamp: 150,
            data: "a|1".into(),
        },
        shared_types::SubmissionEvent::LineAdded {
            timestamp: 150,
            data: "b|2".into(),
        },
        shared_types::SubmissionEvent::SubmissionModified(
            uploading.with_status(SubmissionStatus::Uploaded).unwrap(),
        ),
    ];

    for event in &events {
        store.append(&id.log_key(), event).unwrap();
    }

    let whole = recover(&store, &id.log_key()).unwrap().record;
    let stepwise = events
        .iter()
        .fold(Submission::default(), |state, e| state.apply(e));

    assert_eq!(whole, stepwise);
    assert_eq!(whole, registry_record);
}

#[tokio::test]
async fn test_store_lock_excludes_second_node() {
    let dir = tempfile::tempdir().unwrap();

    let first = StoreLock::acquire(dir.path()).unwrap();
    let second = StoreLock::acquire(dir.path());
    assert!(second.is_err());

    drop(first);
    assert!(StoreLock::acquire(dir.path()).is_ok());
}

#[tokio::test]
async fn test_passivated_entity_reactivates_with_state() {
    let store = Arc::new(MemoryEventStore::new());
    let registry = EntityRegistry::new(
        store,
        EntityRegistryConfig {
            idle_timeout: Duration::from_millis(50),
            ..EntityRegistryConfig::for_testing()
        },
    );
    let id = make_id();

    registry
        .entity(&id)
        .unwrap()
        .create_submission(100)
        .await
        .unwrap();

    // Wait past the idle timeout so the entity passivates itself.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(registry.live_count(), 0);

    // Addressing the id again transparently re-activates and replays.
    let record = registry
        .entity(&id)
        .unwrap()
        .get_submission()
        .await
        .unwrap();
    assert_eq!(record.status, SubmissionStatus::Created);
    assert_eq!(record.start, 100);
}
