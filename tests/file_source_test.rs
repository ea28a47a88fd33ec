// Tests for reading a recorded event stream from disk through AsyncReadLines.

mod common;

use common::{block, body, mixed_session, TAINT_CLOSED};
use pushstream::adapters::AsyncReadLines;
use pushstream::{CancellationToken, EventStream, ListenOutcome, ServerEvent};
use std::io::Write;
use tokio::io::BufReader;

async fn open(file: &tempfile::NamedTempFile) -> AsyncReadLines<BufReader<tokio::fs::File>> {
    let handle = tokio::fs::File::open(file.path()).await.unwrap();
    AsyncReadLines::new(BufReader::new(handle))
}

#[tokio::test]
async fn test_recorded_session_replays_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(body(&mixed_session()).as_bytes()).unwrap();
    file.flush().unwrap();

    let stream = EventStream::new(open(&file).await);
    let token = CancellationToken::new();
    let handle = stream.begin_listening(&token).unwrap();

    let mut events = Vec::new();
    while let Some(event) = stream.read_next(&token).await {
        events.push(event);
    }

    assert_eq!(events.len(), 3);
    match &events[0] {
        ServerEvent::IssueChanged(issue) => {
            assert_eq!(issue.project_key(), "projectKey1");
            assert!(issue.is_resolved());
            assert_eq!(issue.issues()[0].branch_name(), "master");
        }
        other => panic!("expected IssueChanged, got {:?}", other),
    }
    assert_eq!(handle.finished().await, ListenOutcome::Ended);
}

#[tokio::test]
async fn test_invalid_utf8_does_not_stop_stream() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"event: Garbage\ndata: \xff\xfe\n\n").unwrap();
    file.write_all(body(&block("TaintVulnerabilityClosed", TAINT_CLOSED)).as_bytes())
        .unwrap();
    file.flush().unwrap();

    let stream = EventStream::new(open(&file).await);
    let token = CancellationToken::new();
    stream.begin_listening(&token).unwrap();

    let event = stream.read_next(&token).await.unwrap();
    assert_eq!(event.project_keys(), vec!["projectKey1"]);
    assert!(stream.read_next(&token).await.is_none());
}

#[tokio::test]
async fn test_empty_file_ends_immediately() {
    let file = tempfile::NamedTempFile::new().unwrap();

    let stream = EventStream::new(open(&file).await);
    let token = CancellationToken::new();
    let handle = stream.begin_listening(&token).unwrap();

    assert!(stream.read_next(&token).await.is_none());
    assert_eq!(handle.finished().await, ListenOutcome::Ended);
}
