//! End-to-end dispatcher tests with in-memory capabilities.
//!
//! Exercises the webhook handler the way GitHub drives it: raw bytes plus
//! an `x-github-event` header, with the pipeline wired to fakes that record
//! every call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};

use vigil_core::{ChangedFile, ContentMode, PullRequestRef, VigilError};
use vigil_review::capabilities::{SourceControl, TextGenerator};
use vigil_review::pipeline::ReviewPipeline;
use vigil_server::webhook::handle_webhook;
use vigil_server::AppState;

struct RecordingSource {
    list_calls: AtomicUsize,
    comments: Mutex<Vec<String>>,
}

impl RecordingSource {
    fn new() -> Self {
        Self {
            list_calls: AtomicUsize::new(0),
            comments: Mutex::new(Vec::new()),
        }
    }

    fn comment_count(&self) -> usize {
        self.comments.lock().unwrap().len()
    }
}

#[async_trait]
impl SourceControl for RecordingSource {
    async fn list_changed_files(
        &self,
        _pr: &PullRequestRef,
    ) -> Result<Vec<ChangedFile>, VigilError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![ChangedFile {
            path: "src/lib.rs".into(),
            sha: "abc".into(),
            patch: Some("+pub fn f() {}".into()),
            content: None,
        }])
    }

    async fn fetch_blob(&self, _pr: &PullRequestRef, sha: &str) -> Result<String, VigilError> {
        Err(VigilError::Upstream(format!("no blob {sha} in this test")))
    }

    async fn create_issue_comment(
        &self,
        _pr: &PullRequestRef,
        body: &str,
    ) -> Result<(), VigilError> {
        self.comments.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

struct EchoModel;

#[async_trait]
impl TextGenerator for EchoModel {
    async fn generate(&self, _prompt: &str) -> Result<String, VigilError> {
        Ok("LGTM 👍".into())
    }
}

fn state(source: Arc<RecordingSource>) -> AppState {
    AppState {
        pipeline: Arc::new(ReviewPipeline::new(
            source,
            Arc::new(EchoModel),
            ContentMode::Diff,
        )),
    }
}

fn headers(event: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-github-event", HeaderValue::from_str(event).unwrap());
    headers
}

fn pr_payload() -> Bytes {
    Bytes::from(
        serde_json::json!({
            "action": "opened",
            "pull_request": {
                "number": 42,
                "base": {
                    "repo": {
                        "name": "repo",
                        "owner": { "login": "org" }
                    }
                }
            }
        })
        .to_string(),
    )
}

/// Poll until the source has seen `want` comments or a second has passed.
async fn wait_for_comments(source: &RecordingSource, want: usize) {
    for _ in 0..100 {
        if source.comment_count() >= want {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {want} comments, saw {} after 1s",
        source.comment_count()
    );
}

#[tokio::test]
async fn non_pull_request_event_is_acknowledged_without_pipeline() {
    let source = Arc::new(RecordingSource::new());
    let status = handle_webhook(State(state(source.clone())), headers("push"), pr_payload()).await;

    assert_eq!(status, StatusCode::OK);
    // Give a stray spawn a chance to run before asserting it never happened
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 0);
    assert_eq!(source.comment_count(), 0);
}

#[tokio::test]
async fn missing_event_header_is_acknowledged_without_pipeline() {
    let source = Arc::new(RecordingSource::new());
    let status = handle_webhook(State(state(source.clone())), HeaderMap::new(), pr_payload()).await;

    assert_eq!(status, StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_json_body_is_acknowledged_without_pipeline() {
    let source = Arc::new(RecordingSource::new());
    let status = handle_webhook(
        State(state(source.clone())),
        headers("pull_request"),
        Bytes::from_static(b"not json"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_pull_request_payload_is_acknowledged_without_pipeline() {
    let source = Arc::new(RecordingSource::new());
    let status = handle_webhook(
        State(state(source.clone())),
        headers("pull_request"),
        Bytes::from(r#"{"action":"opened","pull_request":{}}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_event_runs_pipeline_and_posts_comment() {
    let source = Arc::new(RecordingSource::new());
    let status = handle_webhook(
        State(state(source.clone())),
        headers("pull_request"),
        pr_payload(),
    )
    .await;

    // 200 is returned before (or independent of) review completion
    assert_eq!(status, StatusCode::OK);
    wait_for_comments(&source, 1).await;
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);

    let comment = source.comments.lock().unwrap()[0].clone();
    assert!(comment.contains("## 코드 분석 결과"));
    assert!(comment.contains("### `src/lib.rs`"));
}

#[tokio::test]
async fn replayed_delivery_posts_two_comments() {
    // Documented behavior: no deduplication between deliveries
    let source = Arc::new(RecordingSource::new());
    let app_state = state(source.clone());

    for _ in 0..2 {
        let status = handle_webhook(
            State(app_state.clone()),
            headers("pull_request"),
            pr_payload(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    wait_for_comments(&source, 2).await;
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn pipeline_failure_never_reaches_the_response() {
    struct BrokenSource;

    #[async_trait]
    impl SourceControl for BrokenSource {
        async fn list_changed_files(
            &self,
            _pr: &PullRequestRef,
        ) -> Result<Vec<ChangedFile>, VigilError> {
            Err(VigilError::Upstream("GitHub API error 502".into()))
        }
        async fn fetch_blob(
            &self,
            _pr: &PullRequestRef,
            _sha: &str,
        ) -> Result<String, VigilError> {
            Err(VigilError::Upstream("unreachable".into()))
        }
        async fn create_issue_comment(
            &self,
            _pr: &PullRequestRef,
            _body: &str,
        ) -> Result<(), VigilError> {
            Err(VigilError::Upstream("unreachable".into()))
        }
    }

    let app_state = AppState {
        pipeline: Arc::new(ReviewPipeline::new(
            Arc::new(BrokenSource),
            Arc::new(EchoModel),
            ContentMode::Diff,
        )),
    };

    let status = handle_webhook(State(app_state), headers("pull_request"), pr_payload()).await;
    assert_eq!(status, StatusCode::OK);
}
