use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;

use vigil_core::{PullRequestRef, VigilError};
use vigil_review::pipeline::ReviewPipeline;

/// Shared state handed to the webhook handler.
#[derive(Clone)]
pub struct AppState {
    /// The review pipeline, constructed once at startup.
    pub pipeline: Arc<ReviewPipeline>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .with_state(state)
}

/// `POST /webhook` handler.
///
/// Steps:
/// 1. Read the event type from the `x-github-event` header; anything other
///    than `pull_request` is acknowledged with 200 and ignored.
/// 2. Extract the [`PullRequestRef`] from the payload; a malformed payload
///    is logged and acknowledged with 200 — non-2xx responses make GitHub
///    retry, and spurious retries must be avoided.
/// 3. Spawn the pipeline as a detached task with a self-contained error
///    path, then return 200 independent of review completion.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let event = headers
        .get("x-github-event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if event != "pull_request" {
        tracing::debug!(event, "ignoring non-pull_request event");
        return StatusCode::OK;
    }

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse webhook payload");
            return StatusCode::OK;
        }
    };

    let pr = match extract_pr_ref(&payload) {
        Ok(pr) => pr,
        Err(e) => {
            tracing::warn!(error = %e, "malformed pull_request payload");
            return StatusCode::OK;
        }
    };

    tracing::info!(pr = %pr, "pull_request event accepted");

    // Fire and forget: nothing downstream awaits this task, so its failure
    // path must end here.
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        if let Err(e) = pipeline.run(&pr).await {
            tracing::error!(pr = %pr, error = %e, "review pipeline failed");
        }
    });

    StatusCode::OK
}

/// Extract the pull-request identity from a `pull_request` event payload.
///
/// Required fields: `pull_request.number`,
/// `pull_request.base.repo.owner.login`, `pull_request.base.repo.name`.
///
/// # Errors
///
/// Returns [`VigilError::MalformedEvent`] naming the first missing field.
pub fn extract_pr_ref(payload: &serde_json::Value) -> Result<PullRequestRef, VigilError> {
    let pr = payload
        .get("pull_request")
        .ok_or_else(|| VigilError::MalformedEvent("missing pull_request".into()))?;

    let number = pr
        .get("number")
        .and_then(|n| n.as_u64())
        .ok_or_else(|| VigilError::MalformedEvent("missing pull_request.number".into()))?;

    let repo = pr
        .get("base")
        .and_then(|b| b.get("repo"))
        .ok_or_else(|| VigilError::MalformedEvent("missing pull_request.base.repo".into()))?;

    let owner = repo
        .get("owner")
        .and_then(|o| o.get("login"))
        .and_then(|l| l.as_str())
        .ok_or_else(|| {
            VigilError::MalformedEvent("missing pull_request.base.repo.owner.login".into())
        })?;

    let name = repo
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| VigilError::MalformedEvent("missing pull_request.base.repo.name".into()))?;

    Ok(PullRequestRef {
        owner: owner.to_string(),
        repo: name.to_string(),
        number,
    })
}
