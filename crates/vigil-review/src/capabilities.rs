//! Capability traits for the two external services the pipeline consumes.
//!
//! The pipeline only sees these traits; production code passes
//! [`crate::github::GitHubClient`] and [`crate::model::GeminiClient`], tests
//! pass in-memory fakes. Both are constructed once at process start and
//! injected — never module-level singletons.

use async_trait::async_trait;
use vigil_core::{ChangedFile, PullRequestRef, VigilError};

/// Source-control hosting capability: the three operations the pipeline needs.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// List the files changed in a pull request.
    ///
    /// Returns one [`ChangedFile`] per entry in listing order, with the
    /// per-file patch attached when the API provides one.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Upstream`] on network, auth, or rate-limit
    /// failures. A listing failure aborts the whole pipeline run.
    async fn list_changed_files(
        &self,
        pr: &PullRequestRef,
    ) -> Result<Vec<ChangedFile>, VigilError>;

    /// Fetch a file's full content by its blob hash, decoded to text.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Upstream`] if the fetch fails or the blob is
    /// not valid UTF-8 text.
    async fn fetch_blob(&self, pr: &PullRequestRef, sha: &str) -> Result<String, VigilError>;

    /// Post a comment on the pull request's issue thread.
    ///
    /// Pull requests share the issue-comment namespace, so the pull request
    /// number doubles as the issue number.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Upstream`] if comment creation fails.
    async fn create_issue_comment(
        &self,
        pr: &PullRequestRef,
        body: &str,
    ) -> Result<(), VigilError>;
}

/// Generative-model capability: text completion for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a text completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Model`] if the call errors, times out, or the
    /// response cannot be interpreted as text.
    async fn generate(&self, prompt: &str) -> Result<String, VigilError>;
}
