use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VigilError;

/// Identifies the pull request a pipeline run operates on.
///
/// Derived from the inbound webhook payload and immutable for the lifetime
/// of one run.
///
/// # Examples
///
/// ```
/// use vigil_core::PullRequestRef;
///
/// let pr = PullRequestRef {
///     owner: "octocat".into(),
///     repo: "hello-world".into(),
///     number: 42,
/// };
/// assert_eq!(format!("{pr}"), "octocat/hello-world#42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRef {
    /// Repository owner login.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// One file changed in a pull request.
///
/// `patch` is present in diff mode, `content` (already decoded from the
/// transfer encoding) in blob mode. A file may carry neither — binary files
/// and rename-only entries have no textual diff — and must be skippable
/// without failing the batch.
///
/// # Examples
///
/// ```
/// use vigil_core::ChangedFile;
///
/// let file = ChangedFile {
///     path: "src/main.rs".into(),
///     sha: "abc123".into(),
///     patch: Some("+fn main() {}".into()),
///     content: None,
/// };
/// assert_eq!(file.review_text(), Some("+fn main() {}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFile {
    /// Path of the file within the repository.
    pub path: String,
    /// Content-addressed blob hash for this file at the head revision.
    pub sha: String,
    /// Unified diff text for this file, when available.
    pub patch: Option<String>,
    /// Full decoded file content, when fetched in blob mode.
    pub content: Option<String>,
}

impl ChangedFile {
    /// Return the text this file contributes to a review, if any.
    ///
    /// Prefers the full content over the patch when both are present.
    pub fn review_text(&self) -> Option<&str> {
        self.content.as_deref().or(self.patch.as_deref())
    }
}

/// One reviewable file paired with the prompt built for it.
///
/// One-to-one with each [`ChangedFile`] that has reviewable content.
#[derive(Debug, Clone)]
pub struct ReviewUnit {
    /// The file this unit reviews.
    pub file: ChangedFile,
    /// Fully rendered prompt sent to the model.
    pub prompt: String,
}

/// Outcome of one model invocation.
///
/// A failed unit yields [`ReviewOutcome::Failed`], never a dropped result —
/// the aggregated comment always contains one section per submitted unit.
///
/// # Examples
///
/// ```
/// use vigil_core::ReviewOutcome;
///
/// let ok = ReviewOutcome::Reviewed("looks good".into());
/// assert!(matches!(ok, ReviewOutcome::Reviewed(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The model produced review text.
    Reviewed(String),
    /// The model call failed; the string is the error description.
    Failed(String),
}

/// Result of reviewing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewResult {
    /// Path of the reviewed file.
    pub path: String,
    /// What the model produced, or why it could not.
    pub outcome: ReviewOutcome,
}

/// Content-acquisition strategy for the fetcher.
///
/// A configuration choice made once at fetcher construction time; the two
/// modes are mutually exclusive.
///
/// # Examples
///
/// ```
/// use vigil_core::ContentMode;
///
/// let mode: ContentMode = "blob".parse().unwrap();
/// assert_eq!(mode, ContentMode::Blob);
/// assert_eq!(format!("{}", ContentMode::Diff), "diff");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Review the per-file patch text returned by the file listing.
    #[default]
    Diff,
    /// Fetch and review the full decoded blob content of each file.
    Blob,
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentMode::Diff => write!(f, "diff"),
            ContentMode::Blob => write!(f, "blob"),
        }
    }
}

impl FromStr for ContentMode {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "diff" => Ok(ContentMode::Diff),
            "blob" => Ok(ContentMode::Blob),
            other => Err(VigilError::Config(format!(
                "invalid content mode '{other}', expected 'diff' or 'blob'"
            ))),
        }
    }
}
