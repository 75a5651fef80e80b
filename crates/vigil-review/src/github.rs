use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use vigil_core::{ChangedFile, PullRequestRef, VigilError};

use crate::capabilities::SourceControl;

/// GitHub client implementing the [`SourceControl`] capability.
///
/// Wraps an authenticated `octocrab` instance and talks to the three REST
/// routes the pipeline needs: pull-request file listing, blob fetch, and
/// issue-comment creation.
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
}

/// One entry from `GET /repos/{owner}/{repo}/pulls/{number}/files`.
#[derive(Debug, Deserialize)]
struct PullFileEntry {
    filename: String,
    sha: String,
    patch: Option<String>,
}

/// Response of `GET /repos/{owner}/{repo}/git/blobs/{sha}`.
#[derive(Debug, Deserialize)]
struct BlobEntry {
    content: String,
    encoding: String,
}

impl GitHubClient {
    /// Create a client from an explicit token or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if no token is available, or
    /// [`VigilError::Upstream`] if the client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vigil_review::github::GitHubClient;
    ///
    /// let client = GitHubClient::new(Some("ghp_xxxx")).unwrap();
    /// ```
    pub fn new(token: Option<&str>) -> Result<Self, VigilError> {
        let token = match token {
            Some(t) => t.to_string(),
            None => std::env::var("GITHUB_TOKEN").map_err(|_| {
                VigilError::Config(
                    "GITHUB_TOKEN not set. Set [github].token or the GITHUB_TOKEN env var".into(),
                )
            })?,
        };

        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|e| VigilError::Upstream(format!("failed to create GitHub client: {e}")))?;

        Ok(Self { octocrab })
    }
}

#[async_trait]
impl SourceControl for GitHubClient {
    async fn list_changed_files(
        &self,
        pr: &PullRequestRef,
    ) -> Result<Vec<ChangedFile>, VigilError> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/files?per_page=100",
            pr.owner, pr.repo, pr.number
        );

        let entries: Vec<PullFileEntry> = self
            .octocrab
            .get(route, None::<&()>)
            .await
            .map_err(|e| VigilError::Upstream(format!("failed to list changed files: {e}")))?;

        Ok(entries
            .into_iter()
            .map(|e| ChangedFile {
                path: e.filename,
                sha: e.sha,
                patch: e.patch,
                content: None,
            })
            .collect())
    }

    async fn fetch_blob(&self, pr: &PullRequestRef, sha: &str) -> Result<String, VigilError> {
        let route = format!("/repos/{}/{}/git/blobs/{sha}", pr.owner, pr.repo);

        let blob: BlobEntry = self
            .octocrab
            .get(route, None::<&()>)
            .await
            .map_err(|e| VigilError::Upstream(format!("failed to fetch blob {sha}: {e}")))?;

        if blob.encoding != "base64" {
            return Err(VigilError::Upstream(format!(
                "unexpected blob encoding '{}' for {sha}",
                blob.encoding
            )));
        }

        decode_blob_content(&blob.content)
    }

    async fn create_issue_comment(
        &self,
        pr: &PullRequestRef,
        body: &str,
    ) -> Result<(), VigilError> {
        let route = format!(
            "/repos/{}/{}/issues/{}/comments",
            pr.owner, pr.repo, pr.number
        );
        let payload = serde_json::json!({ "body": body });

        let _response: serde_json::Value = self
            .octocrab
            .post(route, Some(&payload))
            .await
            .map_err(|e| VigilError::Upstream(format!("failed to create comment: {e}")))?;

        Ok(())
    }
}

/// Decode base64 blob content as returned by the GitHub API.
///
/// The API wraps the base64 payload in newlines, which the strict decoder
/// rejects, so whitespace is stripped first.
///
/// # Errors
///
/// Returns [`VigilError::Upstream`] if the payload is not valid base64 or
/// does not decode to UTF-8 text.
pub fn decode_blob_content(content: &str) -> Result<String, VigilError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| VigilError::Upstream(format!("invalid base64 blob content: {e}")))?;

    String::from_utf8(bytes)
        .map_err(|_| VigilError::Upstream("blob content is not valid UTF-8".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_plain_base64() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("fn main() {}\n");
        assert_eq!(decode_blob_content(&encoded).unwrap(), "fn main() {}\n");
    }

    #[test]
    fn decode_base64_with_api_newlines() {
        // GitHub inserts a newline every 60 characters
        let encoded = base64::engine::general_purpose::STANDARD
            .encode("a long enough payload to span multiple base64 lines in the API response");
        let wrapped: String = encoded
            .as_bytes()
            .chunks(60)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        let decoded = decode_blob_content(&wrapped).unwrap();
        assert!(decoded.starts_with("a long enough payload"));
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        assert!(decode_blob_content("!!! not base64 !!!").is_err());
    }

    #[test]
    fn decode_rejects_non_utf8() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([0xff, 0xfe, 0x00, 0x80]);
        assert!(decode_blob_content(&encoded).is_err());
    }

    #[tokio::test]
    async fn client_requires_token() {
        // Guard against ambient credentials leaking into the test
        if std::env::var("GITHUB_TOKEN").is_ok() {
            return;
        }
        assert!(GitHubClient::new(None).is_err());
        assert!(GitHubClient::new(Some("ghp_test")).is_ok());
    }
}
