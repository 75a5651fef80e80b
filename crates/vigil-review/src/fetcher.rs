use futures::future;

use vigil_core::{ChangedFile, ContentMode, PullRequestRef, VigilError};

use crate::capabilities::SourceControl;

/// Retrieves the changed files of a pull request with their reviewable text.
///
/// The content-acquisition strategy is fixed at construction time:
///
/// - [`ContentMode::Diff`] uses the per-file patch already returned by the
///   listing call; files with no patch (binary, rename-only) are filtered out.
/// - [`ContentMode::Blob`] additionally fetches every file's full content by
///   blob hash, concurrently across files, reassembled in listing order.
pub struct ContentFetcher {
    mode: ContentMode,
}

impl ContentFetcher {
    /// Create a fetcher with the given content mode.
    pub fn new(mode: ContentMode) -> Self {
        Self { mode }
    }

    /// Return the configured content mode.
    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    /// Fetch the changed files of `pr`, ready for prompt construction.
    ///
    /// Individual blob-fetch failures do not fail the batch: the affected
    /// file is dropped with a logged warning. Listing order is preserved in
    /// both modes.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Upstream`] only if the file-listing call itself
    /// fails.
    pub async fn fetch_changed_files(
        &self,
        source: &dyn SourceControl,
        pr: &PullRequestRef,
    ) -> Result<Vec<ChangedFile>, VigilError> {
        let files = source.list_changed_files(pr).await?;
        tracing::debug!(pr = %pr, files = files.len(), mode = %self.mode, "listed changed files");

        match self.mode {
            ContentMode::Diff => Ok(files.into_iter().filter(|f| f.patch.is_some()).collect()),
            ContentMode::Blob => {
                let fetches = files.iter().map(|f| source.fetch_blob(pr, &f.sha));
                let contents = future::join_all(fetches).await;

                let mut fetched = Vec::with_capacity(files.len());
                for (mut file, content) in files.into_iter().zip(contents) {
                    match content {
                        Ok(text) => {
                            file.content = Some(text);
                            fetched.push(file);
                        }
                        Err(e) => {
                            tracing::warn!(
                                pr = %pr,
                                path = %file.path,
                                error = %e,
                                "blob fetch failed, skipping file"
                            );
                        }
                    }
                }
                Ok(fetched)
            }
        }
    }
}
