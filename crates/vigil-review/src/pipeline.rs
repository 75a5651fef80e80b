use std::sync::Arc;

use vigil_core::{
    ChangedFile, ContentMode, PullRequestRef, ReviewOutcome, ReviewResult, ReviewUnit, VigilError,
};

use crate::capabilities::{SourceControl, TextGenerator};
use crate::fetcher::ContentFetcher;
use crate::prompt;
use crate::publisher;

/// Statistics about one completed pipeline run.
///
/// # Examples
///
/// ```
/// use vigil_review::pipeline::PipelineReport;
///
/// let report = PipelineReport {
///     files_listed: 3,
///     units_reviewed: 2,
///     units_failed: 1,
/// };
/// assert_eq!(report.units_reviewed + report.units_failed, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Files the fetcher returned with reviewable content.
    pub files_listed: usize,
    /// Units whose model call succeeded.
    pub units_reviewed: usize,
    /// Units whose model call failed (placeholder posted).
    pub units_failed: usize,
}

/// Orchestrates one review run: fetch → prompt → generate → publish.
///
/// Capabilities are injected once at construction; the pipeline holds no
/// other state and runs are independent — two events for the same pull
/// request produce two separate comments.
pub struct ReviewPipeline {
    source: Arc<dyn SourceControl>,
    model: Arc<dyn TextGenerator>,
    fetcher: ContentFetcher,
}

impl ReviewPipeline {
    /// Create a pipeline from the two capabilities and a content mode.
    pub fn new(
        source: Arc<dyn SourceControl>,
        model: Arc<dyn TextGenerator>,
        mode: ContentMode,
    ) -> Self {
        Self {
            source,
            model,
            fetcher: ContentFetcher::new(mode),
        }
    }

    /// Run the full pipeline for one pull-request event.
    ///
    /// Model-call failures are localized: the affected unit gets a
    /// placeholder section and the batch continues, so one comment is always
    /// posted once the file listing succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Upstream`] if the file listing or the final
    /// comment creation fails. No comment is posted when the listing fails.
    pub async fn run(&self, pr: &PullRequestRef) -> Result<PipelineReport, VigilError> {
        tracing::info!(pr = %pr, mode = %self.fetcher.mode(), "starting review run");

        let files = self.fetcher.fetch_changed_files(self.source.as_ref(), pr).await?;
        let units = build_units(files);
        tracing::debug!(pr = %pr, units = units.len(), "built review units");

        let results = self.generate_all(&units).await;
        let units_failed = results
            .iter()
            .filter(|r| matches!(r.outcome, ReviewOutcome::Failed(_)))
            .count();

        let body = publisher::render_comment(&results);
        self.source.create_issue_comment(pr, &body).await?;

        let report = PipelineReport {
            files_listed: units.len(),
            units_reviewed: units.len() - units_failed,
            units_failed,
        };
        tracing::info!(
            pr = %pr,
            reviewed = report.units_reviewed,
            failed = report.units_failed,
            "posted review comment"
        );
        Ok(report)
    }

    /// Generate one review per unit, strictly sequential in file order.
    ///
    /// An explicit fold: every unit yields a result, success or placeholder,
    /// so the invariant `results.len() == units.len()` holds and one failure
    /// never aborts the loop. Sequential on purpose — the model API is
    /// rate limited.
    async fn generate_all(&self, units: &[ReviewUnit]) -> Vec<ReviewResult> {
        let mut results = Vec::with_capacity(units.len());
        for unit in units {
            let outcome = match self.model.generate(&unit.prompt).await {
                Ok(text) => ReviewOutcome::Reviewed(text),
                Err(e) => {
                    tracing::warn!(path = %unit.file.path, error = %e, "model call failed");
                    ReviewOutcome::Failed(e.to_string())
                }
            };
            results.push(ReviewResult {
                path: unit.file.path.clone(),
                outcome,
            });
        }
        results
    }
}

/// Pair each file that has reviewable text with its rendered prompt.
fn build_units(files: Vec<ChangedFile>) -> Vec<ReviewUnit> {
    let mut units = Vec::with_capacity(files.len());
    for file in files {
        let Some(text) = file.review_text() else {
            tracing::debug!(path = %file.path, "no reviewable text, skipping");
            continue;
        };
        let prompt = prompt::build_review_prompt(text);
        units.push(ReviewUnit { file, prompt });
    }
    units
}
