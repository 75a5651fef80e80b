//! Markdown rendering for the single aggregated review comment.

use vigil_core::{ReviewOutcome, ReviewResult};

/// Fixed heading of every posted comment.
pub const COMMENT_HEADING: &str = "## 코드 분석 결과";

/// Placeholder section body for a unit whose model call failed.
pub const FAILURE_PLACEHOLDER: &str = "⚠️ 이 파일에 대한 리뷰 생성에 실패했습니다.";

/// Body used when the pull request has no reviewable content at all.
pub const EMPTY_REVIEW_BODY: &str = "변경된 코드에 분석할 내용이 없습니다.";

/// Render the aggregated comment body from per-file results.
///
/// One section per [`ReviewResult`], in the order the fetcher produced them.
/// Failed units render the failure placeholder — never silently omitted.
///
/// # Examples
///
/// ```
/// use vigil_core::{ReviewOutcome, ReviewResult};
/// use vigil_review::publisher::render_comment;
///
/// let results = vec![ReviewResult {
///     path: "src/main.rs".into(),
///     outcome: ReviewOutcome::Reviewed("좋아 보입니다 👍".into()),
/// }];
/// let body = render_comment(&results);
/// assert!(body.contains("## 코드 분석 결과"));
/// assert!(body.contains("src/main.rs"));
/// ```
pub fn render_comment(results: &[ReviewResult]) -> String {
    let mut body = String::new();
    body.push_str(COMMENT_HEADING);
    body.push_str("\n\n");

    if results.is_empty() {
        body.push_str(EMPTY_REVIEW_BODY);
        body.push('\n');
        return body;
    }

    for result in results {
        body.push_str(&format!("### `{}`\n\n", result.path));
        match &result.outcome {
            ReviewOutcome::Reviewed(text) => body.push_str(text.trim_end()),
            ReviewOutcome::Failed(_) => body.push_str(FAILURE_PLACEHOLDER),
        }
        body.push_str("\n\n");
    }

    body.truncate(body.trim_end().len());
    body.push('\n');
    body
}
