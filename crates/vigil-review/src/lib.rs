//! Review orchestration: the pipeline from changed files to a posted comment.
//!
//! Provides the capability traits for the two external services, their
//! production implementations ([`github::GitHubClient`],
//! [`model::GeminiClient`]), prompt construction, content fetching, and the
//! [`pipeline::ReviewPipeline`] that drives one review run per webhook event.

pub mod capabilities;
pub mod fetcher;
pub mod github;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod publisher;
