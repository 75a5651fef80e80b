/// Errors that can occur across the Vigil service.
///
/// Each variant wraps a specific failure domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the boundary.
/// None of these ever reach the webhook HTTP response — the dispatcher
/// acknowledges events before the pipeline runs.
///
/// # Examples
///
/// ```
/// use vigil_core::VigilError;
///
/// let err = VigilError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Webhook payload missing required fields.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Source-control API call failure (auth, rate limit, network, not found).
    #[error("source control error: {0}")]
    Upstream(String),

    /// Generative-model API call or response failure.
    #[error("model error: {0}")]
    Model(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
