use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VigilError;
use crate::types::ContentMode;

/// Top-level configuration loaded from `vigil.toml`.
///
/// Supports layered resolution: CLI flags > env vars > config file > defaults.
/// Call [`VigilConfig::apply_env`] after loading to layer the environment on
/// top of the file values.
///
/// # Examples
///
/// ```
/// use vigil_core::VigilConfig;
///
/// let config = VigilConfig::default();
/// assert_eq!(config.server.port, 3000);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VigilConfig {
    /// Source-control API settings.
    #[serde(default)]
    pub github: GithubConfig,
    /// Generative-model API settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Review behavior settings.
    #[serde(default)]
    pub review: ReviewConfig,
}

impl VigilConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Io`] if the file cannot be read, or
    /// [`VigilError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vigil_core::VigilConfig;
    /// use std::path::Path;
    ///
    /// let config = VigilConfig::from_file(Path::new("vigil.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, VigilError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil_core::VigilConfig;
    ///
    /// let toml = r#"
    /// [server]
    /// port = 8080
    /// "#;
    /// let config = VigilConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.server.port, 8080);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, VigilError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Layer recognized environment variables on top of the loaded values.
    ///
    /// Recognized: `GITHUB_TOKEN`, `GEMINI_API_KEY`, `GEMINI_BASE_URL`,
    /// `GEMINI_MODEL`, `PORT`, `VIGIL_CONTENT_MODE`. Unset variables leave
    /// the existing values untouched; an unparsable `PORT` or
    /// `VIGIL_CONTENT_MODE` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if a set variable has an invalid value.
    pub fn apply_env(&mut self) -> Result<(), VigilError> {
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.model.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            self.model.base_url = Some(url);
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.model.model = model;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| VigilError::Config(format!("invalid PORT value: {port}")))?;
        }
        if let Ok(mode) = std::env::var("VIGIL_CONTENT_MODE") {
            self.review.mode = mode.parse()?;
        }
        Ok(())
    }
}

/// Source-control API configuration.
///
/// # Examples
///
/// ```
/// use vigil_core::GithubConfig;
///
/// let config = GithubConfig::default();
/// assert!(config.token.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Personal access token for the GitHub API.
    pub token: Option<String>,
}

/// Generative-model API configuration.
///
/// # Examples
///
/// ```
/// use vigil_core::ModelConfig;
///
/// let config = ModelConfig::default();
/// assert_eq!(config.model, "gemini-2.0-flash");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key for the model provider.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: default_model(),
        }
    }
}

/// HTTP server configuration.
///
/// # Examples
///
/// ```
/// use vigil_core::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.port, 3000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Review behavior configuration.
///
/// # Examples
///
/// ```
/// use vigil_core::{ContentMode, ReviewConfig};
///
/// let config = ReviewConfig::default();
/// assert_eq!(config.mode, ContentMode::Diff);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Content-acquisition strategy (default: diff).
    #[serde(default)]
    pub mode: ContentMode,
}
