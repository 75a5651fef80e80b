use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result};

use vigil_core::{ContentMode, VigilConfig};
use vigil_review::github::GitHubClient;
use vigil_review::model::GeminiClient;
use vigil_review::pipeline::ReviewPipeline;
use vigil_server::AppState;

#[derive(Parser)]
#[command(
    name = "vigil",
    version,
    about = "Webhook-driven AI pull request reviewer",
    long_about = "Vigil listens for GitHub pull_request webhooks, sends the changed files\n\
                   to a generative model for review, and posts the aggregated feedback as\n\
                   a single PR comment.\n\n\
                   Examples:\n  \
                     vigil                          Serve on the configured port (default 3000)\n  \
                     vigil --port 8080              Override the listening port\n  \
                     vigil --mode blob              Review full file contents instead of diffs\n  \
                     vigil --config ./vigil.toml    Use an explicit config file"
)]
struct Cli {
    /// Path to configuration file (default: vigil.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(long)]
    port: Option<u16>,

    /// Override the content mode (diff or blob)
    #[arg(long)]
    mode: Option<ContentMode>,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<VigilConfig> {
    let mut config = match &cli.config {
        Some(path) => VigilConfig::from_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let default_path = Path::new("vigil.toml");
            if default_path.exists() {
                VigilConfig::from_file(default_path).into_diagnostic()?
            } else {
                VigilConfig::default()
            }
        }
    };

    config.apply_env().into_diagnostic()?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(mode) = cli.mode {
        config.review.mode = mode;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "vigil=debug,info" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&cli)?;

    let github = GitHubClient::new(config.github.token.as_deref())
        .into_diagnostic()
        .wrap_err("GitHub client setup failed")?;
    let model = GeminiClient::new(&config.model)
        .into_diagnostic()
        .wrap_err("model client setup failed")?;

    let pipeline = ReviewPipeline::new(Arc::new(github), Arc::new(model), config.review.mode);
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    tracing::info!(
        port = config.server.port,
        mode = %config.review.mode,
        model = %config.model.model,
        "starting vigil"
    );

    vigil_server::run(config.server.port, state)
        .await
        .into_diagnostic()
        .wrap_err("server failed")?;

    Ok(())
}
