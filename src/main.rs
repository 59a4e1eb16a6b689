use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use bookshelf_mcp::domain::summary::SummaryService;
use bookshelf_mcp::infra::gemini::{GeminiConfig, GeminiSummaryService, UnconfiguredSummaryService};

/// Personal book library served over MCP (stdio).
#[derive(Parser)]
#[command(name = "bookshelf-mcp", version, about)]
struct Cli {
    /// Library file (JSON array of books)
    #[arg(default_value = "library.json")]
    library: PathBuf,

    /// Gemini model used for summaries of unknown titles
    #[arg(long, default_value = "gemini-1.5-flash")]
    gemini_model: String,

    /// Timeout for summary requests, in seconds
    #[arg(long, default_value_t = 30)]
    summary_timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdoutはMCPプロトコル用なのでログはstderrへ
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let summary: Arc<dyn SummaryService + Send + Sync> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let mut config = GeminiConfig::new(key);
            config.model = cli.gemini_model;
            config.timeout_secs = cli.summary_timeout;
            Arc::new(GeminiSummaryService::new(config))
        }
        _ => {
            tracing::warn!("GEMINI_API_KEY is not set; search fallback summaries are disabled");
            Arc::new(UnconfiguredSummaryService)
        }
    };

    bookshelf_mcp::interface::mcp::run(cli.library, summary).await
}
