mod parse_html;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pagedate_core::{
    extract_batch, extract_url, BatchExtractRequest, ExtractConfig, ExtractRequest,
    ReqwestClient, DEFAULT_BATCH_CONCURRENCY,
};

#[derive(Parser)]
#[command(name = "pagedate")]
#[command(
    about = "Estimate when a web page was created, modified and published",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a URL and print its consolidated timestamps as JSON
    Extract {
        url: String,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Fetch several URLs concurrently and print one result per URL
    Batch {
        /// URLs to process (in addition to any read from --file)
        urls: Vec<String>,
        /// File with one URL per line; blank lines and # comments are ignored
        #[arg(long)]
        file: Option<PathBuf>,
        /// Maximum number of concurrent fetches
        #[arg(long, default_value_t = DEFAULT_BATCH_CONCURRENCY)]
        concurrency: usize,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Extract timestamps from a saved HTML file without fetching
    ParseHtml {
        file: PathBuf,
        /// URL to report in the result
        #[arg(long, default_value = "")]
        url: String,
        /// Response header as "name: value" (repeatable)
        #[arg(long = "header", value_name = "NAME: VALUE")]
        headers: Vec<String>,
        /// Skip free-text heuristics
        #[arg(long)]
        no_heuristics: bool,
    },
}

/// Flags shared by the fetching commands. Unset flags keep the
/// environment/default value.
#[derive(Args)]
struct ConfigArgs {
    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// User agent sent with requests
    #[arg(long)]
    user_agent: Option<String>,
    /// Do not follow redirects
    #[arg(long)]
    no_follow_redirects: bool,
    /// Maximum redirects to follow
    #[arg(long)]
    max_redirects: Option<usize>,
    /// Skip free-text heuristics
    #[arg(long)]
    no_heuristics: bool,
}

impl ConfigArgs {
    fn into_config(self) -> ExtractConfig {
        let mut config = ExtractConfig::from_env();
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        if let Some(ua) = self.user_agent {
            config.user_agent = ua;
        }
        if self.no_follow_redirects {
            config.follow_redirects = false;
        }
        if let Some(max) = self.max_redirects {
            config.max_redirects = max;
        }
        if self.no_heuristics {
            config.enable_heuristics = false;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { url, config } => {
            let client = ReqwestClient::new();
            let request = ExtractRequest {
                url,
                config: Some(config.into_config()),
            };
            let result = extract_url(&client, &request).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Batch {
            mut urls,
            file,
            concurrency,
            config,
        } => {
            if let Some(path) = file {
                urls.extend(read_url_list(&path)?);
            }
            if urls.is_empty() {
                anyhow::bail!("No URLs given. Pass URLs as arguments or use --file.");
            }
            let request = BatchExtractRequest {
                urls,
                config: Some(config.into_config()),
            };
            let results = extract_batch(Arc::new(ReqwestClient::new()), request, concurrency).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::ParseHtml {
            file,
            url,
            headers,
            no_heuristics,
        } => {
            let enable_heuristics = !no_heuristics && ExtractConfig::from_env().enable_heuristics;
            parse_html::parse_html(&file, &url, &headers, enable_heuristics)?;
        }
    }

    Ok(())
}

fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list: {}", path.display()))?;
    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();
    tracing::info!(count = urls.len(), path = %path.display(), "read URL list");
    Ok(urls)
}
