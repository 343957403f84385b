use anyhow::{Context, Result};
use clap::Parser;
use get_papers_list::config::{find_config_file, load_config};
use get_papers_list::export::export;
use get_papers_list::models::SearchQuery;
use get_papers_list::sources::{PubMedSource, Source};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch research papers from PubMed and list authors affiliated with
/// pharmaceutical or biotech companies
#[derive(Parser, Debug)]
#[command(name = "get-papers-list")]
#[command(version = get_papers_list::VERSION)]
#[command(about = "Fetch research papers from PubMed", long_about = None)]
struct Cli {
    /// Query to search PubMed (full PubMed query syntax is supported)
    query: String,

    /// File to save results as CSV (results are printed when omitted)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Enable debug mode
    #[arg(long, short)]
    debug: bool,

    /// Maximum number of papers to fetch (default: 100)
    #[arg(long, short)]
    max_results: Option<usize>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only log errors
    #[arg(long, short, conflicts_with = "debug")]
    quiet: bool,
}

impl Cli {
    fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.quiet {
            "error"
        } else if self.debug {
            "debug"
        } else {
            configured
        }
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("get_papers_list={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config file {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    init_tracing(cli.log_level(&config.logging.level));
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    if cli.debug {
        println!("Fetching papers with query: {}", cli.query);
    }

    let max_results = cli.max_results.unwrap_or(config.pubmed.max_results);
    let query = SearchQuery::new(&cli.query).max_results(max_results);

    let source = PubMedSource::from_config(&config.pubmed)?;
    let papers = source.search(&query).await?;
    tracing::debug!("Fetched {} papers", papers.len());

    let mut stdout = std::io::stdout().lock();
    export(&papers, cli.file.as_deref(), &mut stdout)?;

    Ok(())
}
