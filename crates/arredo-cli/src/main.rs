use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod output;
mod run;

#[derive(Debug, Parser)]
#[command(name = "arredo")]
#[command(about = "Furniture catalog product extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a single product URL and print the JSON record.
    Scrape {
        url: String,
        /// Persist the record as JSON in the output directory.
        #[arg(long)]
        save: bool,
        /// Override the configured output directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Scrape many URLs sequentially, one full extraction at a time.
    Batch {
        /// File with one URL per line.
        #[arg(long, conflicts_with = "sitemap")]
        file: Option<PathBuf>,
        /// Pull candidate URLs from the configured sitemap index.
        #[arg(long)]
        sitemap: bool,
        /// Persist each record as JSON in the output directory.
        #[arg(long)]
        save: bool,
        /// Override the configured output directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the scrapable product URLs found in the sitemap index.
    Urls {
        /// Override the configured sitemap URL.
        #[arg(long)]
        sitemap_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = arredo_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape { url, save, out } => run::scrape(&config, &url, save, out).await,
        Commands::Batch {
            file,
            sitemap,
            save,
            out,
        } => run::batch(&config, file, sitemap, save, out).await,
        Commands::Urls { sitemap_url } => run::urls(&config, sitemap_url).await,
    }
}
