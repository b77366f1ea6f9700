// repo-harvest: discovery, metrics and dedup over CSV tables.
//
// Each subcommand runs one pipeline to completion. Settings come from an
// optional TOML file; command-line options override individual values.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::PathBuf;

use repo_harvest::{
    GitHubClient, HarvestConfig, MetricsPipeline, RepoSearchSort, SearchOrder, dedup_table,
    run_discovery,
};

/// GitHub repository discovery and code-quality metrics
#[derive(Parser, Debug)]
#[command(name = "repo-harvest")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Page through repository search results into a table
    Discover {
        /// Search query, e.g. "language:python topic:web"
        #[arg(long)]
        query: Option<String>,
        /// Topic label written to every row
        #[arg(long)]
        topic: Option<String>,
        /// Language label written to every row
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        max_results: Option<u32>,
        #[arg(long)]
        start_page: Option<u32>,
        #[arg(long, value_enum)]
        sort: Option<RepoSearchSort>,
        #[arg(long, value_enum)]
        order: Option<SearchOrder>,
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Personal access token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Clone, analyze and summarise every repository of a table
    Metrics {
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Directory holding the local checkouts
        #[arg(long, value_name = "DIR")]
        checkouts: Option<PathBuf>,
    },
    /// Drop rows repeating an earlier key value
    Dedup {
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        /// Zero-based key column
        #[arg(long, default_value_t = 0)]
        key_column: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = HarvestConfig::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Discover {
            query,
            topic,
            language,
            max_results,
            start_page,
            sort,
            order,
            output,
            token,
        } => {
            let discovery = &mut config.discovery;
            if let Some(query) = query {
                discovery.query = query;
            }
            if let Some(topic) = topic {
                discovery.topic = topic;
            }
            if let Some(language) = language {
                discovery.language = language;
            }
            if let Some(max_results) = max_results {
                discovery.max_results = max_results;
            }
            if let Some(start_page) = start_page {
                discovery.start_page = start_page;
            }
            if let Some(sort) = sort {
                discovery.sort = sort;
            }
            if let Some(order) = order {
                discovery.order = order;
            }
            if let Some(output) = output {
                discovery.output = output;
            }

            let mut builder = GitHubClient::builder().api_timeout(discovery.api_timeout());
            match token {
                Some(token) => builder = builder.personal_token(token),
                None => warn!("GITHUB_TOKEN is not set; searching unauthenticated"),
            }
            if let Some(uri) = &discovery.api_base_uri {
                builder = builder.base_uri(uri);
            }
            let client = builder.build().context("Failed to create GitHub client")?;

            let stats = run_discovery(&client, discovery).await?;
            info!(
                "Wrote {} rows to {}",
                stats.rows_written,
                discovery.output.display()
            );
        }
        Command::Metrics {
            input,
            output,
            checkouts,
        } => {
            let metrics = &mut config.metrics;
            if let Some(input) = input {
                metrics.input = input;
            }
            if let Some(output) = output {
                metrics.output = output;
            }
            if let Some(checkouts) = checkouts {
                metrics.checkout_root = checkouts;
            }

            let pipeline = MetricsPipeline::from_config(metrics.clone());
            pipeline.run().await?;
        }
        Command::Dedup {
            input,
            output,
            key_column,
        } => {
            dedup_table(&input, &output, key_column)
                .with_context(|| format!("Failed to deduplicate {}", input.display()))?;
        }
    }

    Ok(())
}
