//! Command-line harness: assesses an N-Triples file and prints the
//! estimate as JSON.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lod_deref::application::{DereferenceabilityEstimator, LogSink};
use lod_deref::config;
use lod_deref::domain::Triple;
use lod_deref::infrastructure::HttpResolver;

#[derive(Parser)]
#[command(version, about = "Estimates URI dereferenceability of an N-Triples dataset")]
struct Args {
    /// N-Triples file to assess
    input: PathBuf,

    /// Override the outer reservoir capacity (distinct domains)
    #[arg(long)]
    max_domains: Option<usize>,

    /// Override the per-domain URI reservoir capacity
    #[arg(long)]
    max_uris_per_domain: Option<usize>,

    /// Override the resolution pool width
    #[arg(long)]
    fetch_concurrency: Option<usize>,

    /// Log every classified outcome per URI
    #[arg(long)]
    problem_report: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = config::Config::from_env();
    if let Some(v) = args.max_domains {
        config.max_domains = v;
    }
    if let Some(v) = args.max_uris_per_domain {
        config.max_uris_per_domain = v;
    }
    if let Some(v) = args.fetch_concurrency {
        config.fetch_concurrency = v;
    }
    if args.problem_report {
        config.problem_reporting = true;
    }
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    if config.log_format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    config.print_summary();

    let resolver = Arc::new(HttpResolver::new(
        Duration::from_secs(config.request_timeout_secs),
        config.max_redirect_hops,
    )?);

    let mut estimator = DereferenceabilityEstimator::new(&config, resolver)?;
    if config.problem_reporting {
        estimator = estimator.with_problem_sink(Arc::new(LogSink));
    }

    let file = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    for line in BufReader::new(file).lines() {
        let line = line.context("failed to read input line")?;
        if let Some(triple) = parse_triple_line(&line) {
            estimator.observe(&triple);
        }
    }

    let estimate = estimator.estimate().await;
    println!("{}", serde_json::to_string_pretty(&estimate)?);

    Ok(())
}

/// Parses one N-Triples-style line into a triple of opaque terms.
///
/// Intentionally lax: the estimator needs no RDF validation, only the
/// three whitespace-separated terms with angle brackets stripped.
/// Comments and blank lines yield `None`.
fn parse_triple_line(line: &str) -> Option<Triple> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_suffix('.').unwrap_or(line).trim_end();

    let (subject, rest) = line.split_once(char::is_whitespace)?;
    let (predicate, object) = rest.trim_start().split_once(char::is_whitespace)?;

    Some(Triple::new(
        strip_term(subject),
        strip_term(predicate),
        strip_term(object.trim_start()),
    ))
}

fn strip_term(term: &str) -> &str {
    term.strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(term)
}
