//! `prgate`: CI resource that emits a version for every pull request whose
//! approvals and reviews satisfy the configured policy.
//!
//! One JSON request is read from stdin and one JSON response written to
//! stdout. Logs go to stderr.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use prgate_core::{Policy, PolicyConfig};
use prgate_git::GitClient;
use prgate_github::GithubClient;
use prgate_resource::{CheckRequest, InRequest};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prgate")]
#[command(about = "Pull-request approval gate resource", long_about = None)]
#[command(version)]
struct Cli {
    /// GitHub API base, overriding `github_endpoint` from the source
    #[arg(long, env = "PRGATE_GITHUB_ENDPOINT", global = true)]
    github_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the versions of every qualifying pull request
    Check,

    /// Resolve one version into metadata and a working copy
    In {
        /// Output directory
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();

    let input = read_stdin()?;
    match cli.command {
        Commands::Check => {
            let request: CheckRequest = parse_request(&input)?;
            let versions = run_check(request.source, cli.github_endpoint).await?;
            write_response(&versions)
        }
        Commands::In { dir } => {
            let request: InRequest = parse_request(&input)?;
            let response = run_in(request, cli.github_endpoint, &dir).await?;
            write_response(&response)
        }
    }
}

fn apply_endpoint(mut config: PolicyConfig, endpoint: Option<String>) -> PolicyConfig {
    if let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) {
        config.github_endpoint = Some(endpoint);
    }
    config
}

async fn run_check(
    config: PolicyConfig,
    endpoint: Option<String>,
) -> anyhow::Result<prgate_resource::CheckResponse> {
    let config = apply_endpoint(config, endpoint);
    info!(repository = %config.repository, "checking pull requests");

    let policy = Policy::compile(config).context("compiling policy")?;
    let client = GithubClient::new(policy.config()).context("creating GitHub client")?;
    Ok(prgate_resource::check(&client, &policy).await?)
}

async fn run_in(
    request: InRequest,
    endpoint: Option<String>,
    dir: &Path,
) -> anyhow::Result<prgate_resource::InResponse> {
    let config = apply_endpoint(request.source, endpoint);
    info!(
        repository = %config.repository,
        pr_id = %request.version.pr_id,
        dir = %dir.display(),
        "fetching version"
    );

    let policy = Policy::compile(config).context("compiling policy")?;
    let client = GithubClient::new(policy.config()).context("creating GitHub client")?;
    let source = policy.config();
    let response = prgate_resource::fetch_version(
        &client,
        &policy,
        &request.version,
        &request.params,
        dir,
        |path| {
            GitClient::new(
                path,
                source.access_token.clone(),
                source.skip_ssl_verification,
                source.disable_git_lfs,
            )
        },
    )
    .await?;
    Ok(response)
}

fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading request from stdin")?;
    Ok(input)
}

fn parse_request<T: DeserializeOwned>(input: &str) -> anyhow::Result<T> {
    serde_json::from_str(input).context("parsing request")
}

fn write_response<T: Serialize>(response: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response).context("writing response")?;
    writeln!(stdout).context("writing response")?;
    Ok(())
}
