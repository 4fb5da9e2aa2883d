#![deny(unsafe_code)]

//! repotext CLI: consolidate a repository from the shell or serve the web form.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use repotext_config::AppConfig;
use repotext_core::web::{self, WebState};
use repotext_core::{
    ConsolidateRequest, ConsolidatedDocument, Consolidator, ExclusionRule, GitHubHost,
    RepositoryHost, TracingObserver, WalkOptions, write_document,
};

/// repotext: fold a GitHub repository into a single text file.
#[derive(Parser)]
#[command(name = "repotext", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "repotext.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consolidate a repository branch into one text file.
    Consolidate {
        /// Repository URL, e.g. https://github.com/owner/repo.
        repo_url: String,

        /// Branch to read.
        #[arg(short, long)]
        branch: String,

        /// Output path (defaults to `output.file_name` in the current directory).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Additional extension to exclude (repeatable).
        #[arg(long = "exclude-ext", value_name = "EXT")]
        exclude_ext: Vec<String>,

        /// Additional file name to exclude (repeatable).
        #[arg(long = "exclude-name", value_name = "NAME")]
        exclude_name: Vec<String>,

        /// Visit directory entries in name order instead of listing order.
        #[arg(long)]
        sort: bool,

        /// Report unreadable subdirectories and keep going.
        #[arg(long)]
        skip_unreadable_dirs: bool,
    },

    /// Serve the web form.
    Serve {
        /// Listen address (overrides `server.listen_addr`).
        #[arg(long)]
        addr: Option<String>,

        /// Listen port (overrides `server.listen_port`).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, found) = load_config(&cli.config).await?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(filter_level(cli.verbose, &config))),
        )
        .init();

    if !found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.command {
        Commands::Consolidate {
            repo_url,
            branch,
            output,
            exclude_ext,
            exclude_name,
            sort,
            skip_unreadable_dirs,
        } => {
            let rule = ExclusionRule::from_config(&config.filter).with_extra(exclude_ext, exclude_name);
            let options = WalkOptions {
                sort_entries: sort || config.walk.sort_entries,
                skip_unreadable_dirs: skip_unreadable_dirs || config.walk.skip_unreadable_dirs,
            };
            let dest = output.unwrap_or_else(|| PathBuf::from(&config.output.file_name));
            cmd_consolidate(&config, ConsolidateRequest::new(repo_url, branch), rule, options, &dest)
                .await?
        }
        Commands::Serve { addr, port } => cmd_serve(config, addr, port).await?,
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

async fn cmd_consolidate(
    config: &AppConfig,
    request: ConsolidateRequest,
    rule: ExclusionRule,
    options: WalkOptions,
    dest: &Path,
) -> Result<()> {
    print!("{}", describe_rule(&rule));

    let host = GitHubHost::from_config(&config.github);
    if let Some(doc) = consolidate_to_file(&host, &request, rule, options, dest).await? {
        println!(
            "Wrote {} files to '{}' ({} skipped).",
            doc.len(),
            dest.display(),
            doc.skipped()
        );
    }
    Ok(())
}

/// Run one consolidation and write the result to `dest`.
///
/// Returns `None` without touching `dest` when the walk found no files. A run
/// whose downloads all failed still writes its (empty) document.
async fn consolidate_to_file(
    host: &dyn RepositoryHost,
    request: &ConsolidateRequest,
    rule: ExclusionRule,
    options: WalkOptions,
    dest: &Path,
) -> Result<Option<ConsolidatedDocument>> {
    let doc = Consolidator::new(host, rule, options)
        .run(request, &TracingObserver)
        .await?;

    if doc.walked() == 0 {
        warn!("No content to consolidate, nothing written");
        return Ok(None);
    }
    if doc.is_empty() {
        warn!(skipped = doc.skipped(), "Every download failed, writing an empty document");
    }

    write_document(&doc, dest)
        .with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(Some(doc))
}

async fn cmd_serve(mut config: AppConfig, addr: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(addr) = addr {
        config.server.listen_addr = addr;
    }
    if let Some(port) = port {
        config.server.listen_port = port;
    }
    config.validate()?;

    let host = GitHubHost::from_config(&config.github);
    let state = Arc::new(WebState {
        config,
        host: Arc::new(host),
    });
    web::serve(state).await.context("web form server failed")?;
    Ok(())
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Load the config file, falling back to defaults when it does not exist.
///
/// The flag reports whether a file was found, so the caller can log it once
/// tracing is up.
async fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    if path.exists() {
        let config = AppConfig::load(path)
            .await
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        Ok((config, true))
    } else {
        Ok((AppConfig::default(), false))
    }
}

/// `-v` flags win over `logging.level`; `RUST_LOG` wins over both.
fn filter_level(verbose: u8, config: &AppConfig) -> String {
    match verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn describe_rule(rule: &ExclusionRule) -> String {
    let exts: Vec<&str> = rule.excluded_extensions().collect();
    let names: Vec<&str> = rule.excluded_filenames().collect();
    format!(
        "Excluded extensions: {}\nExcluded files: {}\n",
        list_or_none(&exts),
        list_or_none(&names)
    )
}

fn list_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
