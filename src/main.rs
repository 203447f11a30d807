use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bsky_post_reporter::config::Config;
use bsky_post_reporter::{generate_report, web, ActorRef, BlueskyClient, FeedSource, OutputFormat, ReportError};

/// Summarize a Bluesky account's recent posts.
#[derive(Parser, Debug)]
#[command(name = "bsky-report", version, about = "Bluesky post summary reporter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a JSON or CSV report of an account's recent posts.
    Report {
        /// Handle (alice.bsky.social) or DID (did:plc:...).
        actor: String,
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Maximum number of posts to fetch.
        #[arg(short, long, default_value_t = 100, value_parser = parse_limit)]
        limit: usize,
        /// Output file path (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a handle to its DID and print profile stats.
    Resolve {
        /// Handle to resolve, with or without a leading '@'.
        handle: String,
    },

    /// Run the web UI and JSON API.
    Serve {
        /// Bind host (overrides WEB_HOST).
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides WEB_PORT).
        #[arg(long)]
        port: Option<u16>,
    },
}

fn parse_limit(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    if let Err(e) = init_tracing() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        let code = e.downcast_ref::<ReportError>().map_or(1, ReportError::exit_code);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Report {
            actor,
            format,
            limit,
            output,
        } => {
            config.validate().context("Invalid configuration")?;
            let client = BlueskyClient::new(&config).context("Failed to build HTTP client")?;

            let bytes = tokio::select! {
                result = generate_report(&client, &actor, limit, format) => result?,
                _ = tokio::signal::ctrl_c() => anyhow::bail!("Operation cancelled by user"),
            };

            if let Some(path) = output {
                tokio::fs::write(&path, &bytes)
                    .await
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                info!(path = %path.display(), format = %format, "Report saved");
            } else {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&bytes).context("Failed to write report")?;
                stdout.flush().context("Failed to write report")?;
            }
        }
        Commands::Resolve { handle } => {
            config.validate().context("Invalid configuration")?;
            let client = BlueskyClient::new(&config).context("Failed to build HTTP client")?;

            let actor = ActorRef::parse(&handle)?;
            let profile = client.get_profile(&actor).await?;

            println!("Handle: {}", profile.handle);
            println!("DID: {}", profile.did);
            if let Some(name) = profile.display_name.as_deref().filter(|n| !n.is_empty()) {
                println!("Display Name: {name}");
            }
            if let Some(avatar) = profile.avatar.as_deref().filter(|a| !a.is_empty()) {
                println!("Avatar: {avatar}");
            }
            println!(
                "Stats: {} followers, {} following, {} posts",
                profile.followers_count.unwrap_or(0),
                profile.follows_count.unwrap_or(0),
                profile.posts_count.unwrap_or(0)
            );
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.web_host = host;
            }
            if let Some(port) = port {
                config.web_port = port;
            }
            config.validate().context("Invalid configuration")?;

            info!(api_base = %config.api_base, "Starting bsky-post-reporter web UI");
            web::serve(config, shutdown_signal()).await?;
            info!("Shutdown complete");
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only report output.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bsky_post_reporter=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutting down...");
}
