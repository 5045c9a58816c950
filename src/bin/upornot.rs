//! upornot CLI
//!
//! Status-bar plugin for an up-or-not probe server. Drop it (or a wrapper
//! script calling it) into the xbar / BitBar plugin folder.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::{style, Term};
use tracing::debug;

use upornot::cli::{CliApp, CliConfig, CliError, OutputFormat};
use upornot::telemetry::TelemetryRecord;

/// upornot - connection health for your menu bar
#[derive(Parser)]
#[command(name = "upornot")]
#[command(version = upornot::VERSION)]
#[command(about = "Classify up-or-not ping telemetry into a red/yellow/green status", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Probe endpoint URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Connect to this host:port instead of the URL's host
    #[arg(long, global = true)]
    addr: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long, global = true, env = "UPORNOT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (xbar, json, json-pretty)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// TCP connect timeout in milliseconds
    #[arg(long, global = true)]
    connect_timeout_ms: Option<u64>,

    /// Whole-request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Print color names instead of emoji
    #[arg(long, global = true)]
    no_glyph: bool,

    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, classify and print the connection status (default)
    Status,

    /// Classify a saved telemetry record without touching the network
    Classify {
        /// JSON file to read; stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List the targets the probe server is pinging
    Targets,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout belongs to the plugin host
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let term = Term::stdout();

    if let Err(e) = run_command(&cli, &term).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run_command(cli: &Cli, term: &Term) -> anyhow::Result<()> {
    let app = build_app(cli)?;

    match &cli.command {
        None | Some(Commands::Status) => cmd_status(&app, term).await,
        Some(Commands::Classify { file }) => cmd_classify(&app, file.as_ref(), term),
        Some(Commands::Targets) => cmd_targets(&app, term).await,
    }
}

/// Layer flags over file and environment settings
fn build_app(cli: &Cli) -> anyhow::Result<CliApp> {
    let mut config = CliConfig::resolve(cli.config.as_deref())?;

    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(addr) = &cli.addr {
        config.addr = Some(addr.clone());
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(ms) = cli.connect_timeout_ms {
        config.connect_timeout_ms = ms;
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout_ms = ms;
    }
    if cli.no_glyph {
        config.glyphs = false;
    }

    debug!(?config, "resolved configuration");
    Ok(CliApp::new(config)?.with_verbose(cli.verbose))
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMAND HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

async fn cmd_status(app: &CliApp, term: &Term) -> anyhow::Result<()> {
    let report = app.status().await?;
    term.write_line(&app.output().render(&report))?;
    Ok(())
}

fn cmd_classify(app: &CliApp, file: Option<&PathBuf>, term: &Term) -> anyhow::Result<()> {
    let body = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {}", path.display(), e)))?,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .map_err(|e| CliError::Io(e.to_string()))?;
            body
        }
    };

    let record = TelemetryRecord::from_json(&body)?;
    let report = app.classify_record(&record)?;
    term.write_line(&app.output().render(&report))?;
    Ok(())
}

async fn cmd_targets(app: &CliApp, term: &Term) -> anyhow::Result<()> {
    if app.is_verbose() {
        let _ = Term::stderr().write_line(&format!(
            "{} Listing targets of {}",
            style("→").cyan(),
            app.config().url
        ));
    }

    let targets = app.targets().await?;
    term.write_line(&app.output().render_targets(&targets))?;
    Ok(())
}
