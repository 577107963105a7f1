//! allergen-scanner: detect selected allergens in recognized label text.

use std::io::Write;
use std::sync::Arc;

use allergen_scanner::catalog;
use allergen_scanner::config::AppConfig;
use allergen_scanner::matcher::AllergenMatcher;
use allergen_scanner::observability;
use allergen_scanner::registry::{AllergenRegistry, SharedRegistry, ToggleOutcome};
use allergen_scanner::scan_session::{ScanConfig, ScanSession, ScanStats};
use allergen_scanner::storage::{load_or_empty, persist_on_change, AllergenStore, JsonFileStore};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "allergen-scanner")]
#[command(about = "Detect selected allergens in recognized ingredient label text")]
#[command(version)]
struct Cli {
    /// Defaults to `scan` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Scan stdin, one recognized text per line, printing one JSON report per scan
    Scan,
    /// Scan a single text and print the matches as JSON
    Check {
        /// Text to scan; several words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Add a custom allergen
    Add {
        /// Display name of the allergen
        name: String,
    },
    /// Select or deselect a builtin allergen
    Toggle {
        /// Catalog name, see `catalog`
        name: String,
    },
    /// Remove a selected allergen by id
    Remove {
        /// Allergen id as printed by `list`
        id: Uuid,
    },
    /// Print the selected allergens as JSON
    List,
    /// Print the builtin catalog, selected entries marked with `*`
    Catalog,
}

/// Feed lines from `input` (one OCR reading per line) through a scan session
/// and write every report to `output` as a JSON line
///
/// Returns the session stats together with the writer once both ends are done.
async fn run_scan<R, W>(
    scan_config: ScanConfig,
    registry: SharedRegistry,
    matcher: AllergenMatcher,
    input: R,
    mut output: W,
) -> Result<(ScanStats, W)>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Write + Send + 'static,
{
    let mut session = ScanSession::new(matcher, registry, scan_config);
    let mut reports = session.report_stream();

    let printer = tokio::spawn(async move {
        while let Some(report) = reports.recv().await {
            serde_json::to_writer(&mut output, &report)?;
            output.write_all(b"\n")?;
            output.flush()?;
        }
        Ok::<W, anyhow::Error>(output)
    });

    let (tx, rx) = mpsc::channel::<String>(64);
    let reader = tokio::spawn(async move {
        let mut lines = input.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read scan input");
                    break;
                }
            }
        }
    });

    let stats = session.run(rx).await;
    reader.await.context("input reader task failed")?;
    let output = printer.await.context("report printer task failed")??;

    info!(scanned = stats.scanned, received = stats.received, "Scan finished");
    Ok((stats, output))
}

/// Run every command other than `scan`, writing its result to `out`
fn run_command(
    command: Commands,
    registry: &SharedRegistry,
    matcher: &AllergenMatcher,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Scan => anyhow::bail!("scan needs an input stream"),
        Commands::Check { text } => {
            let results = matcher.find_allergens(&text.join(" "), &registry.snapshot());
            writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
        }
        Commands::Add { name } => {
            if registry.add_custom(&name) {
                writeln!(out, "added {}", name.trim())?;
            } else {
                writeln!(out, "ignored: blank or already selected")?;
            }
        }
        Commands::Toggle { name } => match registry.toggle_builtin(&name) {
            ToggleOutcome::Added => writeln!(out, "selected {}", name.trim())?,
            ToggleOutcome::Removed => writeln!(out, "deselected {}", name.trim())?,
            ToggleOutcome::Ignored => writeln!(out, "ignored: blank name")?,
        },
        Commands::Remove { id } => {
            if registry.remove(id) {
                writeln!(out, "removed {}", id)?;
            } else {
                writeln!(out, "no allergen with id {}", id)?;
            }
        }
        Commands::List => writeln!(out, "{}", serde_json::to_string_pretty(&registry.snapshot())?)?,
        Commands::Catalog => {
            for name in catalog::builtin_names() {
                let marker = if registry.is_selected(name) { "*" } else { " " };
                writeln!(out, "{} {}", marker, name)?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let metrics_handle = observability::init_observability(&config.observability)?;
    info!("{}", config.summary());

    let store: Arc<dyn AllergenStore> =
        Arc::new(JsonFileStore::new(&config.storage.allergens_file));
    let mut registry = AllergenRegistry::from_allergens(load_or_empty(store.as_ref()));
    registry.subscribe(persist_on_change(Arc::clone(&store)));
    let registry = SharedRegistry::new(registry);

    let matcher = AllergenMatcher::with_config(config.matcher.clone())
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    match cli.command.unwrap_or(Commands::Scan) {
        Commands::Scan => {
            let input = BufReader::new(tokio::io::stdin());
            run_scan(config.scan.clone(), registry, matcher, input, std::io::stdout()).await?;
        }
        command => run_command(command, &registry, &matcher, &mut std::io::stdout().lock())?,
    }

    if let Some(handle) = metrics_handle {
        debug!(metrics = %handle.render(), "Final metrics");
    }
    Ok(())
}
