use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use ledgerlift_core::{pipeline, ExtractionResult, PipelineError, RawExtractionResult};
use ledgerlift_export::{export_ledger, ExportError, ExportFormat};
use ledgerlift_extract::{process_batch, raw_result_from_value, GeminiExtractor};
use ledgerlift_ingest::SourceDocument;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "ledgerlift",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LEDGERLIFT_BUILD_SHA"), ")"),
    about = "Merge PDF bank statements into one clean spreadsheet"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from PDF statements and export the filtered ledger
    Convert {
        /// One or more PDF statements, in the order their metadata should win
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run filtering/sorting/export over saved raw extraction JSON (no model call)
    Normalize {
        /// JSON files holding one raw extraction result or an array of them
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the active exclusion rules
    Rules,

    /// Manage ~/.ledgerlift/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory for the exported file (default: config export.out_dir)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// xlsx or csv (default: config export.format)
    #[arg(long, value_parser = parse_format)]
    format: Option<ExportFormat>,

    /// Skip writing the spreadsheet
    #[arg(long)]
    no_export: bool,

    /// Print the result as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert { files, output } => {
            let cfg = config::load_config()?;
            let result = convert(&cfg, &files).await?;
            emit(&cfg, &result, &output)?;
        }

        Command::Normalize { inputs, output } => {
            let cfg = config::load_config()?;
            let raw = read_raw_inputs(&inputs)?;
            let result = pipeline::run(&raw, &cfg.rule_set(), &cfg.fallbacks())?;
            emit(&cfg, &result, &output)?;
        }

        Command::Rules => {
            let cfg = config::load_config()?;
            let rules = cfg.rule_set();
            println!("Excluded when the description contains:");
            for p in rules.phrases() {
                println!("  - {p}");
            }
            println!("Excluded when the description starts with:");
            for p in rules.prefixes() {
                println!("  - {p}");
            }
            println!("\nEdit {} to change them.", config::config_path()?.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let mut cfg = config::load_config()?;
                if cfg.gemini.api_key.is_some() {
                    cfg.gemini.api_key = Some("<redacted>".to_string());
                }
                println!("# {}\n", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse().map_err(|e: ExportError| e.to_string())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn convert(cfg: &Config, files: &[PathBuf]) -> Result<ExtractionResult> {
    for f in files {
        if !f.exists() {
            bail!("file not found: {}", f.display());
        }
    }

    let docs = files
        .iter()
        .map(SourceDocument::from_path)
        .collect::<Result<Vec<_>>>()?;

    let extractor = GeminiExtractor::new(cfg.gemini_config()?)?;

    eprintln!(
        "Processing {} file{}...",
        docs.len(),
        if docs.len() > 1 { "s" } else { "" }
    );

    match process_batch(&extractor, &docs, &cfg.rule_set(), &cfg.fallbacks()).await {
        Ok(result) => Ok(result),
        Err(e @ PipelineError::EmptyAggregate) => Err(e.into()),
        Err(e) => Err(anyhow::Error::new(e).context(
            "Failed to process documents. Please ensure they are valid PDF bank statements.",
        )),
    }
}

fn read_raw_inputs(paths: &[PathBuf]) -> Result<Vec<RawExtractionResult>> {
    let mut out = Vec::new();
    for p in paths {
        let s = std::fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
        out.extend(parse_raw_input(&s).with_context(|| format!("parse {}", p.display()))?);
    }
    Ok(out)
}

/// A saved raw file holds one extraction result or an array of them. Each
/// one must carry a `transactions` array, as a live model reply must.
fn parse_raw_input(s: &str) -> Result<Vec<RawExtractionResult>> {
    let value: Value = serde_json::from_str(s)?;
    let items = match value {
        Value::Array(items) => items,
        one => vec![one],
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            raw_result_from_value(item).with_context(|| format!("extraction result #{}", i + 1))
        })
        .collect()
}

fn emit(cfg: &Config, result: &ExtractionResult, output: &OutputArgs) -> Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        render::print_result(result);
    }

    if output.no_export {
        return Ok(());
    }

    let format = output.format.unwrap_or(cfg.export.format);
    let out_dir: &Path = output.out_dir.as_deref().unwrap_or(&cfg.export.out_dir);
    let today = chrono::Utc::now().date_naive();

    match export_ledger(&result.transactions, format, out_dir, today) {
        Ok(path) => eprintln!("\nSaved {}", path.display()),
        Err(ExportError::EmptyLedger) => {
            eprintln!("\nNothing to export: every transaction was excluded.");
        }
        Err(e) => return Err(e).context("export spreadsheet"),
    }

    Ok(())
}
