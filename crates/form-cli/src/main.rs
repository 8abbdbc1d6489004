//! # form-cli
//!
//! Command-line resolver for schema files and form values.
//!
//! `formcheck resolve` runs a schema document over a JSON file of field
//! values and prints the resolver result the way a form-state manager
//! would receive it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use form_resolver::{CriteriaMode, ResolverConfig, resolve_with};
use form_schema::SchemaLoader;
use form_value::values_from_json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formcheck")]
#[command(about = "Resolve form values against a schema")]
#[command(version)]
struct Cli {
    /// Path to a YAML resolver configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a JSON file of field values against a schema
    Resolve {
        /// Values file path (JSON object)
        input: PathBuf,

        /// Schema file path (.yaml, .yml or .json)
        #[arg(short, long)]
        schema: PathBuf,

        /// Override the configured criteria mode
        #[arg(long, value_enum)]
        criteria_mode: Option<CriteriaArg>,

        /// Return the input values unchanged on success
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CriteriaArg {
    FirstError,
    All,
}

impl From<CriteriaArg> for CriteriaMode {
    fn from(arg: CriteriaArg) -> Self {
        match arg {
            CriteriaArg::FirstError => CriteriaMode::FirstError,
            CriteriaArg::All => CriteriaMode::All,
        }
    }
}

const EXIT_INVALID: u8 = 1;
const EXIT_FAULT: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FAULT)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ResolverConfig::default(),
    };

    match cli.command {
        Commands::Resolve {
            input,
            schema,
            criteria_mode,
            raw,
        } => {
            if let Some(mode) = criteria_mode {
                config.criteria_mode = mode.into();
            }
            if raw {
                config.raw = true;
            }
            resolve_command(&input, &schema, &config)
        }
    }
}

fn load_config(path: &Path) -> anyhow::Result<ResolverConfig> {
    tracing::debug!("Loading resolver config from {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    ResolverConfig::from_yaml(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn resolve_command(
    input: &Path,
    schema_path: &Path,
    config: &ResolverConfig,
) -> anyhow::Result<ExitCode> {
    tracing::info!(
        "Resolving {} against {}",
        input.display(),
        schema_path.display()
    );

    let schema = SchemaLoader::default()
        .load_from_file(schema_path)
        .with_context(|| format!("failed to load schema {}", schema_path.display()))?;

    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read values {}", input.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse values {}", input.display()))?;
    let values = values_from_json(json)
        .with_context(|| format!("values in {} must be a JSON object", input.display()))?;

    let result = resolve_with(&values, &schema, config).context("schema fault")?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if result.is_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::info!("{} field(s) rejected", result.errors.len());
        Ok(ExitCode::from(EXIT_INVALID))
    }
}
