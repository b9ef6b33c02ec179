//! datacleaner CLI - derive revenue from product sales CSVs
//!
//! ```bash
//! datacleaner clean                          # data/$DATA_FILE_NAME -> stdout (CSV)
//! datacleaner clean --path vendas.csv -o out.json --format json
//! datacleaner clean --encoding latin1 --delimiter ';' --label mensal
//! datacleaner clean --set limite=100 -- extra 42
//! datacleaner generate --rows 1000 -o data/df_produtos.csv
//! datacleaner thousands 456231.98            # 456.232
//! ```
//!
//! A `.env` file in the working directory is loaded before anything else.

use clap::{Parser, Subcommand, ValueEnum};
use datacleaner::generator::{self, DEFAULT_OUTPUT, DEFAULT_ROWS};
use datacleaner::{
    logging, CleanerConfig, CleanerResult, DataCleaner, Dataset, EnvConfig, DEFAULT_DATA_DIR,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "datacleaner")]
#[command(about = "Clean product sales CSVs and compute revenue", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a sales CSV, run the pipeline and print the result
    Clean {
        /// Explicit CSV path (skips the DATA_FILE_NAME lookup)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Directory holding the file named by DATA_FILE_NAME
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        base_dir: PathBuf,

        /// Source encoding (utf-8, latin1, windows-1252, auto, ...)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Field delimiter: one ASCII character, or `tab`
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Run name shown in logs
        #[arg(short, long)]
        label: Option<String>,

        /// Extra option as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        options: Vec<(String, String)>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra positional arguments stored on the cleaner
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Write a synthetic sales CSV
    Generate {
        /// Number of rows
        #[arg(short, long, default_value_t = DEFAULT_ROWS)]
        rows: usize,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Express a value in thousands (3 decimals)
    Thousands {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            path,
            base_dir,
            encoding,
            delimiter,
            label,
            options,
            format,
            output,
            args,
        } => {
            let mut config = CleanerConfig::from_pairs(options);
            if let Some(encoding) = encoding {
                config = config.with_encoding(encoding);
            }
            if let Some(delimiter) = delimiter {
                config = config.with_delimiter(delimiter);
            }
            if let Some(label) = label {
                config = config.with_label(label);
            }
            cmd_clean(path.as_deref(), &base_dir, config, format, output.as_deref(), args)
        }

        Commands::Generate { rows, output, seed } => cmd_generate(rows, &output, seed),

        Commands::Thousands { value } => {
            println!("{}", DataCleaner::converter_para_milhares(value));
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn cmd_clean(
    path: Option<&Path>,
    base_dir: &Path,
    config: CleanerConfig,
    format: Format,
    output: Option<&Path>,
    args: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<Value> = args.into_iter().map(parse_arg).collect();
    let cleaner = load_and_clean(path, base_dir, args, config)?;
    write_dataset(cleaner.dataset(), format, output)
}

/// Load from `path` (or `DATA_FILE_NAME` under `base_dir`) and run the pipeline.
fn load_and_clean(
    path: Option<&Path>,
    base_dir: &Path,
    args: Vec<Value>,
    config: CleanerConfig,
) -> CleanerResult<DataCleaner> {
    let mut cleaner = match path {
        Some(path) => DataCleaner::from_csv_path(path, args, config)?,
        None => DataCleaner::from_csv(base_dir, &EnvConfig::from_env(), args, config)?,
    };
    cleaner.pipeline()?;
    Ok(cleaner)
}

fn cmd_generate(rows: usize, output: &Path, seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = generator::write_products(output, rows, seed)?;
    eprintln!("Dataset written with {} rows to {}", dataset.len(), output.display());
    Ok(())
}

fn write_dataset(
    dataset: &Dataset,
    format: Format,
    path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = match format {
        Format::Json => serde_json::to_string_pretty(dataset.rows())?,
        Format::Csv => {
            let mut buf = Vec::new();
            dataset.write_csv(&mut buf, b',')?;
            String::from_utf8(buf)?
        }
    };

    match path {
        Some(p) => {
            fs::write(p, content)?;
            tracing::info!(path = %p.display(), "Output written");
        }
        None => {
            print!("{content}");
        }
    }
    Ok(())
}

/// Positional values are JSON when they parse as JSON, strings otherwise.
fn parse_arg(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
