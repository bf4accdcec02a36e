// partline CLI - ERP row generation and parts catalog sync

mod catalog;
mod exit_codes;
mod generate;
mod snapshot;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use partline_catalog::SearchColumn;
use partline_config::{ConfigError, Settings};
use partline_rows::SuffixStyle;

use exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "partline")]
#[command(about = "Generate ERP item rows for heater/tank/pump jobs and sync the parts catalog")]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/partline/settings.toml)
    #[arg(long, global = true, env = "PARTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SuffixStyleArg {
    /// {job}-{dash}-A
    Dash,
    /// {job}-{dash}.{n}-A
    Dotted,
}

impl From<SuffixStyleArg> for SuffixStyle {
    fn from(arg: SuffixStyleArg) -> Self {
        match arg {
            SuffixStyleArg::Dash => SuffixStyle::Dash,
            SuffixStyleArg::Dotted => SuffixStyle::Dotted,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate ERP item rows from a job sheet or a single equipment record
    #[command(after_help = "\
Examples:
  partline generate job-24001.json
  partline generate job-24001.json --json
  partline generate job-24001.json --expect job-24001.expected.json
  partline generate heater.json --stack-height 24 --suffix-style dotted")]
    Generate {
        /// Job sheet JSON, or one record tagged with "kind"
        sheet: PathBuf,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Compare against reference rows; exit 3 on any difference
        #[arg(long, value_name = "GOLDEN")]
        expect: Option<PathBuf>,

        /// Numbering of precut rows (overrides settings)
        #[arg(long)]
        suffix_style: Option<SuffixStyleArg>,

        /// Heater stack height, overriding the sheet
        #[arg(long)]
        stack_height: Option<f64>,
    },

    /// Reconcile a catalog snapshot (CSV or JSON) into the parts database
    #[command(after_help = "\
Examples:
  partline sync parts-export.csv
  partline sync parts-export.csv --dry-run
  partline sync parts.json --db ./catalog.db --json")]
    Sync {
        /// Snapshot file; .json is a JSON array of objects, anything else CSV
        snapshot: PathBuf,

        /// Catalog database (overrides settings)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Output the sync report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search live catalog entries
    #[command(after_help = "\
Examples:
  partline search valve
  partline search 'ball 2' --column description --column size
  partline search acme --page 2 --per-page 50 --json")]
    Search {
        /// Search terms; every term must match
        query: String,

        /// Restrict to a column (item_number, description, size, vendor_name). Repeatable.
        #[arg(long = "column", value_name = "COLUMN")]
        columns: Vec<SearchColumn>,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page (overrides settings)
        #[arg(long)]
        per_page: Option<usize>,

        /// Catalog database (overrides settings)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Autocomplete item numbers and descriptions
    Suggest {
        /// At least two characters
        query: String,

        /// Maximum suggestions (overrides settings)
        #[arg(long)]
        limit: Option<usize>,

        /// Catalog database (overrides settings)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show effective settings, or write a default settings file
    Config {
        /// Write a commented default file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn config_err(err: ConfigError) -> CliError {
    CliError { code: EXIT_CONFIG, message: err.to_string(), hint: None }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .map_err(|e| config_err(e).with_hint("fix the file or pass --config"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { config, command, .. } = cli;
    let settings = || load_settings(config.as_ref());

    match command {
        Commands::Generate { sheet, json, expect, suffix_style, stack_height } => {
            let mut generator = settings()?.generator;
            if let Some(style) = suffix_style {
                generator.suffix_style = style.into();
            }
            generate::cmd_generate(sheet, json, expect, stack_height, &generator)
        }
        Commands::Sync { snapshot, db, dry_run, json } => {
            catalog::cmd_sync(snapshot, db, dry_run, json, &settings()?)
        }
        Commands::Search { query, columns, page, per_page, db, json } => {
            catalog::cmd_search(query, columns, page, per_page, db, json, &settings()?)
        }
        Commands::Suggest { query, limit, db, json } => {
            catalog::cmd_suggest(query, limit, db, json, &settings()?)
        }
        Commands::Config { init } => cmd_config(config.clone(), init),
    }
}

fn cmd_config(path: Option<PathBuf>, init: bool) -> Result<(), CliError> {
    let path = path.unwrap_or_else(Settings::config_path);
    if init {
        if Settings::write_default_file(&path).map_err(config_err)? {
            println!("wrote {}", path.display());
        } else {
            println!("{} already exists", path.display());
        }
        return Ok(());
    }

    let settings = if path.exists() {
        Settings::load_from(&path).map_err(config_err)?
    } else {
        Settings::default()
    };
    let text = settings.to_toml().map_err(config_err)?;
    println!("# {}", path.display());
    println!("# database: {}", settings.catalog.database_path().display());
    print!("{text}");
    Ok(())
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
