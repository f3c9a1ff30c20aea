// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;
use std::path::PathBuf;

use sheet_localizer::app_config::{self, Config};
use sheet_localizer::sheet::{self, JsonFileSheet};
use sheet_localizer::{highlight, planner};
use sheet_localizer::translation::BatchPayload;
use sheet_localizer::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill empty translation cells (default command)
    Run(RunArgs),

    /// Print the planned requests as JSON without calling the API
    Plan(SheetArgs),

    /// Reset the configured highlight color on every cell now
    ClearHighlights(SheetArgs),

    /// Generate shell completions for sheet-localizer
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct SheetArgs {
    /// Sheet document (JSON) to localize
    #[arg(value_name = "SHEET")]
    sheet: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", env = "SHEET_LOCALIZER_CONFIG")]
    config_path: PathBuf,

    /// Batch translation endpoint
    #[arg(long, env = "SHEET_LOCALIZER_API_URL")]
    api_url: Option<String>,

    /// API key sent with every request
    #[arg(long, env = "SHEET_LOCALIZER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Rows per API request
    #[arg(short, long)]
    batch_size: Option<i64>,

    /// Simulate the API instead of calling it
    #[arg(short, long)]
    dry_run: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Keep running until the deferred highlight clear has fired
    #[arg(long)]
    wait_for_clear: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

/// sheet-localizer - fill missing translations of a localization sheet
#[derive(Parser, Debug)]
#[command(name = "sheet-localizer")]
#[command(args_conflicts_with_subcommands = true)]
#[command(version)]
#[command(about = "Fill missing translations of a localization sheet through a batch API")]
#[command(long_about = "sheet-localizer reads a sheet whose header holds label, description, meta,
the source column and one column per language code, and asks a batch translation
API for every cell that is still empty.

EXAMPLES:
    sheet-localizer strings.json                    # Fill empty cells using conf.json
    sheet-localizer run --dry-run strings.json      # Simulate the API
    sheet-localizer plan strings.json               # Show what would be requested
    sheet-localizer clear-highlights strings.json   # Remove the highlight now
    sheet-localizer completions bash > sl.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Sheet document (JSON) to localize
    #[arg(value_name = "SHEET")]
    sheet: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", env = "SHEET_LOCALIZER_CONFIG")]
    config_path: PathBuf,

    /// Batch translation endpoint
    #[arg(long, env = "SHEET_LOCALIZER_API_URL")]
    api_url: Option<String>,

    /// API key sent with every request
    #[arg(long, env = "SHEET_LOCALIZER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Rows per API request
    #[arg(short, long)]
    batch_size: Option<i64>,

    /// Simulate the API instead of calling it
    #[arg(short, long)]
    dry_run: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep running until the deferred highlight clear has fired
    #[arg(long)]
    wait_for_clear: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "✗"),
            Level::Warn => ("1;33", "!"),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "?"),
            Level::Trace => ("1;35", "…"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, marker) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                marker,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is lowered or raised once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "sheet-localizer", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Run(args)) => run_localize(args).await,
        Some(Commands::Plan(args)) => run_plan(args),
        Some(Commands::ClearHighlights(args)) => run_clear(args),
        None => {
            // Default behavior - top-level args run a localization
            let Some(sheet) = cli.sheet else {
                CommandLineOptions::command().print_help()?;
                return Ok(());
            };
            let args = RunArgs {
                sheet: SheetArgs {
                    sheet,
                    config_path: cli.config_path,
                    api_url: cli.api_url,
                    api_key: cli.api_key,
                    batch_size: cli.batch_size,
                    dry_run: cli.dry_run,
                    log_level: cli.log_level,
                },
                wait_for_clear: cli.wait_for_clear,
                no_progress: cli.no_progress,
            };
            run_localize(args).await
        }
    };

    if let Err(e) = &result {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Load the config file and apply command line overrides
///
/// Validation is left to the caller: planning and clearing need no endpoint.
fn load_config(args: &SheetArgs) -> Result<Config> {
    if let Some(level) = &args.log_level {
        log::set_max_level(level_filter(&level.clone().into()));
    }

    let mut config = Config::load_or_create(&args.config_path)?;

    if let Some(api_url) = &args.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(api_key) = &args.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    match &args.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(level_filter(&config.log_level)),
    }

    Ok(config)
}

fn open_sheet(args: &SheetArgs) -> Result<sheet::SharedSheet<JsonFileSheet>> {
    let document = JsonFileSheet::open(&args.sheet)
        .with_context(|| format!("Failed to open sheet: {}", args.sheet.display()))?;
    Ok(sheet::shared(document))
}

async fn run_localize(args: RunArgs) -> Result<()> {
    let config = load_config(&args.sheet)?;
    let sheet = open_sheet(&args.sheet)?;
    let controller = Controller::with_config(config)
        .context("Configuration validation failed")?
        .with_progress(!args.no_progress);

    let summary = controller.run(&sheet).await?;
    if summary.is_noop() {
        return Ok(());
    }

    if summary.clear_scheduled {
        if args.wait_for_clear {
            controller.wait_for_clear().await;
        } else {
            info!("Exiting before the highlight clear; run 'clear-highlights' to remove it");
        }
    }
    Ok(())
}

fn run_plan(args: SheetArgs) -> Result<()> {
    let config = load_config(&args)?;
    let sheet = open_sheet(&args)?;

    let plan = planner::plan(&mut *sheet.lock(), &config.source_column)?;
    info!(
        "{} row(s) considered, {} request(s), {} cell(s) to fill",
        plan.rows_considered,
        plan.requests.len(),
        plan.requested_cells()
    );
    let payload = BatchPayload::from_requests(&plan.requests, config.include_prompt);
    println!("{}", serde_json::to_string_pretty(&payload).context("Failed to serialize plan")?);
    Ok(())
}

fn run_clear(args: SheetArgs) -> Result<()> {
    let config = load_config(&args)?;
    let Some(color) = config.highlight.rgb()? else {
        info!("No highlight color configured, nothing to clear");
        return Ok(());
    };
    let sheet = open_sheet(&args)?;
    let cleared = highlight::clear_highlight(&mut *sheet.lock(), color)?;
    info!("Cleared highlight {} from {} cell(s)", color, cleared);
    Ok(())
}
