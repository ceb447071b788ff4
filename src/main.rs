use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use aptprogress::config::Config;
use aptprogress::error::ConfigError;
use aptprogress::{interactive, logging, report, AppContext, DatasetCache};

/// Exit status for a lookup that found nothing to show
const EXIT_LOOKUP: i32 = 2;

#[derive(Parser)]
#[command(name = "aptprogress")]
#[command(version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
#[command(about = "Weighted apartment construction progress viewer", long_about = None)]
struct Cli {
    /// Configuration file (default: the per-user config, else built-in I-Tower settings)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Spreadsheet to read, overriding the configuration
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Sheet name, overriding the configuration
    #[arg(short, long, global = true)]
    sheet: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive viewer (default)
    Tui,
    /// Progress of one apartment compared with the building
    Show {
        /// Apartment number
        apartment: i64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Every apartment with its floor and overall progress
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Building averages per activity
    Summary {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the default configuration file location
    Path,
    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let command = cli.command.unwrap_or(Commands::Tui);
    if matches!(command, Commands::Tui) {
        let dir = logging::init_with_file("aptprogress.log", cli.verbose)
            .context("Failed to set up log file")?;
        if cli.verbose {
            eprintln!("Logging to {}", dir.display());
        }
    } else {
        logging::init(cli.verbose);
    }

    let initializing = matches!(
        command,
        Commands::Config {
            action: ConfigAction::Init { .. }
        }
    );
    let mut config = match cli.config.as_deref() {
        // `config init --config new.json` creates the file instead of reading it
        Some(path) if initializing && !path.exists() => Config::default(),
        explicit => Config::resolve(explicit).context("Failed to load configuration")?,
    };
    if let Some(file) = cli.file {
        config.data_file = file;
    }
    if let Some(sheet) = cli.sheet {
        config.sheet_name = sheet;
    }

    match command {
        Commands::Config { action } => handle_config_command(&action, &config, cli.config),
        Commands::Tui => {
            let ctx = open_context(config)?;
            interactive::run_interactive(&ctx)?;
            Ok(0)
        }
        Commands::Show { apartment, json } => handle_show(&open_context(config)?, apartment, json),
        Commands::List { json } => {
            let ctx = open_context(config)?;
            let overviews = ctx.overviews();
            if json {
                println!("{}", serde_json::to_string_pretty(&overviews)?);
            } else {
                print!("{}", report::render_overviews(&overviews));
            }
            Ok(0)
        }
        Commands::Summary { json } => {
            let ctx = open_context(config)?;
            let summary = ctx.tower_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                if cli.verbose {
                    println!("{}\n", report::render_load_summary(ctx.summary()));
                }
                print!(
                    "{}",
                    report::render_summary(&summary, &ctx.config.building_label)
                );
            }
            Ok(0)
        }
    }
}

/// Load the dataset once for this process
fn open_context(config: Config) -> Result<AppContext> {
    let mut cache = DatasetCache::new();
    AppContext::open(config, &mut cache).context("Failed to load apartment data")
}

fn handle_show(ctx: &AppContext, apartment: i64, json: bool) -> Result<i32> {
    match ctx.report_for(apartment) {
        Ok(progress) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                print!(
                    "{}",
                    report::render_report(&progress, &ctx.config.building_label)
                );
            }
            Ok(0)
        }
        Err(e) if e.is_recoverable() => {
            eprintln!("{}", e);
            Ok(EXIT_LOOKUP)
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_config_command(
    action: &ConfigAction,
    config: &Config,
    explicit: Option<PathBuf>,
) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            config.validate()?;
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigAction::Path => match Config::get_config_path() {
            Some(path) => println!("{}", path.display()),
            None => return Err(anyhow!(ConfigError::NoConfigDir)),
        },
        ConfigAction::Init { force } => {
            let path = explicit
                .or_else(Config::get_config_path)
                .ok_or(ConfigError::NoConfigDir)?;
            if path.exists() && !force {
                return Err(ConfigError::AlreadyExists(path).into());
            }
            config.validate()?;
            config.save_to(&path)?;
            println!("Configuration written to {}", path.display());
        }
    }
    Ok(0)
}
