// Binary lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use rpytl::app_config::{self, Config};
use rpytl::app_controller::Controller;

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract dialogue, protect placeholders and write the mapping (mode 1)
    Extract {
        /// Script file, or a directory to scan for scripts
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output directory (defaults to the current directory, or next to each script for directories)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Restore placeholders in a translated protected file (mode 2)
    Restore {
        /// The translated *_goc_protected.txt file
        #[arg(value_name = "PROTECTED_FILE")]
        protected_file: PathBuf,

        /// The *_mapping.json file written by extract
        #[arg(value_name = "MAPPING_FILE")]
        mapping_file: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Write translated dialogue back into the original script (mode 3)
    Apply {
        /// The *_dich_final.txt file with translated lines
        #[arg(value_name = "TRANSLATION_FILE")]
        translation_file: PathBuf,

        /// The original script
        #[arg(value_name = "SCRIPT_FILE")]
        script_file: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Choose a mode and enter paths interactively (default command)
    Interactive,

    /// Generate shell completions for rpytl
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// rpytl - Ren'Py script translation helper
///
/// Extracts dialogue from .rpy scripts, shields placeholders from translation
/// and writes translated dialogue back into the scripts.
#[derive(Parser, Debug)]
#[command(name = "rpytl")]
#[command(version)]
#[command(about = "Ren'Py dialogue extraction and reinsertion tool")]
#[command(long_about = "rpytl extracts dialogue from Ren'Py scripts, protects placeholders and reinserts translations.

EXAMPLES:
    rpytl                                             # Interactive mode
    rpytl extract script.rpy -o out/                  # Mode 1: extract and protect
    rpytl extract game/                               # Mode 1 for every .rpy under game/
    rpytl restore out/script_goc_protected.txt out/script_mapping.json
    rpytl apply script_dich_final.txt script.rpy      # Mode 3: reinsert translations
    rpytl completions bash > rpytl.bash               # Generate bash completions

CONFIGURATION:
    Configuration is stored in rpytl.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "rpytl.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    // Initialize with trace so set_max_level alone controls verbosity later
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        for cause in e.chain().skip(1) {
            error!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

fn run(cli: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "rpytl", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let controller = Controller::with_config(config)?;

    match cli.command {
        Some(Commands::Extract { input_path, output_dir }) => {
            run_extract(&controller, &input_path, output_dir.as_deref())
        }
        Some(Commands::Restore { protected_file, mapping_file, output_dir }) => {
            controller.restore_file(&protected_file, &mapping_file, &output_dir)?;
            Ok(())
        }
        Some(Commands::Apply { translation_file, script_file, output_dir }) => {
            controller.apply_file(&translation_file, &script_file, &output_dir)?;
            Ok(())
        }
        Some(Commands::Interactive) | None => run_interactive(&controller),
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

// @loads: Config from file, creating a default one when missing
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&cli.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", cli.config_path);
        let config = Config::default();
        config.save_to_file(config_path)?;
        config
    };

    match &cli.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}

fn run_extract(controller: &Controller, input_path: &Path, output_dir: Option<&Path>) -> Result<()> {
    if input_path.is_dir() {
        controller.extract_folder(input_path, output_dir)?;
    } else if input_path.is_file() {
        controller.extract_file(input_path, output_dir.unwrap_or(Path::new(".")))?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }
    Ok(())
}

// @prompts: Single line from stdin, trimmed
fn prompt<R: BufRead>(input: &mut R, message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

// @prompts: Output directory, blank meaning the current directory
fn prompt_output_dir<R: BufRead>(input: &mut R) -> Result<PathBuf> {
    let answer = prompt(input, "Output directory (Enter = current directory): ")?;
    if answer.is_empty() {
        Ok(PathBuf::from("."))
    } else {
        Ok(PathBuf::from(answer))
    }
}

// @prompts: Path to an existing file; None after reporting a missing file
fn prompt_existing_file<R: BufRead>(input: &mut R, message: &str) -> Result<Option<PathBuf>> {
    let path = PathBuf::from(prompt(input, message)?);
    if path.is_file() {
        Ok(Some(path))
    } else {
        error!("File {:?} does not exist!", path);
        Ok(None)
    }
}

fn run_interactive(controller: &Controller) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    println!("{}", "=".repeat(60));
    println!("REN'PY SCRIPT PROCESSOR");
    println!("{}", "=".repeat(60));
    println!("\nChoose a mode:");
    println!("1. Export dialogue & placeholder mapping");
    println!("2. Restore placeholders");
    println!("3. Apply translation to the script");
    println!("{}", "-".repeat(40));

    let mode = prompt(&mut input, "\nMode (1/2/3): ")?;
    match mode.as_str() {
        "1" => {
            let Some(script) = prompt_existing_file(&mut input, &format!("Path to the original .{} file: ", controller.config().script_extension))? else {
                return Ok(());
            };
            let output_dir = prompt_output_dir(&mut input)?;
            controller.extract_file(&script, &output_dir)?;
        }
        "2" => {
            let Some(protected) = prompt_existing_file(&mut input, "Path to the _goc_protected.txt file: ")? else {
                return Ok(());
            };
            let Some(mapping) = prompt_existing_file(&mut input, "Path to the _mapping.json file: ")? else {
                return Ok(());
            };
            let output_dir = prompt_output_dir(&mut input)?;
            controller.restore_file(&protected, &mapping, &output_dir)?;
        }
        "3" => {
            let Some(translation) = prompt_existing_file(&mut input, "Path to the _dich_final.txt file: ")? else {
                return Ok(());
            };
            let Some(script) = prompt_existing_file(&mut input, &format!("Path to the original .{} file: ", controller.config().script_extension))? else {
                return Ok(());
            };
            let output_dir = prompt_output_dir(&mut input)?;
            controller.apply_file(&translation, &script, &output_dir)?;
        }
        other => {
            error!("Invalid choice: {:?}", other);
            return Ok(());
        }
    }

    info!("Done.");
    Ok(())
}
