// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::file_utils::FileManager;
use crate::text_transform::TextTransform;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod subtitle_processor;
mod text_transform;
mod time_utils;
mod timeline_processor;

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
    /// Convert between .srt and .fcpxml subtitle files (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for subspine
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input subtitle file (.srt or .fcpxml)
    #[arg(short, long, value_name = "INPUT_FILE")]
    input: PathBuf,

    /// Output subtitle file (.srt or .fcpxml)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: PathBuf,

    /// Text transform selector applied to all written cue text
    #[arg(short, long)]
    convert: Option<String>,

    /// Template fcpxml file used when writing .fcpxml output
    #[arg(short, long)]
    template: Option<String>,

    /// Expected frame rate, sanity-checked against the template's frame tick
    #[arg(long, alias = "fr")]
    framerate: Option<f64>,

    /// Shift the entire timeline by this many seconds (may be negative)
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<f64>,

    /// Configuration file path
    #[arg(long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subspine - subtitle conversion between SRT and Final Cut Pro XML
///
/// Converts subtitle cues between the SubRip sequential format and fcpxml
/// timelines built from a project template.
#[derive(Parser, Debug)]
#[command(name = "subspine")]
#[command(version = "1.0.0")]
#[command(about = "Convert subtitles between .srt and .fcpxml files")]
#[command(long_about = "subspine converts subtitle cues between SubRip (.srt) files and Final Cut
Pro XML (.fcpxml) timelines, cloning a title clip from a project template for
every cue.

EXAMPLES:
    subspine -i episode.srt -o episode.fcpxml           # SRT to timeline
    subspine -i episode.fcpxml -o episode.srt           # Timeline to SRT
    subspine -i in.srt -o out.fcpxml -t MyTemplate.xml  # Use a custom template
    subspine -i in.srt -o out.fcpxml --framerate 25     # Check against 25fps
    subspine -i in.srt -o out.srt --offset -1.5         # Pull cues 1.5s earlier
    subspine completions bash > subspine.bash           # Generate completions

CONFIGURATION:
    Defaults (template path, frame rate, log level) are read from conf.json
    when it exists; command-line flags override it. Without a config file the
    built-in defaults apply: Template.xml at 29.97fps.

TEMPLATE:
    The fcpxml template must carry the project frame tick in its resources
    and at least one title clip in the spine; that clip is cloned for every
    subtitle cue.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file (.srt or .fcpxml)
    #[arg(short, long, value_name = "INPUT_FILE")]
    input: Option<PathBuf>,

    /// Output subtitle file (.srt or .fcpxml)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,

    /// Text transform selector applied to all written cue text
    #[arg(short, long)]
    convert: Option<String>,

    /// Template fcpxml file used when writing .fcpxml output
    #[arg(short, long)]
    template: Option<String>,

    /// Expected frame rate, sanity-checked against the template's frame tick
    #[arg(long, alias = "fr")]
    framerate: Option<f64>,

    /// Shift the entire timeline by this many seconds (may be negative)
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<f64>,

    /// Configuration file path
    #[arg(long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subspine", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input = cli
                .input
                .ok_or_else(|| anyhow!("--input is required when no subcommand is specified"))?;
            let output = cli
                .output
                .ok_or_else(|| anyhow!("--output is required when no subcommand is specified"))?;

            let convert_args = ConvertArgs {
                input,
                output,
                convert: cli.convert,
                template: cli.template,
                framerate: cli.framerate,
                offset: cli.offset,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };

            run_convert(convert_args)
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    // Load the config file when present; built-in defaults otherwise
    let mut config = if FileManager::file_exists(&args.config_path) {
        Config::from_file(&args.config_path)?
    } else {
        Config::default()
    };

    // Command-line flags override config file values
    if let Some(template) = args.template {
        config.template = template;
    }
    if let Some(framerate) = args.framerate {
        config.framerate = framerate;
    }
    if let Some(level) = args.log_level {
        config.log_level = level.into();
    }

    log::set_max_level(level_filter(&config.log_level));

    let transform = match &args.convert {
        Some(name) => TextTransform::by_name(name)?,
        None => TextTransform::identity(),
    };

    let controller = Controller::with_config(config)?;
    controller.run(&args.input, &args.output, &transform, args.offset)?;

    Ok(())
}
