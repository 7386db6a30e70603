//! Configuration for the converter.
//!
//! Handles:
//! - Command-line argument parsing
//! - Optional TOML config file with machine/extruder defaults
//!
//! Precedence: command line, then config file, then built-in defaults.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::metadata::{ExtruderModel, MachineModel};
use crate::package::{default_output_path, TOOLPATH_EXTENSION};
use crate::translate::TranslateOptions;

/// Command-line arguments for the converter
#[derive(Debug, Parser)]
#[command(name = "gcode-mbot")]
#[command(about = "Convert slicer G-code into a MakerBot .makerbot print file")]
#[command(version)]
pub struct Args {
    /// G-code file to convert
    pub input: PathBuf,

    /// Output path (defaults to the input with a .makerbot extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target printer
    #[arg(long, value_enum)]
    pub machine: Option<MachineModel>,

    /// Installed extruder
    #[arg(long, value_enum)]
    pub extruder: Option<ExtruderModel>,

    /// Config file (defaults to <config dir>/gcode-makerbot/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Add a comment with the source G-code after each instruction
    #[arg(long)]
    pub annotate: bool,

    /// Write only the JSON toolpath, without metadata or archive
    #[arg(long)]
    pub toolpath_only: bool,

    /// Log level for the converter
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Settings read from a TOML config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub machine: Option<MachineModel>,
    pub extruder: Option<ExtruderModel>,
    pub annotate: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Per-user config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gcode-makerbot").join("config.toml"))
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub machine: MachineModel,
    pub extruder: ExtruderModel,
    pub translate: TranslateOptions,
    pub toolpath_only: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => FileConfig::load(&path)?,
                _ => FileConfig::default(),
            },
        };
        Ok(Self::merge(args, file))
    }

    /// Apply precedence between arguments and file settings
    pub fn merge(args: Args, file: FileConfig) -> Self {
        let output = args.output.unwrap_or_else(|| {
            if args.toolpath_only {
                args.input.with_extension(TOOLPATH_EXTENSION)
            } else {
                default_output_path(&args.input)
            }
        });

        Config {
            output,
            machine: args.machine.or(file.machine).unwrap_or_default(),
            extruder: args.extruder.or(file.extruder).unwrap_or_default(),
            translate: TranslateOptions {
                annotate: args.annotate || file.annotate.unwrap_or(false),
            },
            toolpath_only: args.toolpath_only,
            log_level: args.log_level,
            input: args.input,
        }
    }
}
