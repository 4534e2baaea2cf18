//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "slice-config",
    version,
    about = "Inspect and edit DLP slice/build profiles",
    long_about = "Inspect and edit DLP slice/build profiles.\n\n\
                  A profile is a SliceBuildConfig XML document plus a sibling\n\
                  directory of G-code fragments named after the document."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a profile populated with default settings and fragments.
    Init(InitArgs),

    /// Load a profile and display its settings.
    Show(ShowArgs),

    /// Print the parameter comment block embedded in build scripts.
    Summary(ProfileArgs),

    /// Copy projector resolution and pixel density into a profile.
    Adopt(AdoptArgs),

    /// List the profile's G-code fragment files.
    Fragments(ProfileArgs),
}

#[derive(Parser)]
pub struct ProfileArgs {
    /// Path to the profile document.
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Path to the profile document to create.
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// Overwrite an existing profile.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Path to the profile document.
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ShowFormatArg,
}

#[derive(Parser)]
pub struct AdoptArgs {
    /// Path to the profile document.
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// Projector pixels per millimetre along X.
    #[arg(long = "dpmm-x")]
    pub dpmm_x: f64,

    /// Projector pixels per millimetre along Y.
    #[arg(long = "dpmm-y")]
    pub dpmm_y: f64,

    /// Horizontal resolution in pixels.
    #[arg(long = "x-res")]
    pub x_res: u32,

    /// Vertical resolution in pixels.
    #[arg(long = "y-res")]
    pub y_res: u32,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShowFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
