//! Slice/build profile CLI.

use clap::{ColorChoice, Parser};
use slice_config::MachineResolution;
use slice_config_cli::commands::{
    ShowFormat, run_adopt, run_fragments, run_init, run_show, run_summary,
};
use slice_config_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, ShowFormatArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match cli.command {
        Command::Init(args) => run_init(&args.profile, args.force).map(|_| {
            println!("Created profile {}", args.profile.display());
        }),
        Command::Show(args) => {
            let format = match args.format {
                ShowFormatArg::Table => ShowFormat::Table,
                ShowFormatArg::Json => ShowFormat::Json,
            };
            run_show(&args.profile, format).map(|output| println!("{output}"))
        }
        Command::Summary(args) => run_summary(&args.profile).map(|output| print!("{output}")),
        Command::Adopt(args) => {
            let machine = MachineResolution {
                pix_per_mm_x: args.dpmm_x,
                pix_per_mm_y: args.dpmm_y,
                x_res: args.x_res,
                y_res: args.y_res,
            };
            run_adopt(&args.profile, machine).map(|config| {
                println!(
                    "Updated {}: {}x{} px at {}/{} px/mm",
                    args.profile.display(),
                    config.x_res,
                    config.y_res,
                    config.dots_per_mm_x,
                    config.dots_per_mm_y
                );
            })
        }
        Command::Fragments(args) => run_fragments(&args.profile).map(|output| println!("{output}")),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
