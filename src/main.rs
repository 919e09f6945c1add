#![deny(clippy::mod_module_files)]
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::backtrace::BacktraceStatus;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod record;
mod walker;

use config::PackerConfig;
use error::Error;
use walker::Cancellation;

#[derive(Parser, Debug)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a project directory into a JSON archive
    Pack {
        #[arg(allow_hyphen_values = true)]
        source_dir: PathBuf,
        #[arg(allow_hyphen_values = true)]
        output_file: PathBuf,
        /// Ignored
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _rest: Vec<OsString>,
    },
    /// Restore a JSON archive into a new directory
    Unpack {
        #[arg(allow_hyphen_values = true)]
        archive_file: PathBuf,
        #[arg(allow_hyphen_values = true)]
        output_dir: PathBuf,
        /// Ignored
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _rest: Vec<OsString>,
    },
}

fn main() -> ExitCode {
    init_logging();

    let cli = match Cli::try_parse_from(env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            tracing::debug!("Invalid invocation: {}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &Cancellation::none()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, cancellation: &Cancellation) -> Result<()> {
    let config = PackerConfig::default();

    match command {
        Command::Pack {
            source_dir,
            output_file,
            ..
        } => {
            if !source_dir.is_dir() {
                return Err(Error::SourceMissing(source_dir).into());
            }
            commands::pack::handle(&source_dir, &output_file, &config, cancellation)
        }
        Command::Unpack {
            archive_file,
            output_dir,
            ..
        } => {
            if !archive_file.is_file() {
                return Err(Error::ArchiveMissing.into());
            }
            if output_dir.exists() {
                return Err(Error::TargetExists(output_dir).into());
            }
            fs::create_dir_all(&output_dir).map_err(Error::from)?;
            commands::unpack::handle(&archive_file, &output_dir, cancellation)
        }
    }
}

/// Diagnostics go to stderr; stdout carries usage and error reports
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn executable_name() -> String {
    env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project-packer".to_string())
}

fn print_usage() {
    let exe = executable_name();
    println!("Usage:");
    println!("    {} pack <path/to/project/directory> <outputMetadataFileName>", exe);
    println!("    {} unpack <path/to/metadata/file> <path/to/output/directory>", exe);
}

fn report_error(err: &anyhow::Error) {
    println!("An error occurred: {}", err);
    for cause in err.chain().skip(1) {
        println!("Caused by: {}", cause);
    }
    let backtrace = err.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        println!("{}", backtrace);
    }
}
