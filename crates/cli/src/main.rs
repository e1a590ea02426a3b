//! # wtstore
//!
//! Command-line tool for inspecting raw wavetable files: an 8-byte header
//! followed by the table payload.

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

mod commands;

use commands::wavetable::{self, ByteOrderArg};

/// CLI for building and inspecting wavetable tables
#[derive(Parser)]
#[command(name = "wtstore")]
#[command(about = "Inspect and validate raw wavetable files")]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a wavetable file into a store and display its layout
    Inspect {
        /// Path to the wavetable file
        file: std::path::PathBuf,

        /// Byte order of the header and payload
        #[arg(short, long, value_enum, default_value = "little")]
        byte_order: ByteOrderArg,

        /// Do not append silent tables after the last real table
        #[arg(long)]
        no_silence: bool,
    },

    /// Check a wavetable file without keeping the result
    Validate {
        /// Path to the wavetable file
        file: std::path::PathBuf,

        /// Byte order of the header and payload
        #[arg(short, long, value_enum, default_value = "little")]
        byte_order: ByteOrderArg,
    },

    /// Print the arena size needed for a table layout
    Plan {
        /// Samples per table
        #[arg(short, long)]
        length: usize,

        /// Number of tables
        #[arg(short, long, default_value = "1")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Inspect {
            file,
            byte_order,
            no_silence,
        } => wavetable::inspect(&file, byte_order.into(), !no_silence),
        Commands::Validate { file, byte_order } => wavetable::validate(&file, byte_order.into()),
        Commands::Plan { length, count } => wavetable::plan(length, count),
    }
}
