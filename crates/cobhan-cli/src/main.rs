//! Cobhan CLI - inspect and build buffer dump files.
//!
//! Useful when debugging a host binding: capture the bytes of a buffer,
//! then decode them here, or build a buffer with a small capacity to drive
//! the temp-file overflow path.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cobhan::BufferConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::commands::PayloadKind;

#[derive(Parser, Debug)]
#[command(name = "cobhan")]
#[command(about = "Inspect and build Cobhan buffer dumps")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a buffer dump and print its header and payload
    Inspect {
        file: PathBuf,

        /// How to decode the payload
        #[arg(long = "as", value_enum, default_value = "bytes")]
        kind: PayloadKind,
    },

    /// Write a file's contents into a new buffer dump
    Encode {
        input: PathBuf,
        output: PathBuf,

        /// Data region capacity (defaults to the input size)
        #[arg(long)]
        capacity: Option<usize>,

        /// Fail instead of spilling to a temp file
        #[arg(long)]
        no_temp_files: bool,

        /// Ceiling on declared lengths
        #[arg(long, default_value_t = i32::MAX)]
        max_length: i32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match args.command {
        Command::Inspect { file, kind } => {
            let inspection = commands::inspect(&file, kind, &BufferConfig::default())?;
            println!("{}", inspection);
        }
        Command::Encode {
            input,
            output,
            capacity,
            no_temp_files,
            max_length,
        } => {
            let config = BufferConfig::default()
                .with_temp_files(!no_temp_files)
                .with_max_length(max_length);
            commands::encode(&input, &output, capacity, &config)?;
        }
    }

    Ok(())
}
