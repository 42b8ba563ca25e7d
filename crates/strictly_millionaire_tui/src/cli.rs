//! Command-line interface for strictly_millionaire.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Millionaire - a timed quiz show in your terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_millionaire")]
#[command(about = "Timed multiple-choice quiz show with lifelines and safe havens", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Path to the TOML config file
        #[arg(short, long, default_value = "millionaire.toml")]
        config: PathBuf,

        /// Questions per game (overrides config)
        #[arg(short, long)]
        questions: Option<usize>,

        /// Seed for a reproducible game (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Question bank TOML file (overrides config)
        #[arg(short, long)]
        bank: Option<PathBuf>,
    },

    /// Validate a question bank and prize ladder, then print a summary
    Check {
        /// Path to the TOML config file
        #[arg(short, long, default_value = "millionaire.toml")]
        config: PathBuf,

        /// Question bank TOML file (overrides config)
        #[arg(short, long)]
        bank: Option<PathBuf>,
    },
}
