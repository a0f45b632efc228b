//! Command-line interface for the nkhost support layer.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nkhost")]
#[command(about = "Host support layer for an immediate-mode GUI core", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render the C configuration header for the resolved options
    Header {
        /// TOML file overriding the build's options
        #[arg(long)]
        options: Option<PathBuf>,
        /// Write the header here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the resolved options as TOML
    Show {
        /// TOML file overriding the build's options
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Install the contract and self-test every bound primitive
    Check {
        /// TOML file overriding the build's options
        #[arg(long)]
        options: Option<PathBuf>,
    },
}
