//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// linktally - short link allocation, redirect and click analytics service
#[derive(Parser, Debug)]
#[command(name = "linktally")]
#[command(version)]
#[command(about = "Short link allocation, redirect and click analytics service", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Write a sample configuration file
    ConfigGen {
        /// Output path (defaults to config.example.toml)
        path: Option<String>,
    },
}
