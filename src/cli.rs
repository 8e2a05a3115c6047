use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "proxybridge")]
#[command(
    author,
    version,
    about = "Queue and link editing proxies through a distributed worker pool"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Queue proxies for the active timeline and link them once rendered
    Run {
        /// Skip the interactive confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Link already-rendered proxies from a directory, without encoding
    Link {
        /// Directory to scan for proxy files (defaults to the configured proxy root)
        dir: Option<PathBuf>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Check that the worker pool is reachable
    CheckPool,

    /// Display version information
    Version,
}
