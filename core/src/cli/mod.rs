pub mod report;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for dcmseries
#[derive(Parser, Debug)]
#[command(name = "dcmseries")]
#[command(about = "Group DICOM files into coherent volumes and order their slices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the series groups found in a directory
    Groups {
        /// Directory containing DICOM files
        #[arg(value_name = "DIRECTORY")]
        directory: PathBuf,

        /// Extra attribute that must match within a group (e.g. 0020|0012)
        #[arg(short, long = "restrict", value_name = "TAG")]
        restrictions: Vec<String>,
    },

    /// Print the files of every group whose key starts with a prefix
    Find {
        /// Directory containing DICOM files
        #[arg(value_name = "DIRECTORY")]
        directory: PathBuf,

        /// Series key prefix, typically a SeriesInstanceUID
        #[arg(value_name = "PREFIX")]
        prefix: String,

        /// Extra attribute that must match within a group (e.g. 0020|0012)
        #[arg(short, long = "restrict", value_name = "TAG")]
        restrictions: Vec<String>,

        /// Sort each matching group into slice order
        #[arg(short, long)]
        sort: bool,
    },

    /// Print files in slice order
    Sort {
        /// Files of one series group
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Distance (mm) below which slices count as the same plane
        #[arg(short, long)]
        epsilon: Option<f64>,
    },

    /// Print build configuration
    Config,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// File paths only (one per line)
    Paths,
}
