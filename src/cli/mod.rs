pub mod config;
pub mod convert;
pub mod months;

use clap::{Parser, Subcommand};
use colored::Colorize;

use gstconv::walker::EntryError;

pub(crate) fn print_entry_errors(errors: &[EntryError]) {
    for err in errors {
        eprintln!(
            "{}",
            format!("Warning: error processing {}: {}", err.name, err.message).yellow()
        );
    }
}

#[derive(Parser)]
#[command(
    name = "gstconv",
    about = "Convert a ZIP of GSTR-2B JSON files into a categorized spreadsheet report."
)]
pub struct Cli {
    /// Log every archive entry as it is processed
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract records and write one sheet per category.
    Convert {
        /// Path to the ZIP archive of GSTR-2B JSON files
        zip: String,
        /// Months to include, e.g. 20-2403 (comma separated or repeated)
        #[arg(long, value_delimiter = ',')]
        months: Vec<String>,
        /// Include every month found in the archive
        #[arg(long = "all-months", conflicts_with = "months")]
        all_months: bool,
        /// Output file name without extension (default from settings)
        #[arg(long)]
        output: Option<String>,
        /// Directory to write into (default from settings)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
        /// Output format: xlsx or csv
        #[arg(long, default_value = "xlsx")]
        format: String,
    },
    /// List the months and categories found in an archive.
    Months {
        /// Path to the ZIP archive of GSTR-2B JSON files
        zip: String,
    },
    /// Show or update saved defaults.
    Config {
        /// Default output directory
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
        /// Default output file name
        #[arg(long = "default-name")]
        default_name: Option<String>,
        /// Pre-select every month in the interactive picker
        #[arg(long = "select-all")]
        select_all: Option<bool>,
    },
}
