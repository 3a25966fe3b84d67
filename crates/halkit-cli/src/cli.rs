use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use halkit_core::NamingPolicy;

#[derive(Parser)]
#[command(name = "hal")]
#[command(version, about = "Inspect and reshape HAL (application/hal+json) documents")]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML file with codec settings (naming, pretty, allow_empty_relations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Property naming policy applied on output
    #[arg(long, global = true)]
    pub naming: Option<NamingPolicy>,

    /// Indent JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// More log output on stderr (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a document and write it back out
    Fmt {
        /// Input file, `-` for stdin
        input: PathBuf,
    },

    /// List link relations
    #[command(alias = "ls")]
    Links {
        /// Input file, `-` for stdin
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print one property value (name matched case-insensitively)
    Get {
        /// Input file, `-` for stdin
        input: PathBuf,

        property: String,
    },

    /// Merge a JSON object into the document's properties
    Merge {
        /// Input file, `-` for stdin
        input: PathBuf,

        /// JSON object to merge
        patch: PathBuf,
    },

    /// Expand a compact relation through the document's curies
    Curie {
        /// Input file, `-` for stdin
        input: PathBuf,

        /// Compact relation, e.g. `acme:widgets`
        rel: String,
    },

    /// Print the resource(s) embedded under a relation
    Embedded {
        /// Input file, `-` for stdin
        input: PathBuf,

        rel: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
