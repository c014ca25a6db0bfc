//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::orders::OrdersCommands;
use crate::cli::commands::rfq::RfqCommands;

#[derive(Parser, Debug)]
#[command(
    name = "tradedesk",
    version,
    about = "Tradedesk - a terminal order desk for commodity orders and RFQs",
    long_about = "Browse, filter, sort and reorder commodity orders from a YAML or JSON \
                  dataset, and raise requests for quote through a three-step wizard."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Order dataset (YAML, or JSON when the name ends in .json)
    #[arg(long, short = 'd', global = true, env = "TRADEDESK_DATA")]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output: OutputFormat,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Table for lists, YAML for single items
    #[default]
    Auto,
    /// Bordered table
    Table,
    /// Tab-separated values
    Tsv,
    /// Comma-separated values
    Csv,
    Json,
    Yaml,
    /// Ids only, one per line
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the sample order dataset
    Init(InitArgs),

    /// Work with the order table
    #[command(subcommand)]
    Orders(OrdersCommands),

    /// Raise and review requests for quote
    #[command(subcommand)]
    Rfq(RfqCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
