use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vesaire",
    about = "Disk cleaner - remove temp files, prefetch, browser caches and update leftovers",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct Selection {
    /// Only handle this category (repeatable). Defaults to all.
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Quick clean: temp files, prefetch and the recycle bin only
    #[arg(long, conflicts_with = "categories")]
    pub quick: bool,

    /// Extra path substring to never delete (repeatable, case-insensitive)
    #[arg(long = "exclude", value_name = "SUBSTRING")]
    pub excludes: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Measure what would be cleaned (dry-run, no deletion)
    Scan {
        #[command(flatten)]
        selection: Selection,
    },

    /// Clean the selected categories (requires --confirm to actually delete)
    Clean {
        /// Actually delete files. Without this flag, behaves like scan.
        #[arg(long)]
        confirm: bool,

        #[command(flatten)]
        selection: Selection,
    },

    /// Report sizes of the usual junk locations and usage of every volume
    Analyze,
}
