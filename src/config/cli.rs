use crate::presentation::{OutputFormat, SortColumn};
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "ml-salary-dashboard")]
#[command(about = "Summarize ML engineer salaries per year from a CSV dataset")]
pub struct CliConfig {
    /// URL or path of the salaries CSV
    #[arg(long)]
    pub source: Option<String>,

    /// TOML configuration file; flags given here take precedence
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Column to sort the table by
    #[arg(long, value_enum)]
    pub sort: Option<SortColumn>,

    /// Sort in descending order (requires --sort)
    #[arg(long, requires = "sort")]
    pub descending: bool,

    /// List years in ascending order instead of first-seen order
    #[arg(long)]
    pub by_year: bool,

    /// Give up on the fetch after this many seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}
