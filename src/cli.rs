use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "artifact-checkr",
    about = "Cross-reference discovered software artifacts against CVE advisories",
    version
)]
pub struct Cli {
    /// Input workbook: JSON object with an "inventory" table and an optional "cves" table
    pub input: PathBuf,

    /// Config file [default: <input dir>/.artifact-checkr/config.toml, fallback ~/.config/artifact-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Write the updated workbook (with result columns) to FILE
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Hostname used for row scoping [default: COMPUTERNAME/HOSTNAME env]
    #[arg(long, value_name = "NAME")]
    pub hostname: Option<String>,

    /// Classify every row regardless of its hostname
    #[arg(long)]
    pub all_hosts: bool,

    /// Show all rows (not just those requiring attention)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
