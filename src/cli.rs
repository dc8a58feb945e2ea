use crate::auth::DEFAULT_TOKEN_FILE;
use crate::chart::{ActivityOptions, Column};
use crate::forge::github::DEFAULT_API_URL;
use crate::store::DEFAULT_STORE_FILE;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "repokpi")]
#[command(about = "Collect GitHub repository KPIs into a local store and chart them")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, env = "REPOKPI_DB", default_value = DEFAULT_STORE_FILE, help = "Path to the stats database")]
    pub db: PathBuf,

    #[arg(long, global = true, default_value = DEFAULT_TOKEN_FILE, help = "File holding a GitHub API token")]
    pub token_file: PathBuf,

    #[arg(long, global = true, env = "REPOKPI_API_URL", default_value = DEFAULT_API_URL, help = "GitHub API base URL")]
    pub api_url: String,

    #[arg(long, global = true, default_value = "30s", value_parser = humantime::parse_duration, help = "Timeout for each forge request (e.g. 30s, 2m)")]
    pub timeout: Duration,

    #[arg(long, global = true, env = "REPOKPI_LOG", default_value = "warn", help = "Log filter (error, warn, info, debug, trace or a tracing directive)")]
    pub log: String,

    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,
}

#[derive(Args, Clone, Default)]
pub struct CollectArgs {
    #[arg(help = "Repository URLs (https://github.com/<owner>/<repo>)")]
    pub urls: Vec<String>,

    #[arg(long, help = "Read repository URLs from a file, one per line")]
    pub urls_file: Option<PathBuf>,

    #[arg(long, help = "Show percentage progress")]
    pub status: bool,

    #[arg(long, help = "Print diagnostic info per repository")]
    pub debug: bool,

    #[arg(long, help = "Dump all fields per repository")]
    pub verbose: bool,

    #[arg(long, help = "Compute stats without writing to the database")]
    pub dry_run: bool,

    #[arg(long, help = "Skip failing repositories instead of aborting")]
    pub continue_on_error: bool,

    #[arg(long, help = "Do not fetch the weekly commit histogram")]
    pub skip_activity: bool,

    #[arg(long, help = "Output the run report as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch stats for each repository URL and store them
    Collect(CollectArgs),
    /// List the URLs of every repository visible to the account
    ListRepos {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Print every stored record
    Export {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Chart the stored records
    Chart {
        #[command(subcommand)]
        kind: ChartCommand,
    },
}

#[derive(Subcommand)]
pub enum ChartCommand {
    /// X/Y scatter of two numeric columns, coloured by total commits
    Scatter {
        #[arg(long, value_enum, default_value = "stargazers")]
        x: Column,

        #[arg(long, value_enum, default_value = "fork_count")]
        y: Column,

        #[arg(long, help = "Chart title (derived from the columns by default)")]
        title: Option<String>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output points as NDJSON")]
        ndjson: bool,

        #[arg(long = "interactive", alias = "tui", help = "Enable interactive terminal UI")]
        interactive: bool,
    },
    /// Stacked weekly commit activity over the past year
    Activity {
        #[arg(long, help = "Average every N weeks into one point")]
        bin: Option<usize>,

        #[arg(long, help = "One series per repository")]
        per_repo: bool,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long = "interactive", alias = "tui", help = "Enable interactive terminal UI")]
        interactive: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Collect(args) => crate::collect::exec(self.common, args),
            Commands::ListRepos { json } => crate::collect::exec_list_repos(self.common, json),
            Commands::Export { json, ndjson } => crate::export::exec(self.common, json, ndjson),
            Commands::Chart { kind } => match kind {
                ChartCommand::Scatter { x, y, title, json, ndjson, interactive } => {
                    crate::chart::exec_scatter(self.common, x, y, title, json, ndjson, interactive)
                }
                ChartCommand::Activity { bin, per_repo, json, interactive } => {
                    crate::chart::exec_activity(self.common, ActivityOptions { bin, per_repo }, json, interactive)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_flags_parse() {
        let cli = Cli::try_parse_from([
            "repokpi",
            "--db",
            "stats.db",
            "collect",
            "--status",
            "--dry-run",
            "--timeout",
            "5s",
            "https://github.com/a/b",
        ])
        .unwrap();
        assert_eq!(cli.common.db, PathBuf::from("stats.db"));
        assert_eq!(cli.common.timeout, Duration::from_secs(5));
        match cli.command {
            Commands::Collect(args) => {
                assert!(args.status && args.dry_run && !args.verbose);
                assert_eq!(args.urls, vec!["https://github.com/a/b"]);
            }
            _ => panic!("expected collect"),
        }
    }

    #[test]
    fn scatter_columns_use_field_names() {
        let cli = Cli::try_parse_from([
            "repokpi", "chart", "scatter", "--x", "num_contributors", "--y", "total_commits",
        ])
        .unwrap();
        match cli.command {
            Commands::Chart {
                kind: ChartCommand::Scatter { x, y, .. },
            } => {
                assert_eq!(x, Column::NumContributors);
                assert_eq!(y, Column::TotalCommits);
            }
            _ => panic!("expected chart scatter"),
        }
    }
}
