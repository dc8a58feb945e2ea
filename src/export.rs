use crate::cli::CommonArgs;
use crate::model::{RecordsOutput, RepoStatsRecord, SCHEMA_VERSION};
use crate::store::Store;
use anyhow::Context;
use chrono::Utc;
use console::style;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let store = Store::open_existing(&common.db).context("Failed to open stats store")?;
    let records = store.all().context("Failed to read stored records")?;

    if json {
        output_json(&records, &store)?;
    } else if ndjson {
        output_ndjson(&records)?;
    } else {
        output_summary(&records)?;
    }

    Ok(())
}

fn output_json(records: &[RepoStatsRecord], store: &Store) -> anyhow::Result<()> {
    let output = RecordsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        store_path: store.path().to_string_lossy().to_string(),
        records: records.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(records: &[RepoStatsRecord]) -> anyhow::Result<()> {
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

fn output_summary(records: &[RepoStatsRecord]) -> anyhow::Result<()> {
    println!("{}", style("Stored Repositories").bold());
    println!(
        "{:<30} {:<20} {:>6} {:>6} {:>8} {:>8} {:>8}",
        style("Repo").bold(),
        style("Owner").bold(),
        style("Stars").bold(),
        style("Forks").bold(),
        style("Contribs").bold(),
        style("Commits").bold(),
        style("Branches").bold()
    );
    println!("{}", "─".repeat(94));
    for r in records {
        println!(
            "{:<30} {:<20} {:>6} {:>6} {:>8} {:>8} {:>8}",
            r.repo_name,
            r.repo_owner,
            r.stargazers,
            r.fork_count,
            r.num_contributors(),
            r.total_commits(),
            r.branches
        );
    }

    let total_commits: u64 = records.iter().map(|r| r.total_commits()).sum();
    println!("\nRepositories: {}", style(records.len()).cyan());
    println!("Total commits: {}", style(total_commits).green());
    println!("\nUse --json or --ndjson flags to export the raw data.");
    Ok(())
}
