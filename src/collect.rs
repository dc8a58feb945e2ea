use crate::auth::{prompt_basic_credentials, resolve_credentials, TOKEN_ENV_VAR};
use crate::batch::{Batch, BatchReport, RunOptions};
use crate::cli::{CollectArgs, CommonArgs};
use crate::forge::{ForgeSession, GitHubSession};
use crate::store::{Store, UpsertOutcome};
use anyhow::{bail, Context};
use console::style;
use tracing::info;

/// Resolve credentials and build the forge session, before any other work.
pub fn open_session(common: &CommonArgs) -> anyhow::Result<GitHubSession> {
    let (credentials, source) = resolve_credentials(
        &common.token_file,
        std::env::var(TOKEN_ENV_VAR).ok(),
        prompt_basic_credentials,
    )
    .context("Failed to resolve GitHub credentials")?;
    info!(?source, "resolved credentials");

    GitHubSession::new(&common.api_url, credentials, common.timeout)
        .context("Failed to create GitHub session")
}

pub fn exec(common: CommonArgs, args: CollectArgs) -> anyhow::Result<()> {
    let mut urls = args.urls.clone();
    if let Some(path) = &args.urls_file {
        let listed = crate::util::read_url_list(path)
            .with_context(|| format!("Failed to read URL list {}", path.display()))?;
        urls.extend(listed);
    }
    if urls.is_empty() {
        bail!("No repository URLs given; pass them as arguments or with --urls-file");
    }

    let session = open_session(&common)?;

    let mut store = if args.dry_run {
        None
    } else {
        Some(Store::open(&common.db).context("Failed to open stats store")?)
    };

    let options = RunOptions {
        status: args.status,
        debug: args.debug,
        verbose: args.verbose,
        add_to_db: !args.dry_run,
        continue_on_error: args.continue_on_error,
        weekly_activity: !args.skip_activity,
    };

    let report = Batch::new(urls)
        .run(&session, store.as_mut(), &options)
        .context("Repository collection aborted")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output_report(&report)?;
    }
    Ok(())
}

fn output_report(report: &BatchReport) -> anyhow::Result<()> {
    println!(
        "{:<40} {:>8} {:<12}",
        style("Repository").bold(),
        style("Commits").bold(),
        style("Stored").bold()
    );
    println!("{}", "─".repeat(62));
    for o in &report.outcomes {
        let name = o.repo.as_deref().unwrap_or(&o.url);
        let commits = o
            .total_commits
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let stored = match (&o.error, o.stored) {
            (Some(_), _) => style("failed".to_string()).red(),
            (None, Some(UpsertOutcome::Inserted)) => style("inserted".to_string()).green(),
            (None, Some(UpsertOutcome::Replaced { previous_total })) => {
                style(format!("replaced ({previous_total})")).cyan()
            }
            (None, Some(UpsertOutcome::Unchanged { .. })) => style("unchanged".to_string()).dim(),
            (None, None) => style("not stored".to_string()).yellow(),
        };
        println!("{:<40} {:>8} {:<12}", name, commits, stored);
        if let Some(err) = &o.error {
            println!("    {}", style(err).red());
        }
    }

    let failures = report.failures();
    if failures > 0 {
        println!(
            "\n{} of {} repositories failed",
            style(failures).red(),
            report.outcomes.len()
        );
    }
    Ok(())
}

pub fn exec_list_repos(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let session = open_session(&common)?;
    let urls: Vec<String> = session
        .list_repositories()
        .context("Failed to list repositories")?
        .iter()
        .map(|r| r.url())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&urls)?);
    } else {
        for url in urls {
            println!("{url}");
        }
    }
    Ok(())
}
