use crate::error::{KpiError, Result};
use crate::fetch::{fetch_stats, FetchOptions};
use crate::forge::{resolve_url, ForgeSession};
use crate::model::RepoStatsRecord;
use crate::store::{Store, UpsertOutcome};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Show percentage progress.
    pub status: bool,
    /// Print diagnostic lines per repository.
    pub debug: bool,
    /// Dump every field of each fetched record to stderr.
    pub verbose: bool,
    /// Persist results; when false the run only computes stats.
    pub add_to_db: bool,
    /// Record a failing URL and move on instead of aborting the batch.
    pub continue_on_error: bool,
    pub weekly_activity: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            status: false,
            debug: false,
            verbose: false,
            add_to_db: true,
            continue_on_error: false,
            weekly_activity: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoOutcome {
    pub url: String,
    pub repo: Option<String>,
    pub total_commits: Option<u64>,
    pub stored: Option<UpsertOutcome>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<RepoOutcome>,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

/// Ordered list of repository URLs to collect.
pub struct Batch {
    urls: Vec<String>,
}

impl Batch {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Resolve, fetch and (optionally) upsert every URL in order.
    ///
    /// Without `continue_on_error` the first error aborts the batch and is
    /// returned; rows already written stay in the store.
    pub fn run<S>(&self, session: &S, mut store: Option<&mut Store>, options: &RunOptions) -> Result<BatchReport>
    where
        S: ForgeSession + ?Sized,
    {
        if options.add_to_db && store.is_none() {
            return Err(KpiError::Other("persistence requested without a store".to_string()));
        }

        let fetch_options = FetchOptions {
            weekly_activity: options.weekly_activity,
        };
        let pb = progress_bar(self.urls.len(), options.status);
        let mut report = BatchReport::default();

        for url in &self.urls {
            pb.set_message(url.clone());
            let store = if options.add_to_db { store.as_deref_mut() } else { None };

            match self.process(url, session, store, fetch_options, options, &pb) {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) if options.continue_on_error => {
                    warn!(%url, error = %e, "skipping repository");
                    if options.debug {
                        report_line(&pb, format!("{} {}: {}", style("skipped").red(), url, e));
                    }
                    report.outcomes.push(RepoOutcome {
                        url: url.clone(),
                        repo: None,
                        total_commits: None,
                        stored: None,
                        error: Some(e.to_string()),
                    });
                }
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(report)
    }

    fn process<S>(
        &self,
        url: &str,
        session: &S,
        store: Option<&mut Store>,
        fetch_options: FetchOptions,
        options: &RunOptions,
        pb: &ProgressBar,
    ) -> Result<RepoOutcome>
    where
        S: ForgeSession + ?Sized,
    {
        let repo = resolve_url(url)?;
        if options.debug {
            report_line(pb, format!("Examining repo {}", style(&repo).cyan()));
        }

        let record = fetch_stats(session, &repo, fetch_options)?;

        let stored = match store {
            Some(store) => Some(store.upsert(&record)?),
            None => None,
        };
        debug!(%url, ?stored, total_commits = record.total_commits(), "processed");

        if options.verbose {
            for line in field_lines(&record) {
                report_line(pb, line);
            }
        }

        Ok(RepoOutcome {
            url: url.to_string(),
            repo: Some(repo.to_string()),
            total_commits: Some(record.total_commits()),
            stored,
            error: None,
        })
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Complete...{percent:>3}% [{bar:30.green/white}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Diagnostics go to stderr, above the bar when one is drawn.
fn report_line(pb: &ProgressBar, line: String) {
    if pb.is_hidden() {
        eprintln!("{line}");
    } else {
        pb.println(line);
    }
}

/// `key --> value` lines for the verbose dump; stdout is left to the report.
fn field_lines(record: &RepoStatsRecord) -> Vec<String> {
    record
        .fields()
        .into_iter()
        .map(|(key, value)| format!("{} --> {}", style(key).bold(), value))
        .collect()
}
