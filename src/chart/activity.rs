use crate::error::{KpiError, Result};
use crate::model::{ActivityOutput, ActivitySeries, RepoStatsRecord, SCHEMA_VERSION};
use chrono::Utc;

pub const AGGREGATE_SERIES: &str = "All repos";

#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityOptions {
    /// Average every `bin` consecutive weeks into one point.
    pub bin: Option<usize>,
    /// One series per repository instead of a single summed series.
    pub per_repo: bool,
}

/// Average consecutive chunks of `width` values, dropping the incomplete tail.
pub fn bin_series(values: &[f64], width: usize) -> Vec<f64> {
    if width == 0 {
        return values.to_vec();
    }
    values
        .chunks_exact(width)
        .map(|chunk| chunk.iter().sum::<f64>() / width as f64)
        .collect()
}

/// Build stacked weekly-commit series from stored records.
///
/// Only repositories with more than one commit across their weekly
/// histogram count as active. Series of different lengths are summed
/// index by index, missing weeks counting as zero.
pub fn weekly_activity(records: &[RepoStatsRecord], options: ActivityOptions) -> Result<ActivityOutput> {
    if options.bin == Some(0) {
        return Err(KpiError::InvalidChart("bin width must be at least 1".to_string()));
    }

    let active: Vec<(&str, &[u64])> = records
        .iter()
        .filter(|r| r.weekly_total() > 1)
        .filter_map(|r| r.weekly_commits.as_deref().map(|w| (r.repo_name.as_str(), w)))
        .collect();
    let total_commits: u64 = active.iter().map(|(_, w)| w.iter().sum::<u64>()).sum();

    let shape = |values: Vec<f64>| match options.bin {
        Some(width) => bin_series(&values, width),
        None => values,
    };

    let series = if options.per_repo {
        active
            .iter()
            .map(|(name, weekly)| ActivitySeries {
                name: name.to_string(),
                values: shape(weekly.iter().map(|&v| v as f64).collect()),
            })
            .collect()
    } else {
        let len = active.iter().map(|(_, w)| w.len()).max().unwrap_or(0);
        let mut summed = vec![0.0; len];
        for (_, weekly) in &active {
            for (slot, value) in summed.iter_mut().zip(weekly.iter()) {
                *slot += *value as f64;
            }
        }
        vec![ActivitySeries {
            name: AGGREGATE_SERIES.to_string(),
            values: shape(summed),
        }]
    };

    let x_label = if options.bin.is_some() {
        "months since now"
    } else {
        "weeks since now"
    };
    let title = if options.per_repo {
        "Commits to all repos"
    } else {
        "Commits to repos"
    };

    Ok(ActivityOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: "Master repo commits/week".to_string(),
        total_commits,
        active_repos: active.len(),
        total_repos: records.len(),
        series,
    })
}
