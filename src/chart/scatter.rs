use crate::model::{CommitTier, RepoStatsRecord, ScatterOutput, ScatterPoint, SCHEMA_VERSION};
use chrono::Utc;
use serde::Serialize;

/// Repositories at or above this many contributors are left off scatter plots.
pub const MAX_CONTRIBUTORS: u64 = 80;

/// Numeric record columns that can be plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    #[value(name = "stargazers")]
    Stargazers,
    #[value(name = "fork_count")]
    ForkCount,
    #[value(name = "num_contributors")]
    NumContributors,
    #[value(name = "total_commits")]
    TotalCommits,
    #[value(name = "branches")]
    Branches,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::Stargazers => "stargazers",
            Column::ForkCount => "fork_count",
            Column::NumContributors => "num_contributors",
            Column::TotalCommits => "total_commits",
            Column::Branches => "branches",
        }
    }

    pub fn value(&self, record: &RepoStatsRecord) -> u64 {
        match self {
            Column::Stargazers => record.stargazers,
            Column::ForkCount => record.fork_count,
            Column::NumContributors => record.num_contributors(),
            Column::TotalCommits => record.total_commits(),
            Column::Branches => record.branches,
        }
    }
}

/// `fork_count`, `stargazers` -> `Fork Count Vs. Stargazers`.
pub fn auto_title(x: &str, y: &str) -> String {
    x.split('_')
        .chain(std::iter::once("vs."))
        .chain(y.split('_'))
        .filter(|w| !w.is_empty())
        .map(title_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// One point per repository with commits and fewer than
/// [`MAX_CONTRIBUTORS`] contributors, coloured by total commits.
pub fn scatter_points(records: &[RepoStatsRecord], x: Column, y: Column) -> Vec<ScatterPoint> {
    records
        .iter()
        .filter(|r| r.total_commits() > 0 && r.num_contributors() < MAX_CONTRIBUTORS)
        .map(|r| {
            let tier = CommitTier::for_commits(r.total_commits());
            ScatterPoint {
                repo_name: r.repo_name.clone(),
                repo_owner: r.repo_owner.clone(),
                x: x.value(r),
                y: y.value(r),
                stargazers: r.stargazers,
                fork_count: r.fork_count,
                num_contributors: r.num_contributors(),
                total_commits: r.total_commits(),
                tier,
                color: tier.color().to_string(),
            }
        })
        .collect()
}

pub fn scatter_chart(records: &[RepoStatsRecord], x: Column, y: Column, title: Option<&str>) -> ScatterOutput {
    ScatterOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        title: title
            .map(str::to_string)
            .unwrap_or_else(|| auto_title(x.name(), y.name())),
        x_label: x.name().to_string(),
        y_label: y.name().to_string(),
        points: scatter_points(records, x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthorCommits, CommitTier};

    fn record(name: &str, contributors: usize, each: u64) -> RepoStatsRecord {
        RepoStatsRecord::new("octo", name)
            .with_stargazers(contributors as u64 * 2)
            .with_fork_count(1)
            .with_commits_by_author(
                (0..contributors)
                    .map(|i| AuthorCommits::new(format!("dev{i}"), each))
                    .collect(),
            )
    }

    #[test]
    fn titles_columns() {
        assert_eq!(auto_title("fork_count", "stargazers"), "Fork Count Vs. Stargazers");
        assert_eq!(
            auto_title("num_contributors", "total_commits"),
            "Num Contributors Vs. Total Commits"
        );
    }

    #[test]
    fn filters_empty_and_crowded_repos() {
        let records = vec![
            record("empty", 0, 0),
            record("small", 2, 3),
            record("crowded", 80, 1),
            record("big", 10, 150),
        ];
        let points = scatter_points(&records, Column::Stargazers, Column::TotalCommits);
        let names: Vec<_> = points.iter().map(|p| p.repo_name.as_str()).collect();
        assert_eq!(names, vec!["small", "big"]);
        assert_eq!(points[0].tier, CommitTier::Low);
        assert_eq!(points[1].tier, CommitTier::Highest);
        assert_eq!(points[1].x, 20);
        assert_eq!(points[1].y, 1500);
        assert_eq!(points[1].color, "#FF0000");
    }

    #[test]
    fn chart_uses_auto_title_unless_given() {
        let records = vec![record("small", 2, 3)];
        let chart = scatter_chart(&records, Column::ForkCount, Column::Stargazers, None);
        assert_eq!(chart.title, "Fork Count Vs. Stargazers");
        assert_eq!(chart.x_label, "fork_count");
        let chart = scatter_chart(&records, Column::ForkCount, Column::Stargazers, Some("Mine"));
        assert_eq!(chart.title, "Mine");
    }
}
