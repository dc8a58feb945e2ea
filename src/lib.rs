pub mod auth;
pub mod batch;
pub mod chart;
pub mod cli;
pub mod collect;
pub mod error;
pub mod export;
pub mod fetch;
pub mod forge;
pub mod model;
pub mod store;
pub mod tui;
pub mod util;

pub use batch::{Batch, BatchReport, RunOptions};
pub use error::{KpiError, Result};
pub use fetch::{fetch_stats, FetchOptions};
pub use forge::{resolve_url, ForgeSession, GitHubSession};
pub use model::{AuthorCommits, RepoRef, RepoStatsRecord};
pub use store::{Store, UpsertOutcome};
