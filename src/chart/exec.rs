use super::activity::{weekly_activity, ActivityOptions};
use super::output::{output_activity, output_json, output_ndjson, output_scatter};
use super::scatter::{scatter_chart, Column};
use crate::cli::CommonArgs;
use crate::store::Store;
use anyhow::Context;

pub fn exec_scatter(
    common: CommonArgs,
    x: Column,
    y: Column,
    title: Option<String>,
    json: bool,
    ndjson: bool,
    interactive: bool,
) -> anyhow::Result<()> {
    let store = Store::open_existing(&common.db).context("Failed to open stats store")?;
    let records = store.all().context("Failed to read stored records")?;
    let chart = scatter_chart(&records, x, y, title.as_deref());

    if interactive {
        let activity = weekly_activity(&records, ActivityOptions::default())?;
        crate::tui::run(records, chart, activity, crate::tui::ViewMode::Scatter)
            .map_err(|e| anyhow::anyhow!(e))
    } else if json {
        output_json(&chart)
    } else if ndjson {
        output_ndjson(&chart.points)
    } else {
        output_scatter(&chart)
    }
}

pub fn exec_activity(
    common: CommonArgs,
    options: ActivityOptions,
    json: bool,
    interactive: bool,
) -> anyhow::Result<()> {
    let store = Store::open_existing(&common.db).context("Failed to open stats store")?;
    let records = store.all().context("Failed to read stored records")?;
    let activity = weekly_activity(&records, options).context("Failed to compute weekly activity")?;

    if interactive {
        let chart = scatter_chart(&records, Column::Stargazers, Column::ForkCount, None);
        crate::tui::run(records, chart, activity, crate::tui::ViewMode::Activity)
            .map_err(|e| anyhow::anyhow!(e))
    } else if json {
        output_json(&activity)
    } else {
        output_activity(&activity)
    }
}
