use crate::model::{ActivityOutput, CommitTier, ScatterOutput};
use anyhow::Result;
use console::style;
use serde::Serialize;

pub fn output_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn output_ndjson<T: Serialize>(items: &[T]) -> Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}

fn tier_style(tier: CommitTier, text: String) -> console::StyledObject<String> {
    match tier {
        CommitTier::Low => style(text).blue(),
        CommitTier::Mid => style(text).magenta(),
        CommitTier::High => style(text).red(),
        CommitTier::Highest => style(text).red().bold(),
    }
}

pub fn output_scatter(chart: &ScatterOutput) -> Result<()> {
    if chart.points.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    println!("{}", style(&chart.title).bold());
    println!(
        "{:<30} {:<20} {:>12} {:>12} {:>8}",
        style("Repo").bold(),
        style("Owner").bold(),
        style(&chart.x_label).bold(),
        style(&chart.y_label).bold(),
        style("Tier").bold()
    );
    println!("{}", "─".repeat(86));
    for p in &chart.points {
        println!(
            "{:<30} {:<20} {:>12} {:>12} {:>8}",
            p.repo_name,
            p.repo_owner,
            p.x,
            p.y,
            tier_style(p.tier, format!("{:?}", p.tier).to_lowercase())
        );
    }

    println!("\n{}", style("Legend").bold());
    println!(
        "  {} <10  {} <100  {} <1000  {} 1000+ total commits",
        tier_style(CommitTier::Low, "low".into()),
        tier_style(CommitTier::Mid, "mid".into()),
        tier_style(CommitTier::High, "high".into()),
        tier_style(CommitTier::Highest, "highest".into())
    );
    Ok(())
}

pub fn output_activity(chart: &ActivityOutput) -> Result<()> {
    println!("{}", style(&chart.title).bold());
    println!("{}", chart.summary());
    println!("{}", "─".repeat(50));

    let max = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);

    for series in &chart.series {
        if series.values.is_empty() {
            println!("{:<24} no activity", series.name);
            continue;
        }
        let bars: String = series.values.iter().map(|&v| intensity_char(v, max)).collect();
        let total: f64 = series.values.iter().sum();
        println!("{:<24} {} {:>8.1}", series.name, style(bars).green(), total);
    }

    println!("\nx: {} (oldest left)   y: {}", chart.x_label, chart.y_label);
    Ok(())
}

fn intensity_char(value: f64, max: f64) -> char {
    const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    if max <= 0.0 || value <= 0.0 {
        return ' ';
    }
    let idx = ((value / max) * (LEVELS.len() - 1) as f64).round() as usize;
    LEVELS[idx.min(LEVELS.len() - 1)]
}
