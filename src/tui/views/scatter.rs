use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use super::super::{
    draw::{axis_labels, axis_max, tier_style},
    state::{ChartData, TuiState},
};
use crate::model::CommitTier;

const TIERS: [CommitTier; 4] = [
    CommitTier::Low,
    CommitTier::Mid,
    CommitTier::High,
    CommitTier::Highest,
];

/// Render the x/y scatter coloured by commit tier, with the selected
/// repository highlighted and described in a side panel.
pub fn draw_scatter_view(f: &mut Frame, area: Rect, data: &ChartData, state: &TuiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let chart = &data.scatter;
    let selected_name = data.records.get(state.selected).map(|r| r.repo_name.as_str());

    let visible: Vec<_> = chart
        .points
        .iter()
        .filter(|p| {
            state
                .filtered_indices
                .iter()
                .any(|&i| data.records.get(i).is_some_and(|r| r.repo_name == p.repo_name))
        })
        .collect();

    let per_tier: Vec<Vec<(f64, f64)>> = TIERS
        .iter()
        .map(|tier| {
            visible
                .iter()
                .filter(|p| p.tier == *tier)
                .map(|p| (p.x as f64, p.y as f64))
                .collect()
        })
        .collect();
    let highlighted: Vec<(f64, f64)> = visible
        .iter()
        .filter(|p| Some(p.repo_name.as_str()) == selected_name)
        .map(|p| (p.x as f64, p.y as f64))
        .collect();

    let mut datasets: Vec<Dataset> = TIERS
        .iter()
        .zip(per_tier.iter())
        .map(|(tier, points)| {
            Dataset::default()
                .name(format!("{tier:?}").to_lowercase())
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(tier_style(*tier))
                .data(points)
        })
        .collect();
    datasets.push(
        Dataset::default()
            .name("selected")
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&highlighted),
    );

    let x_max = axis_max(visible.iter().map(|p| p.x as f64).fold(0.0, f64::max));
    let y_max = axis_max(visible.iter().map(|p| p.y as f64).fold(0.0, f64::max));

    let widget = Chart::new(datasets)
        .block(Block::default().title(chart.title.clone()).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title(chart.x_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(axis_labels(x_max)),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(axis_labels(y_max)),
        );
    f.render_widget(widget, chunks[0]);

    let details = match data.records.get(state.selected) {
        Some(r) => {
            let tier = CommitTier::for_commits(r.total_commits());
            let plotted = visible.iter().any(|p| p.repo_name == r.repo_name);
            vec![
                Line::from(vec![Span::styled(
                    r.repo_name.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )]),
                Line::from(format!("Owner: {}", r.repo_owner)),
                Line::from(format!("Stargazers: {}", r.stargazers)),
                Line::from(format!("Fork count: {}", r.fork_count)),
                Line::from(format!("Num. contributors: {}", r.num_contributors())),
                Line::from(vec![
                    Span::raw("Total commits: "),
                    Span::styled(r.total_commits().to_string(), tier_style(tier)),
                ]),
                Line::from(format!("Branches: {}", r.branches)),
                Line::from(""),
                Line::from(if plotted { "Plotted" } else { "Not plotted (filtered out)" }),
            ]
        }
        None => vec![Line::from("No repositories stored")],
    };
    let side = Paragraph::new(details).block(Block::default().title("Repository").borders(Borders::ALL));
    f.render_widget(side, chunks[1]);
}
