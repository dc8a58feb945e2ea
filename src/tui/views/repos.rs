use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use super::super::{
    draw::tier_style,
    layout::visible_rows,
    state::{ChartData, TuiState},
};
use super::{header_cell, truncate};
use crate::model::CommitTier;

/// Render the stored repositories as a scrollable table.
pub fn draw_repos_view(f: &mut Frame, area: Rect, data: &ChartData, state: &TuiState) {
    let rows: Vec<Row> = visible_rows(state, area.height as usize)
        .into_iter()
        .filter_map(|(i, selected)| data.records.get(i).map(|r| (r, selected)))
        .map(|(r, selected)| {
            let name = if selected {
                format!("{} ◄", truncate(&r.repo_name, 28))
            } else {
                truncate(&r.repo_name, 30)
            };
            let name_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let tier = CommitTier::for_commits(r.total_commits());

            Row::new(vec![
                Cell::from(name).style(name_style),
                Cell::from(truncate(&r.repo_owner, 18)),
                Cell::from(r.stargazers.to_string()),
                Cell::from(r.fork_count.to_string()),
                Cell::from(r.num_contributors().to_string()),
                Cell::from(r.total_commits().to_string()).style(tier_style(tier)),
                Cell::from(r.branches.to_string()),
                Cell::from(r.language.clone().unwrap_or_default()).style(Style::default().fg(Color::Magenta)),
            ])
        })
        .collect();

    let title = if state.search_mode {
        format!("Repositories (search: {}_)", state.search_query)
    } else if !state.search_query.is_empty() {
        format!(
            "Repositories ({} of {} match '{}')",
            state.filtered_indices.len(),
            data.records.len(),
            state.search_query
        )
    } else {
        format!("Repositories ({})", data.records.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(24),
            Constraint::Percentage(16),
            Constraint::Percentage(9),
            Constraint::Percentage(9),
            Constraint::Percentage(10),
            Constraint::Percentage(10),
            Constraint::Percentage(9),
            Constraint::Percentage(13),
        ],
    )
    .header(Row::new(vec![
        header_cell("Repo", Color::Cyan),
        header_cell("Owner", Color::Cyan),
        header_cell("Stars", Color::Cyan),
        header_cell("Forks", Color::Cyan),
        header_cell("Contribs", Color::Cyan),
        header_cell("Commits", Color::Cyan),
        header_cell("Branches", Color::Cyan),
        header_cell("Language", Color::Cyan),
    ]))
    .block(Block::default().title(title).borders(Borders::ALL));

    f.render_widget(table, area);
}
