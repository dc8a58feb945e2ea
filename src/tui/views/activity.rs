use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use super::super::{
    draw::{axis_labels, axis_max},
    state::{ChartData, TuiState},
};

const PALETTE: [Color; 6] = [
    Color::Magenta,
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

/// Running totals of `series`, so each line sits on top of the ones before.
pub(crate) fn stack(series: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut stacked: Vec<Vec<f64>> = Vec::with_capacity(series.len());
    for values in series {
        let below = stacked.last();
        let len = values.len().max(below.map_or(0, |b| b.len()));
        let layer: Vec<f64> = (0..len)
            .map(|i| {
                values.get(i).copied().unwrap_or(0.0)
                    + below.and_then(|b| b.get(i)).copied().unwrap_or(0.0)
            })
            .collect();
        stacked.push(layer);
    }
    stacked
}

/// Render weekly commit activity as stacked lines, oldest week on the left.
pub fn draw_activity_view(f: &mut Frame, area: Rect, data: &ChartData, _state: &TuiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let activity = &data.activity;
    let raw: Vec<Vec<f64>> = activity.series.iter().map(|s| s.values.clone()).collect();
    let layers: Vec<Vec<(f64, f64)>> = stack(&raw)
        .into_iter()
        .map(|layer| {
            layer
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i as f64, v))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = activity
        .series
        .iter()
        .zip(layers.iter())
        .enumerate()
        .rev()
        .map(|(i, (series, points))| {
            Dataset::default()
                .name(series.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                .data(points)
        })
        .collect();

    let x_max = axis_max(layers.iter().map(|l| l.len() as f64).fold(0.0, f64::max));
    let y_max = axis_max(
        layers
            .iter()
            .flat_map(|l| l.iter().map(|p| p.1))
            .fold(0.0, f64::max),
    );

    let chart = Chart::new(datasets)
        .block(Block::default().title(activity.title.clone()).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title(activity.x_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(axis_labels(x_max)),
        )
        .y_axis(
            Axis::default()
                .title(activity.y_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(axis_labels(y_max)),
        );
    f.render_widget(chart, chunks[0]);

    let summary = Paragraph::new(activity.summary())
        .block(Block::default().title("Summary").borders(Borders::ALL));
    f.render_widget(summary, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::stack;

    #[test]
    fn stacks_uneven_series() {
        let stacked = stack(&[vec![1.0, 2.0], vec![1.0, 1.0, 1.0]]);
        assert_eq!(stacked, vec![vec![1.0, 2.0], vec![2.0, 3.0, 1.0]]);
    }
}
