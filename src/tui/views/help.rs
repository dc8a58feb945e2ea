use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::centered_rect;

const KEYS: &[(&str, &[(&str, &str)])] = &[
    (
        "Selection",
        &[
            ("j/k, ↑/↓", "previous / next repository"),
            ("PgUp/PgDn", "jump 10 repositories"),
            ("g/G", "first / last repository"),
        ],
    ),
    (
        "Charts",
        &[
            ("Tab", "cycle Scatter, Activity, Repos"),
            ("Shift+Tab", "cycle backwards"),
        ],
    ),
    (
        "Filter",
        &[
            ("/", "match name, owner or language"),
            ("Enter", "keep the filter"),
            ("Esc", "drop the filter"),
        ],
    ),
    ("Other", &[("h, F1", "toggle this overlay"), ("q", "quit")]),
];

pub fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let heading = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Cyan);

    let mut lines = Vec::new();
    for (group, bindings) in KEYS {
        lines.push(Line::from(Span::styled(*group, heading)));
        for (key, action) in bindings.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<12}"), key_style),
                Span::raw(*action),
            ]));
        }
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(
        "h or Esc closes",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" repokpi keys ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup);
}
