use crate::model::CommitTier;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Parse `#RRGGBB` into a terminal colour.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Color::White;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::White,
    }
}

pub fn tier_style(tier: CommitTier) -> Style {
    let style = Style::default().fg(hex_color(tier.color()));
    if tier == CommitTier::Highest {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// Three evenly spaced axis labels from 0 to `max`.
pub fn axis_labels(max: f64) -> Vec<Span<'static>> {
    [0.0, max / 2.0, max]
        .iter()
        .map(|v| Span::raw(format!("{v:.0}")))
        .collect()
}

/// Upper axis bound with a little headroom, never zero.
pub fn axis_max(max: f64) -> f64 {
    if max <= 0.0 {
        1.0
    } else {
        max * 1.05
    }
}
