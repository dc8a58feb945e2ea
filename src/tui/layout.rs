use ratatui::layout::Rect;

use crate::tui::state::TuiState;

/// Rect covering `percent_x` by `percent_y` of `area`, centred in it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y.min(100)) / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Window of filtered row indices that fits `height`, keeping the
/// selection near the middle. Each entry is `(index, is_selected)`.
pub fn visible_rows(state: &TuiState, height: usize) -> Vec<(usize, bool)> {
    let view_height = height.saturating_sub(4).max(1);
    let filtered = &state.filtered_indices;
    if filtered.is_empty() {
        return Vec::new();
    }

    let selected_in_filtered = filtered
        .iter()
        .position(|&i| i == state.selected)
        .unwrap_or(0);

    let start = selected_in_filtered
        .saturating_sub(view_height / 2)
        .min(filtered.len().saturating_sub(view_height));
    let end = (start + view_height).min(filtered.len());

    filtered[start..end]
        .iter()
        .map(|&i| (i, i == state.selected))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::ViewMode;

    #[test]
    fn window_follows_selection() {
        let mut state = TuiState::new(ViewMode::Repos, 50);
        state.selected = 40;
        let rows = visible_rows(&state, 14);
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().any(|&(i, sel)| i == 40 && sel));
        assert_eq!(rows.first().map(|r| r.0), Some(35));
        assert_eq!(rows.last().map(|r| r.0), Some(44));
    }

    #[test]
    fn popup_is_centred() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_rect(60, 70, area), Rect::new(20, 7, 60, 35));
    }

    #[test]
    fn empty_filter_shows_nothing() {
        let mut state = TuiState::new(ViewMode::Repos, 3);
        state.filtered_indices.clear();
        assert!(visible_rows(&state, 20).is_empty());
    }
}
