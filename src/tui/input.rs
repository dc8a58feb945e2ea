use super::TuiState;
use crate::model::RepoStatsRecord;

pub fn apply_search_filter(records: &[RepoStatsRecord], state: &mut TuiState) {
    if state.search_query.is_empty() {
        state.filtered_indices = (0..records.len()).collect();
    } else {
        let query = state.search_query.to_lowercase();
        state.filtered_indices = records
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                r.repo_name.to_lowercase().contains(&query)
                    || r.repo_owner.to_lowercase().contains(&query)
                    || r
                        .language
                        .as_deref()
                        .is_some_and(|l| l.to_lowercase().contains(&query))
            })
            .map(|(i, _)| i)
            .collect();
    }

    ensure_selection_in_filtered(state);
}

pub fn ensure_selection_in_filtered(state: &mut TuiState) {
    if state.filtered_indices.is_empty() {
        return;
    }

    if !state.filtered_indices.contains(&state.selected) {
        state.selected = state.filtered_indices[0];
    }
}

/// Move the selection `delta` steps through the filtered rows.
pub fn move_selection(state: &mut TuiState, delta: isize) {
    let filtered = &state.filtered_indices;
    if filtered.is_empty() {
        return;
    }
    let pos = filtered.iter().position(|&i| i == state.selected).unwrap_or(0) as isize;
    let target = (pos + delta).clamp(0, filtered.len() as isize - 1) as usize;
    state.selected = filtered[target];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::ViewMode;

    fn records() -> Vec<RepoStatsRecord> {
        vec![
            RepoStatsRecord::new("ucl", "dashboard").with_language(Some("Python".into())),
            RepoStatsRecord::new("octo", "kpi").with_language(Some("Rust".into())),
            RepoStatsRecord::new("ucl", "website"),
        ]
    }

    #[test]
    fn filter_matches_name_owner_language() {
        let records = records();
        let mut state = TuiState::new(ViewMode::Repos, records.len());
        state.search_query = "rust".into();
        apply_search_filter(&records, &mut state);
        assert_eq!(state.filtered_indices, vec![1]);
        assert_eq!(state.selected, 1);

        state.search_query = "UCL".into();
        apply_search_filter(&records, &mut state);
        assert_eq!(state.filtered_indices, vec![0, 2]);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn selection_moves_within_filter() {
        let records = records();
        let mut state = TuiState::new(ViewMode::Repos, records.len());
        state.search_query = "ucl".into();
        apply_search_filter(&records, &mut state);
        move_selection(&mut state, 1);
        assert_eq!(state.selected, 2);
        move_selection(&mut state, 10);
        assert_eq!(state.selected, 2);
        move_selection(&mut state, -10);
        assert_eq!(state.selected, 0);
    }
}
