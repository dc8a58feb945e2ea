use crate::model::{ActivityOutput, RepoStatsRecord, ScatterOutput};

pub struct ChartData {
    pub records: Vec<RepoStatsRecord>,
    pub scatter: ScatterOutput,
    pub activity: ActivityOutput,
}

pub struct TuiState {
    pub selected: usize,
    pub view_mode: ViewMode,
    pub show_help: bool,
    pub search_query: String,
    pub search_mode: bool,
    pub filtered_indices: Vec<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Scatter,
    Activity,
    Repos,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Scatter, ViewMode::Activity, ViewMode::Repos];

    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::Scatter => "Scatter",
            ViewMode::Activity => "Activity",
            ViewMode::Repos => "Repos",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|m| m == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl TuiState {
    pub fn new(view_mode: ViewMode, len: usize) -> Self {
        Self {
            selected: 0,
            view_mode,
            show_help: false,
            search_query: String::new(),
            search_mode: false,
            filtered_indices: (0..len).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_modes_cycle() {
        assert_eq!(ViewMode::Scatter.next(), ViewMode::Activity);
        assert_eq!(ViewMode::Repos.next(), ViewMode::Scatter);
        assert_eq!(ViewMode::Scatter.previous(), ViewMode::Repos);
    }
}
