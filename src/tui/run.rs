use std::io;
use crossterm::terminal::{enable_raw_mode, disable_raw_mode};
use crossterm::event::{poll, read, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Tabs};
use crate::model::{ActivityOutput, RepoStatsRecord, ScatterOutput};
use tracing::warn;
use super::state::{ChartData, TuiState, ViewMode};
use super::input::{apply_search_filter, move_selection};
use super::views::{draw_activity_view, draw_help_overlay, draw_repos_view, draw_scatter_view};

pub fn run(
    records: Vec<RepoStatsRecord>,
    scatter: ScatterOutput,
    activity: ActivityOutput,
    view_mode: ViewMode,
) -> io::Result<()> {
    let data = ChartData { records, scatter, activity };
    let mut state = TuiState::new(view_mode, data.records.len());

    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &data, &mut state);

    terminal.clear()?;
    disable_raw_mode()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    data: &ChartData,
    state: &mut TuiState,
) -> io::Result<()> {
    let records = &data.records;

    loop {
        let draw_result = terminal.draw(|f| {
            let size = f.size();

            if state.show_help {
                draw_help_overlay(f, size);
                return;
            }

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(size);

            let titles: Vec<&str> = ViewMode::ALL.iter().map(|m| m.title()).collect();
            let tabs = Tabs::new(titles)
                .block(Block::default().borders(Borders::ALL).title("View Mode"))
                .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .select(state.view_mode.index());
            f.render_widget(tabs, chunks[0]);

            match state.view_mode {
                ViewMode::Scatter => draw_scatter_view(f, chunks[1], data, state),
                ViewMode::Activity => draw_activity_view(f, chunks[1], data, state),
                ViewMode::Repos => draw_repos_view(f, chunks[1], data, state),
            }
        });

        if let Err(e) = draw_result {
            warn!(error = %e, "frame draw failed");
        }

        if !poll(std::time::Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key_event) = read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        if state.search_mode {
            match key_event.code {
                KeyCode::Esc => {
                    state.search_mode = false;
                    state.search_query.clear();
                    apply_search_filter(records, state);
                }
                KeyCode::Enter => {
                    state.search_mode = false;
                    apply_search_filter(records, state);
                }
                KeyCode::Backspace => {
                    state.search_query.pop();
                    apply_search_filter(records, state);
                }
                KeyCode::Char(c) => {
                    state.search_query.push(c);
                    apply_search_filter(records, state);
                }
                _ => {}
            }
            continue;
        }

        match key_event.code {
            KeyCode::Char('q') => break,
            KeyCode::Esc if state.show_help => state.show_help = false,
            KeyCode::Char('h') | KeyCode::F(1) => state.show_help = !state.show_help,
            KeyCode::Char('/') => {
                state.search_mode = true;
                state.search_query.clear();
            }
            KeyCode::Tab => state.view_mode = state.view_mode.next(),
            KeyCode::BackTab => state.view_mode = state.view_mode.previous(),
            KeyCode::Up | KeyCode::Char('k') => move_selection(state, -1),
            KeyCode::Down | KeyCode::Char('j') => move_selection(state, 1),
            KeyCode::PageUp => move_selection(state, -10),
            KeyCode::PageDown => move_selection(state, 10),
            KeyCode::Home | KeyCode::Char('g') => move_selection(state, isize::MIN / 2),
            KeyCode::End | KeyCode::Char('G') => move_selection(state, isize::MAX / 2),
            _ => {}
        }
    }

    Ok(())
}
