//! Guess confirmation and end-of-game screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{debug, info, instrument};

use crate::game::Phase;
use crate::tui::screen::{Screen, ScreenAction, ViewState};

/// Shows the service's guess, the win summary, or the failure notice,
/// with the choices each allows.
#[derive(Debug)]
pub struct ResultsScreen {
    list_state: ListState,
}

impl ResultsScreen {
    /// Creates the results screen with the first choice selected.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing ResultsScreen");
        let mut state = ListState::default();
        state.select(Some(0));
        Self { list_state: state }
    }

    /// The choices available for the presented phase.
    fn choices(phase: &Phase) -> &'static [&'static str] {
        match phase {
            Phase::GuessMade { .. } => &["Yes, that's right!", "No, that's wrong"],
            _ => &["Play again", "Quit"],
        }
    }

    /// Moves selection up.
    fn select_previous(&mut self, count: usize) {
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => count - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Moves selection down.
    fn select_next(&mut self, count: usize) {
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Returns the selected choice index, clamped to the menu.
    fn selected_index(&self, count: usize) -> usize {
        self.list_state.selected().unwrap_or(0).min(count - 1)
    }

    /// Body lines for the presented phase.
    fn body_lines(phase: &Phase) -> Vec<Line<'static>> {
        match phase {
            Phase::GuessMade { guess } => {
                let mut lines = vec![
                    Line::from(""),
                    Line::from("Are you thinking of..."),
                    Line::styled(
                        guess.name().clone(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Line::from(format!("Certainty: {:.0}%", guess.certainty() * 100.0)),
                ];
                if let Some(message) = guess.message() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(message.clone()));
                }
                lines
            }
            Phase::Confirmed {
                message,
                top_candidates,
            } => {
                let mut lines = vec![
                    Line::from(""),
                    Line::styled(
                        message.clone(),
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                ];
                if !top_candidates.is_empty() {
                    lines.push(Line::from(""));
                    lines.push(Line::from("Final candidates:"));
                    for (name, probability) in top_candidates.iter().take(5) {
                        lines.push(Line::from(format!(
                            "{}  ({:.1}%)",
                            name,
                            probability * 100.0
                        )));
                    }
                }
                lines
            }
            Phase::Failed { message } => vec![
                Line::from(""),
                Line::styled(
                    "You win!".to_string(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::from(""),
                Line::from(message.clone()),
            ],
            _ => vec![Line::from("")],
        }
    }

    /// Title for the presented phase.
    fn title(phase: &Phase) -> &'static str {
        match phase {
            Phase::GuessMade { .. } => "I have a guess!",
            Phase::Confirmed { .. } => "Got it!",
            Phase::Failed { .. } => "I give up",
            _ => "Results",
        }
    }
}

impl Default for ResultsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for ResultsScreen {
    #[instrument(skip(self, frame, view))]
    fn render(&self, frame: &mut Frame, view: &ViewState) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let presented = view.phase.presented();

        let title = Paragraph::new(Self::title(presented))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let body = Paragraph::new(Self::body_lines(presented))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(body, chunks[1]);

        let items: Vec<ListItem> = Self::choices(presented)
            .iter()
            .map(|choice| ListItem::new(*choice))
            .collect();
        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = self.list_state.clone();
        frame.render_stateful_widget(menu, chunks[2], &mut list_state);

        let status = if view.waiting {
            Paragraph::new("Checking with the service...").style(Style::default().fg(Color::Yellow))
        } else if let Some(notice) = view.notice {
            Paragraph::new(notice.to_string()).style(Style::default().fg(Color::Red))
        } else {
            Paragraph::new("")
        };
        frame.render_widget(status.alignment(Alignment::Center), chunks[3]);

        let help = Paragraph::new("↑↓: Navigate | Enter: Select | r: Restart | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, view))]
    fn handle_key(&mut self, key: KeyEvent, view: &ViewState) -> ScreenAction {
        let presented = view.phase.presented();
        let count = Self::choices(presented).len();
        match key.code {
            KeyCode::Up => {
                self.select_previous(count);
                ScreenAction::Stay
            }
            KeyCode::Down => {
                self.select_next(count);
                ScreenAction::Stay
            }
            KeyCode::Enter if !view.waiting => {
                let index = self.selected_index(count);
                info!(index, phase = presented.label(), "Choice selected");
                match presented {
                    Phase::GuessMade { .. } => ScreenAction::ConfirmGuess(index == 0),
                    _ if index == 0 => ScreenAction::Restart,
                    _ => ScreenAction::Quit,
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => ScreenAction::Restart,
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenAction::Quit,
            _ => ScreenAction::Stay,
        }
    }
}
