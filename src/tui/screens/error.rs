//! Degraded-session screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracing::{debug, info, instrument};

use crate::game::Phase;
use crate::tui::screen::{Screen, ScreenAction, ViewState};

/// Shown when the session cannot continue: a server-reported game error
/// or local state that cannot be rehydrated. The only way out is a
/// restart.
#[derive(Debug, Default)]
pub struct ErrorScreen;

impl ErrorScreen {
    /// Creates the error screen.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing ErrorScreen");
        Self
    }
}

impl Screen for ErrorScreen {
    #[instrument(skip(self, frame, view))]
    fn render(&self, frame: &mut Frame, view: &ViewState) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Something went wrong")
            .style(
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let message = match view.phase.presented() {
            Phase::Error { message } => message.clone(),
            _ => String::new(),
        };
        let body = Paragraph::new(vec![
            Line::from(""),
            Line::from(message),
            Line::from(""),
            Line::styled(
                "Press Enter to return to the start screen.",
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(body, chunks[1]);

        let help = Paragraph::new("Enter: Start over | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key, _view))]
    fn handle_key(&mut self, key: KeyEvent, _view: &ViewState) -> ScreenAction {
        match key.code {
            KeyCode::Enter => {
                info!("Restart requested from error screen");
                ScreenAction::Restart
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenAction::Quit,
            _ => ScreenAction::Stay,
        }
    }
}
