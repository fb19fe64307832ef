//! Start screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::tui::screen::{Screen, ScreenAction, ViewState};

/// The idle start screen: one affordance, starting a game.
#[derive(Debug, Default)]
pub struct HomeScreen;

impl HomeScreen {
    /// Creates the start screen.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing HomeScreen");
        Self
    }
}

impl Screen for HomeScreen {
    #[instrument(skip(self, frame, view))]
    fn render(&self, frame: &mut Frame, view: &ViewState) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("WHO DAT DEV?")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let mut lines = vec![
            Line::from(""),
            Line::from("Think of a famous developer."),
            Line::from("I'll ask yes/no questions and guess who it is."),
            Line::from(""),
        ];
        if view.waiting {
            lines.push(Line::styled(
                "Contacting the service...",
                Style::default().fg(Color::Yellow),
            ));
        } else {
            lines.push(Line::styled(
                "Press Enter to start.",
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(notice) = view.notice {
            lines.push(Line::from(""));
            lines.push(Line::styled(
                notice.to_string(),
                Style::default().fg(Color::Red),
            ));
        }
        let body = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(body, chunks[1]);

        let help = Paragraph::new("Enter: Start | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key, view))]
    fn handle_key(&mut self, key: KeyEvent, view: &ViewState) -> ScreenAction {
        match key.code {
            KeyCode::Enter if !view.waiting => {
                info!("Start requested");
                ScreenAction::StartGame
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenAction::Quit,
            _ => ScreenAction::Stay,
        }
    }
}
