//! Question-and-answer screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{debug, info, instrument};

use crate::api::Answer;
use crate::game::Phase;
use crate::tui::screen::{Screen, ScreenAction, ViewState};

/// Presents the current question and the four answers.
#[derive(Debug)]
pub struct QuestionsScreen {
    list_state: ListState,
}

impl QuestionsScreen {
    /// Creates the question screen with the first answer selected.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing QuestionsScreen");
        let mut state = ListState::default();
        state.select(Some(0));
        Self { list_state: state }
    }

    /// Moves selection up.
    fn select_previous(&mut self) {
        let count = Answer::all().len();
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => count - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Moves selection down.
    fn select_next(&mut self) {
        let count = Answer::all().len();
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Returns the currently selected answer.
    fn selected_answer(&self) -> Answer {
        let answers = Answer::all();
        let idx = self.list_state.selected().unwrap_or(0);
        answers[idx.min(answers.len() - 1)]
    }
}

impl Default for QuestionsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for QuestionsScreen {
    #[instrument(skip(self, frame, view))]
    fn render(&self, frame: &mut Frame, view: &ViewState) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(6),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let (question_text, questions_asked) = match view.phase.presented() {
            Phase::Playing {
                question,
                questions_asked,
            } => (question.text().clone(), *questions_asked),
            _ => (String::new(), 0),
        };

        let title = Paragraph::new(format!("Question {}", questions_asked))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let question = Paragraph::new(question_text)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Question"));
        frame.render_widget(question, chunks[1]);

        let items: Vec<ListItem> = Answer::all()
            .iter()
            .map(|answer| ListItem::new(answer.as_str()))
            .collect();
        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Your answer"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = self.list_state.clone();
        frame.render_stateful_widget(menu, chunks[2], &mut list_state);

        let status = if view.waiting {
            Paragraph::new("Submitting answer...").style(Style::default().fg(Color::Yellow))
        } else if let Some(notice) = view.notice {
            Paragraph::new(notice.to_string()).style(Style::default().fg(Color::Red))
        } else {
            Paragraph::new("")
        };
        frame.render_widget(status.alignment(Alignment::Center), chunks[3]);

        let help = Paragraph::new("↑↓: Navigate | Enter: Answer | r: Restart | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, view))]
    fn handle_key(&mut self, key: KeyEvent, view: &ViewState) -> ScreenAction {
        match key.code {
            KeyCode::Up => {
                self.select_previous();
                ScreenAction::Stay
            }
            KeyCode::Down => {
                self.select_next();
                ScreenAction::Stay
            }
            KeyCode::Enter if !view.waiting => {
                let answer = self.selected_answer();
                info!(answer = %answer, "Answer selected");
                ScreenAction::SubmitAnswer(answer)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => ScreenAction::Restart,
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenAction::Quit,
            _ => ScreenAction::Stay,
        }
    }
}
