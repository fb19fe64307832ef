//! Screen trait and action type for the session TUI.

use crossterm::event::KeyEvent;
use derive_new::new;
use ratatui::Frame;

use crate::api::Answer;
use crate::game::Phase;

/// What the player asked for on the current screen.
///
/// Screens return this from [`Screen::handle_key`]; the controller turns
/// it into machine transitions and service calls. Navigation itself is
/// never requested here, it follows from the phase.
#[derive(Debug, Clone)]
pub enum ScreenAction {
    /// Stay put, nothing requested.
    Stay,
    /// Start a new game session.
    StartGame,
    /// Answer the current question.
    SubmitAnswer(Answer),
    /// Tell the service whether its guess was right.
    ConfirmGuess(bool),
    /// Abandon the session and return to the start screen.
    Restart,
    /// Exit the application cleanly.
    Quit,
}

/// Read-only view of the session handed to screens each frame.
#[derive(Debug, Clone, Copy, new)]
pub struct ViewState<'a> {
    /// Current phase. Screens render [`Phase::presented`] so an
    /// in-flight submission keeps showing what it departed from.
    pub phase: &'a Phase,
    /// Transient message from the last failed submission, if any.
    pub notice: Option<&'a str>,
    /// Whether a submission is in flight. Screens disable their
    /// affordances while true.
    pub waiting: bool,
}

/// Trait implemented by each screen in the session TUI.
///
/// Screens own their own cursor state, render from the shared
/// [`ViewState`], and translate keys into [`ScreenAction`]s.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame, view: &ViewState);

    /// Handles a key event and returns the resulting [`ScreenAction`].
    fn handle_key(&mut self, key: KeyEvent, view: &ViewState) -> ScreenAction;
}
