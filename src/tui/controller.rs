//! Session controller: drives the screens from the state machine.
//!
//! The controller renders the screen for the current route, translates
//! key presses into submissions, and runs each service call on a spawned
//! task so the interface never blocks. Resolutions come back over a
//! channel and are applied between frames. Every resolution carries the
//! generation it was launched under; a restart bumps the generation, so
//! resolutions from an abandoned run are discarded without effect.

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tracing::{debug, info, instrument, warn};

use crate::api::{Answer, ClientError, ConfirmEnvelope, GameClient, StartGameReply, TurnEnvelope};
use crate::game::{Route, SessionMachine};
use crate::store::SessionStore;
use crate::tui::screen::{Screen, ScreenAction, ViewState};
use crate::tui::screens::{ErrorScreen, HomeScreen, QuestionsScreen, ResultsScreen};

/// Active screen, one per route.
#[derive(Debug)]
enum ActiveScreen {
    Home(HomeScreen),
    Questions(QuestionsScreen),
    Results(ResultsScreen),
    Error(ErrorScreen),
}

/// A resolved service call, delivered back to the event loop.
#[derive(Debug)]
enum SessionEvent {
    StartResolved {
        generation: u64,
        outcome: Result<StartGameReply, ClientError>,
    },
    TurnResolved {
        generation: u64,
        outcome: Result<TurnEnvelope, ClientError>,
    },
    ConfirmationResolved {
        generation: u64,
        confirms_correct: bool,
        outcome: Result<ConfirmEnvelope, ClientError>,
    },
}

impl SessionEvent {
    fn generation(&self) -> u64 {
        match self {
            Self::StartResolved { generation, .. }
            | Self::TurnResolved { generation, .. }
            | Self::ConfirmationResolved { generation, .. } => *generation,
        }
    }
}

/// Controller that drives the session TUI.
///
/// Call [`GameController::run`] to start the event loop.
#[derive(Debug)]
pub struct GameController<S: SessionStore> {
    client: GameClient,
    machine: SessionMachine<S>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    route: Route,
    screen: ActiveScreen,
    generation: u64,
}

impl<S: SessionStore> GameController<S> {
    /// Creates a controller over the given client and machine.
    #[instrument(skip_all)]
    pub fn new(client: GameClient, machine: SessionMachine<S>) -> Self {
        info!("Creating GameController");
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            client,
            machine,
            event_tx,
            event_rx,
            route: Route::Home,
            screen: ActiveScreen::Home(HomeScreen::new()),
            generation: 0,
        }
    }

    /// Runs the session event loop until the player quits.
    ///
    /// Resumes any stored session first, then renders, applies
    /// resolutions, and handles input until a quit action arrives.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting session event loop");

        self.machine.resume();
        self.sync_route();

        loop {
            // Apply any resolutions that landed since the last frame.
            while let Ok(session_event) = self.event_rx.try_recv() {
                self.apply_event(session_event);
            }

            let view = ViewState::new(
                self.machine.phase(),
                self.machine.notice(),
                self.machine.is_waiting(),
            );

            terminal.draw(|f| match &self.screen {
                ActiveScreen::Home(s) => s.render(f, &view),
                ActiveScreen::Questions(s) => s.render(f, &view),
                ActiveScreen::Results(s) => s.render(f, &view),
                ActiveScreen::Error(s) => s.render(f, &view),
            })?;

            // Poll for input with short timeout to keep the loop responsive.
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
            {
                // Skip key release events (crossterm fires both press and release).
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                let action = match &mut self.screen {
                    ActiveScreen::Home(s) => s.handle_key(key, &view),
                    ActiveScreen::Questions(s) => s.handle_key(key, &view),
                    ActiveScreen::Results(s) => s.handle_key(key, &view),
                    ActiveScreen::Error(s) => s.handle_key(key, &view),
                };

                if self.dispatch(action) {
                    info!("Session TUI quitting");
                    return Ok(());
                }
            }

            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Carries out a screen action. Returns `true` to quit.
    #[instrument(skip(self))]
    fn dispatch(&mut self, action: ScreenAction) -> bool {
        debug!(action = ?action, "Dispatching action");
        match action {
            ScreenAction::Stay => {}
            ScreenAction::StartGame => self.launch_start(),
            ScreenAction::SubmitAnswer(answer) => self.launch_answer(answer),
            ScreenAction::ConfirmGuess(confirms) => self.launch_confirmation(confirms),
            ScreenAction::Restart => {
                // Orphan any in-flight submission before clearing state.
                self.generation = self.generation.wrapping_add(1);
                self.machine.restart();
            }
            ScreenAction::Quit => return true,
        }
        self.sync_route();
        false
    }

    /// Spawns a start-game call, if the machine accepts one.
    #[instrument(skip(self))]
    fn launch_start(&mut self) {
        if !self.machine.begin_start() {
            return;
        }
        let client = self.client.clone();
        let tx = self.event_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = client.start_game().await;
            let _ = tx.send(SessionEvent::StartResolved {
                generation,
                outcome,
            });
        });
    }

    /// Spawns an answer submission, if the machine accepts one.
    #[instrument(skip(self), fields(answer = %answer))]
    fn launch_answer(&mut self, answer: Answer) {
        let Some(call) = self.machine.begin_answer(answer) else {
            return;
        };
        let client = self.client.clone();
        let tx = self.event_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = client
                .submit_answer(&call.session_id, &call.attribute_key, call.answer)
                .await;
            let _ = tx.send(SessionEvent::TurnResolved {
                generation,
                outcome,
            });
        });
    }

    /// Spawns a guess confirmation, if the machine accepts one.
    #[instrument(skip(self), fields(confirms = confirms_correct))]
    fn launch_confirmation(&mut self, confirms_correct: bool) {
        let Some(call) = self.machine.begin_confirmation(confirms_correct) else {
            return;
        };
        let client = self.client.clone();
        let tx = self.event_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = client
                .confirm_guess(&call.session_id, &call.guess_name, call.confirms_correct)
                .await;
            let _ = tx.send(SessionEvent::ConfirmationResolved {
                generation,
                confirms_correct,
                outcome,
            });
        });
    }

    /// Feeds a resolved service call into the machine, unless it belongs
    /// to an abandoned run.
    #[instrument(skip(self, session_event))]
    fn apply_event(&mut self, session_event: SessionEvent) {
        if session_event.generation() != self.generation {
            warn!("Discarding resolution from an abandoned run");
            return;
        }
        match session_event {
            SessionEvent::StartResolved { outcome, .. } => {
                self.machine.apply_start(outcome);
            }
            SessionEvent::TurnResolved { outcome, .. } => {
                self.machine.apply_turn(outcome);
            }
            SessionEvent::ConfirmationResolved {
                outcome,
                confirms_correct,
                ..
            } => {
                self.machine.apply_confirmation(outcome, confirms_correct);
            }
        }
        self.sync_route();
    }

    /// Swaps the active screen when the phase projects onto a new route.
    /// Called only after machine transitions, so store effects are
    /// already settled by the time the view changes.
    fn sync_route(&mut self) {
        let next = Route::for_phase(self.machine.phase());
        if next != self.route {
            info!(from = ?self.route, to = ?next, "Navigating");
            self.route = next;
            self.screen = Self::screen_for(next);
        }
    }

    /// Builds a fresh screen for a route.
    fn screen_for(route: Route) -> ActiveScreen {
        match route {
            Route::Home => ActiveScreen::Home(HomeScreen::new()),
            Route::Questions => ActiveScreen::Questions(QuestionsScreen::new()),
            Route::Results => ActiveScreen::Results(ResultsScreen::new()),
            Route::Error => ActiveScreen::Error(ErrorScreen::new()),
        }
    }
}
