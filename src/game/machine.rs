//! Session state machine.
//!
//! Owns the current [`Phase`] and the session store, and is the only
//! place that mutates either. Network calls happen elsewhere: callers
//! ask the machine to begin a submission, receive the request
//! parameters, perform the call, and feed the outcome back through an
//! `apply_*` method. Store effects always land before the new phase is
//! observable, so navigation never outruns persistence.

use tracing::{debug, error, info, instrument, warn};

use crate::api::{
    Answer, ClientError, ConfirmEnvelope, ConfirmReply, NO_GUESS, StartGameReply, TurnEnvelope,
    TurnReply,
};
use crate::game::{Guess, Phase, Question};
use crate::store::{SessionKey, SessionStore, StoreError};

/// Message shown when the service claims a guess but names no character.
const NO_GUESS_MESSAGE: &str = "I couldn't settle on a guess. You win!";

/// Request parameters for an answer submission.
#[derive(Debug, Clone)]
pub struct AnswerCall {
    /// Session the answer belongs to.
    pub session_id: String,
    /// Attribute key of the question being answered, echoed verbatim.
    pub attribute_key: String,
    /// The player's answer.
    pub answer: Answer,
}

/// Request parameters for a guess confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmCall {
    /// Session the confirmation belongs to.
    pub session_id: String,
    /// Name of the guessed character.
    pub guess_name: String,
    /// Whether the player says the guess was right.
    pub confirms_correct: bool,
}

/// The session orchestrator's state machine.
///
/// Generic over the session store so gameplay logic can be exercised
/// against [`MemoryStore`](crate::store::MemoryStore) without touching
/// disk.
#[derive(Debug)]
pub struct SessionMachine<S: SessionStore> {
    store: S,
    phase: Phase,
    session_id: Option<String>,
    notice: Option<String>,
}

impl<S: SessionStore> SessionMachine<S> {
    /// Creates a machine in the [`Phase::Idle`] phase.
    #[instrument(skip_all)]
    pub fn new(store: S) -> Self {
        info!("Creating session machine");
        Self {
            store,
            phase: Phase::Idle,
            session_id: None,
            notice: None,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The live session id, if a session is underway.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// A transient message to surface alongside the current view, set
    /// when a submission fails without changing phase.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether a submission is in flight. While true, further
    /// submissions are refused.
    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, Phase::AwaitingGuess { .. })
    }

    /// Rehydrates a stored session, if one exists.
    ///
    /// With nothing stored at all the machine stays [`Phase::Idle`].
    /// With a partial or malformed set of required keys it degrades to
    /// [`Phase::Error`]: a session it cannot faithfully rebuild is
    /// treated as no session.
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> &Phase {
        if !matches!(self.phase, Phase::Idle) {
            warn!(phase = self.phase.label(), "Resume ignored outside idle");
            return &self.phase;
        }

        let mut values = Vec::with_capacity(SessionKey::required().len());
        for key in SessionKey::required() {
            match self.store.get(*key) {
                Ok(value) => values.push(value),
                Err(e) => {
                    self.degrade(&e);
                    return &self.phase;
                }
            }
        }

        if values.iter().all(Option::is_none) {
            debug!("No stored session to resume");
            return &self.phase;
        }

        let rebuilt = match values.as_slice() {
            [Some(session_id), Some(text), Some(attribute_key), Some(count)] => count
                .parse::<u32>()
                .ok()
                .map(|questions_asked| (session_id.clone(), text.clone(), attribute_key.clone(), questions_asked)),
            _ => None,
        };

        match rebuilt {
            Some((session_id, text, attribute_key, questions_asked)) => {
                info!(session_id = %session_id, questions_asked, "Resumed stored session");
                self.session_id = Some(session_id);
                self.phase = Phase::Playing {
                    question: Question::new(text, attribute_key),
                    questions_asked,
                };
            }
            None => {
                warn!("Stored session is incomplete, treating as no session");
                self.phase = Phase::Error {
                    message: "No active session. Please start a new game.".to_string(),
                };
            }
        }
        &self.phase
    }

    /// Abandons whatever is underway and returns to [`Phase::Idle`],
    /// clearing every stored key. Valid from any phase, including while
    /// a submission is in flight; the late resolution is discarded by
    /// the caller's guards.
    #[instrument(skip(self), fields(phase = self.phase.label()))]
    pub fn restart(&mut self) -> &Phase {
        info!("Restarting session");
        self.session_id = None;
        self.notice = None;
        if let Err(e) = self.store.clear(SessionKey::all()) {
            self.degrade(&e);
            return &self.phase;
        }
        self.phase = Phase::Idle;
        &self.phase
    }

    /// Begins a start-game submission. Accepted only from
    /// [`Phase::Idle`] with nothing in flight.
    #[instrument(skip(self), fields(phase = self.phase.label()))]
    pub fn begin_start(&mut self) -> bool {
        if !matches!(self.phase, Phase::Idle) {
            debug!("Start refused outside idle");
            return false;
        }
        self.notice = None;
        self.enter_waiting();
        true
    }

    /// Begins an answer submission, returning the request parameters.
    /// Accepted only from [`Phase::Playing`] with nothing in flight.
    #[instrument(skip(self), fields(phase = self.phase.label(), answer = %answer))]
    pub fn begin_answer(&mut self, answer: Answer) -> Option<AnswerCall> {
        let Phase::Playing { question, .. } = &self.phase else {
            debug!("Answer refused outside playing");
            return None;
        };
        let Some(session_id) = self.session_id.clone() else {
            warn!("Playing phase without a session id");
            return None;
        };

        let call = AnswerCall {
            session_id,
            attribute_key: question.attribute_key().clone(),
            answer,
        };
        self.notice = None;
        self.enter_waiting();
        Some(call)
    }

    /// Begins a guess confirmation, returning the request parameters.
    /// Accepted only from [`Phase::GuessMade`] with nothing in flight.
    #[instrument(skip(self), fields(phase = self.phase.label(), confirms = confirms_correct))]
    pub fn begin_confirmation(&mut self, confirms_correct: bool) -> Option<ConfirmCall> {
        let Phase::GuessMade { guess } = &self.phase else {
            debug!("Confirmation refused outside guess_made");
            return None;
        };
        let Some(session_id) = self.session_id.clone() else {
            warn!("Guess phase without a session id");
            return None;
        };

        let call = ConfirmCall {
            session_id,
            guess_name: guess.name().clone(),
            confirms_correct,
        };
        self.notice = None;
        self.enter_waiting();
        Some(call)
    }

    /// Applies the outcome of a start-game submission.
    ///
    /// On success the four session keys are persisted and the machine
    /// enters [`Phase::Playing`]. On failure it returns to
    /// [`Phase::Idle`] with the error surfaced as a notice.
    #[instrument(skip_all, fields(ok = outcome.is_ok()))]
    pub fn apply_start(&mut self, outcome: Result<StartGameReply, ClientError>) -> &Phase {
        let Some(prior) = self.take_prior() else {
            return &self.phase;
        };

        match outcome {
            Err(e) => {
                warn!(error = %e, "Start failed");
                self.notice = Some(e.to_string());
                self.phase = *prior;
            }
            Ok(reply) => {
                let question = Question::new(reply.question_text, reply.attribute_key);
                match self.persist_session(&reply.session_id, &question, reply.questions_asked) {
                    Ok(()) => {
                        info!(session_id = %reply.session_id, "Session started");
                        self.session_id = Some(reply.session_id);
                        self.phase = Phase::Playing {
                            question,
                            questions_asked: reply.questions_asked,
                        };
                    }
                    Err(e) => self.degrade(&e),
                }
            }
        }
        &self.phase
    }

    /// Applies the outcome of an answer submission.
    ///
    /// Replies echoing a different session id are discarded without
    /// effect. A transport or protocol failure restores
    /// [`Phase::Playing`] with the error surfaced as a notice, leaving
    /// the store untouched.
    #[instrument(skip_all, fields(ok = outcome.is_ok()))]
    pub fn apply_turn(&mut self, outcome: Result<TurnEnvelope, ClientError>) -> &Phase {
        let Some(prior) = self.take_prior() else {
            return &self.phase;
        };
        let (question, questions_asked) = match *prior {
            Phase::Playing {
                question,
                questions_asked,
            } => (question, questions_asked),
            other => {
                warn!(phase = other.label(), "Turn resolution did not depart from playing");
                self.phase = other;
                return &self.phase;
            }
        };

        match outcome {
            Err(e) => {
                warn!(error = %e, "Answer submission failed");
                self.notice = Some(e.to_string());
                self.phase = Phase::Playing {
                    question,
                    questions_asked,
                };
            }
            Ok(envelope) if !self.session_matches(envelope.session_id.as_deref()) => {
                warn!("Discarding turn reply for a stale session");
                self.phase = Phase::Playing {
                    question,
                    questions_asked,
                };
            }
            Ok(envelope) => {
                match envelope.reply {
                    TurnReply::Playing {
                        question_text,
                        attribute_key,
                        questions_asked,
                    } => {
                        let question = Question::new(question_text, attribute_key);
                        match self.persist_question(&question, questions_asked) {
                            Ok(()) => {
                                debug!(questions_asked, "Next question received");
                                self.phase = Phase::Playing {
                                    question,
                                    questions_asked,
                                };
                            }
                            Err(e) => self.degrade(&e),
                        }
                    }
                    TurnReply::MakeGuess { guess, certainty } => {
                        let guess = Guess::new(
                            guess.unwrap_or_else(|| NO_GUESS.to_string()),
                            certainty,
                            None,
                        );
                        if guess.is_no_guess() {
                            info!("Service has no guess to offer");
                            match self.persist_guess(&guess) {
                                Ok(()) => {
                                    self.phase = Phase::Failed {
                                        message: NO_GUESS_MESSAGE.to_string(),
                                    };
                                }
                                Err(e) => self.degrade(&e),
                            }
                        } else {
                            info!(guess = %guess.name(), certainty, "Service made a guess");
                            match self.persist_guess(&guess) {
                                Ok(()) => self.phase = Phase::GuessMade { guess },
                                Err(e) => self.degrade(&e),
                            }
                        }
                    }
                    TurnReply::Failure {
                        guess,
                        certainty,
                        message,
                    } => {
                        info!("Service gave up");
                        let guess = Guess::new(
                            guess.unwrap_or_else(|| NO_GUESS.to_string()),
                            certainty,
                            Some(message.clone()),
                        );
                        match self.persist_guess(&guess) {
                            Ok(()) => self.phase = Phase::Failed { message },
                            Err(e) => self.degrade(&e),
                        }
                    }
                    TurnReply::Error { message } => {
                        warn!(message = %message, "Service reported a game error");
                        self.phase = Phase::Error { message };
                    }
                }
            }
        }
        &self.phase
    }

    /// Applies the outcome of a guess confirmation.
    ///
    /// A confirmed win clears every stored key before the machine
    /// enters [`Phase::Confirmed`]. A rejection either resumes play,
    /// clearing the stored guess before the new question lands, or ends
    /// the session in [`Phase::Failed`].
    #[instrument(skip_all, fields(ok = outcome.is_ok(), confirms = confirms_correct))]
    pub fn apply_confirmation(
        &mut self,
        outcome: Result<ConfirmEnvelope, ClientError>,
        confirms_correct: bool,
    ) -> &Phase {
        let Some(prior) = self.take_prior() else {
            return &self.phase;
        };
        let guess = match *prior {
            Phase::GuessMade { guess } => guess,
            other => {
                warn!(
                    phase = other.label(),
                    "Confirmation resolution did not depart from guess_made"
                );
                self.phase = other;
                return &self.phase;
            }
        };

        match outcome {
            Err(e) => {
                warn!(error = %e, "Confirmation failed");
                self.notice = Some(e.to_string());
                self.phase = Phase::GuessMade { guess };
            }
            Ok(envelope) if !self.session_matches(envelope.session_id.as_deref()) => {
                warn!("Discarding confirmation reply for a stale session");
                self.phase = Phase::GuessMade { guess };
            }
            Ok(envelope) => {
                match (confirms_correct, envelope.reply) {
                    (_, ConfirmReply::FinishedWon {
                        message,
                        top_candidates,
                    }) => {
                        info!("Session won and confirmed");
                        self.session_id = None;
                        match self.store.clear(SessionKey::all()) {
                            Ok(()) => {
                                self.phase = Phase::Confirmed {
                                    message,
                                    top_candidates,
                                };
                            }
                            Err(e) => self.degrade(&e),
                        }
                    }
                    (false, ConfirmReply::Playing {
                        question_text,
                        attribute_key,
                        questions_asked,
                    }) => {
                        info!("Guess rejected, play resumes");
                        let question = Question::new(question_text, attribute_key);
                        // The rejected guess goes before the next question lands.
                        let wrote = self
                            .store
                            .clear(&[SessionKey::GuessData])
                            .and_then(|()| self.persist_question(&question, questions_asked));
                        match wrote {
                            Ok(()) => {
                                self.phase = Phase::Playing {
                                    question,
                                    questions_asked,
                                };
                            }
                            Err(e) => self.degrade(&e),
                        }
                    }
                    (false, ConfirmReply::Failure { message, .. }) => {
                        info!("Guess rejected, service is out of candidates");
                        self.session_id = None;
                        match self
                            .store
                            .clear(&[SessionKey::SessionId, SessionKey::GuessData])
                        {
                            Ok(()) => self.phase = Phase::Failed { message },
                            Err(e) => self.degrade(&e),
                        }
                    }
                    (true, ConfirmReply::Playing { .. }) => {
                        warn!("Service kept playing despite a confirmed guess");
                        self.notice =
                            Some("The service did not register the win.".to_string());
                        self.phase = Phase::GuessMade { guess };
                    }
                    (true, ConfirmReply::Failure { message, .. }) => {
                        warn!(message = %message, "Service failed despite a confirmed guess");
                        self.phase = Phase::GuessMade {
                            guess: guess.with_message(message),
                        };
                    }
                }
            }
        }
        &self.phase
    }

    /// Wraps the current phase into an in-flight marker.
    fn enter_waiting(&mut self) {
        let prior = std::mem::replace(&mut self.phase, Phase::Idle);
        self.phase = Phase::AwaitingGuess {
            prior: Box::new(prior),
        };
    }

    /// Unwraps the in-flight marker, or logs and leaves the phase alone
    /// when no submission was underway.
    fn take_prior(&mut self) -> Option<Box<Phase>> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::AwaitingGuess { prior } => Some(prior),
            other => {
                warn!(phase = other.label(), "Resolution arrived with nothing in flight");
                self.phase = other;
                None
            }
        }
    }

    /// Whether a reply's session echo matches the live session. Replies
    /// without an echo are accepted.
    fn session_matches(&self, reply_session: Option<&str>) -> bool {
        match (reply_session, self.session_id.as_deref()) {
            (Some(theirs), Some(ours)) => theirs == ours,
            (None, _) => true,
            (Some(_), None) => false,
        }
    }

    /// Persists a full session: id first, then the question triple.
    fn persist_session(
        &self,
        session_id: &str,
        question: &Question,
        questions_asked: u32,
    ) -> Result<(), StoreError> {
        self.store.put(SessionKey::SessionId, session_id)?;
        self.persist_question(question, questions_asked)
    }

    /// Persists the question triple in its fixed order: text, attribute
    /// key, count.
    fn persist_question(&self, question: &Question, questions_asked: u32) -> Result<(), StoreError> {
        self.store.put(SessionKey::QuestionText, question.text())?;
        self.store
            .put(SessionKey::AttributeKey, question.attribute_key())?;
        self.store
            .put(SessionKey::QuestionsAsked, &questions_asked.to_string())
    }

    /// Persists the guess document.
    fn persist_guess(&self, guess: &Guess) -> Result<(), StoreError> {
        let json = serde_json::to_string(guess)?;
        self.store.put(SessionKey::GuessData, &json)
    }

    /// Drops into the error phase after a store failure.
    fn degrade(&mut self, err: &StoreError) {
        error!(error = %err, "Session store failed");
        self.phase = Phase::Error {
            message: format!("Session storage failed: {}", err.message),
        };
    }
}
