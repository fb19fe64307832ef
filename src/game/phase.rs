//! Session phases and the domain types they carry.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::api::{NO_GUESS, TopCandidate};

/// A question the service wants answered.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct Question {
    /// Question text shown to the player.
    text: String,
    /// Service key for the question, echoed back with the answer.
    attribute_key: String,
}

/// A character guess made by the service.
///
/// Serialized as the persisted `guess_data` document, where the name
/// travels under the `guess` field.
#[derive(Debug, Clone, PartialEq, Getters, new, Serialize, Deserialize)]
pub struct Guess {
    /// Guessed character name.
    #[serde(rename = "guess")]
    name: String,
    /// Service confidence, 0.0 to 1.0.
    certainty: f64,
    /// Message the service attached, if any.
    #[serde(default)]
    message: Option<String>,
}

impl Guess {
    /// Whether this is the service's "no guess" sentinel rather than a
    /// real character. Sentinel guesses never enter confirmation.
    pub fn is_no_guess(&self) -> bool {
        self.name.eq_ignore_ascii_case(NO_GUESS)
    }

    /// Returns the guess with its message replaced.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Where a session stands.
///
/// `Confirmed`, `Failed`, and `Error` are terminal: the only way out is
/// a restart. `AwaitingGuess` marks a submission in flight; it keeps the
/// phase it departed from so the player keeps seeing what they were
/// looking at until the service answers.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// No session underway.
    Idle,
    /// A question is on the table.
    Playing {
        /// The question being presented.
        question: Question,
        /// Questions asked so far, including this one.
        questions_asked: u32,
    },
    /// A submission is in flight; further submissions are refused until
    /// it resolves.
    AwaitingGuess {
        /// Phase the submission departed from.
        prior: Box<Phase>,
    },
    /// The service guessed a character and awaits confirmation.
    GuessMade {
        /// The guess on offer.
        guess: Guess,
    },
    /// The player confirmed the guess; the service won.
    Confirmed {
        /// Celebration message from the service.
        message: String,
        /// Ranked candidates at the moment of the win.
        top_candidates: Vec<TopCandidate>,
    },
    /// The service gave up without a correct guess.
    Failed {
        /// Explanation shown to the player.
        message: String,
    },
    /// The session broke: a server-reported game error, local state that
    /// cannot be rehydrated, or a failing store.
    Error {
        /// Explanation shown to the player.
        message: String,
    },
}

impl Phase {
    /// Whether the phase is terminal, exitable only via restart.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Confirmed { .. } | Self::Failed { .. } | Self::Error { .. }
        )
    }

    /// The phase to present: in-flight submissions show the phase they
    /// departed from.
    pub fn presented(&self) -> &Phase {
        match self {
            Self::AwaitingGuess { prior } => prior.presented(),
            other => other,
        }
    }

    /// Short name for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing { .. } => "playing",
            Self::AwaitingGuess { .. } => "awaiting_guess",
            Self::GuessMade { .. } => "guess_made",
            Self::Confirmed { .. } => "confirmed",
            Self::Failed { .. } => "failed",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_data_round_trips_through_wire_field_names() {
        let guess = Guess::new("Grace Hopper".to_string(), 0.97, None);
        let json = serde_json::to_string(&guess).expect("guess should serialize");
        assert!(json.contains("\"guess\":\"Grace Hopper\""));
        let back: Guess = serde_json::from_str(&json).expect("guess should deserialize");
        assert_eq!(back, guess);
    }

    #[test]
    fn test_no_guess_sentinel_is_case_insensitive() {
        assert!(Guess::new("No guess".to_string(), 0.0, None).is_no_guess());
        assert!(Guess::new("NO GUESS".to_string(), 0.0, None).is_no_guess());
        assert!(!Guess::new("Dennis Ritchie".to_string(), 0.5, None).is_no_guess());
    }

    #[test]
    fn test_presented_unwraps_nested_waits() {
        let playing = Phase::Playing {
            question: Question::new("Do they like lisp?".to_string(), "likes_lisp".to_string()),
            questions_asked: 2,
        };
        let waiting = Phase::AwaitingGuess {
            prior: Box::new(playing.clone()),
        };
        assert_eq!(waiting.presented(), &playing);
        assert!(!waiting.is_terminal());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(
            Phase::Confirmed {
                message: "won".to_string(),
                top_candidates: Vec::new(),
            }
            .is_terminal()
        );
        assert!(
            Phase::Failed {
                message: "lost".to_string(),
            }
            .is_terminal()
        );
        assert!(
            Phase::Error {
                message: "broken".to_string(),
            }
            .is_terminal()
        );
        assert!(!Phase::Idle.is_terminal());
    }
}
