//! Wire types for the guessing game service.
//!
//! The service speaks JSON over three POST endpoints. Every reply carries
//! a `status` field that selects the shape of the rest of the body, which
//! maps cleanly onto internally tagged enums here. Unknown status values
//! fail deserialization and surface as protocol errors.

use serde::Deserialize;

use crate::api::ClientError;

/// Name the service uses when it has no character to offer.
///
/// Compared case-insensitively; a JSON `null` guess is normalized to this
/// sentinel as well. A sentinel guess never reaches the confirmation
/// flow.
pub const NO_GUESS: &str = "No guess";

/// A player's answer to a yes/no question.
///
/// The wire strings are the service's vocabulary and are sent verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    /// Definitely yes.
    Yes,
    /// Definitely no.
    No,
    /// Leaning yes.
    ProbablyYes,
    /// Leaning no.
    ProbablyNo,
}

impl Answer {
    /// Returns the wire string for this answer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::ProbablyYes => "Probably Yes",
            Self::ProbablyNo => "Probably No",
        }
    }

    /// All answers, in presentation order.
    pub fn all() -> &'static [Answer] {
        &[Self::Yes, Self::ProbablyYes, Self::ProbablyNo, Self::No]
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate character with its posterior probability, as reported in
/// the win summary.
pub type TopCandidate = (String, f64);

/// Successful reply to `POST /start_game`.
#[derive(Debug, Clone, PartialEq)]
pub struct StartGameReply {
    /// Identifier for the newly created session.
    pub session_id: String,
    /// First question to present.
    pub question_text: String,
    /// Service key for the first question, echoed back with the answer.
    pub attribute_key: String,
    /// Questions asked so far, including the one presented.
    pub questions_asked: u32,
}

/// Raw `POST /start_game` body before validation.
///
/// The endpoint reports setup failures in-band with `status: "error"`,
/// so every field is optional until [`into_reply`](Self::into_reply)
/// sorts the cases out.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawStartReply {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    question_text: Option<String>,
    #[serde(default)]
    attribute_key: Option<String>,
    #[serde(default)]
    questions_asked: Option<u32>,
    #[serde(default)]
    message: Option<String>,
}

impl RawStartReply {
    /// Validates the raw body into a [`StartGameReply`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Protocol`] when the service reported an
    /// error status or the body lacks a required field.
    pub(crate) fn into_reply(self) -> Result<StartGameReply, ClientError> {
        if self.status.as_deref() == Some("error") {
            let message = self
                .message
                .unwrap_or_else(|| "Service failed to start a game".to_string());
            return Err(ClientError::protocol(message));
        }
        match (
            self.status.as_deref(),
            self.session_id,
            self.question_text,
            self.attribute_key,
            self.questions_asked,
        ) {
            (Some("playing"), Some(session_id), Some(question_text), Some(attribute_key), Some(questions_asked)) => {
                Ok(StartGameReply {
                    session_id,
                    question_text,
                    attribute_key,
                    questions_asked,
                })
            }
            (status, ..) => Err(ClientError::protocol(format!(
                "Start reply missing required fields (status {:?})",
                status
            ))),
        }
    }
}

/// Reply to `POST /questions`, selected by `status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnReply {
    /// The service has another question.
    Playing {
        /// Next question to present.
        question_text: String,
        /// Service key for the next question.
        attribute_key: String,
        /// Updated question count.
        questions_asked: u32,
    },
    /// The service is confident enough to guess.
    MakeGuess {
        /// Guessed character name; `null` means the service gave up.
        guess: Option<String>,
        /// Confidence in the guess, 0.0 to 1.0.
        certainty: f64,
    },
    /// The service has given up on this session.
    Failure {
        /// Best remaining candidate, if any.
        #[serde(default)]
        guess: Option<String>,
        /// Confidence in that candidate.
        #[serde(default)]
        certainty: f64,
        /// Human-readable explanation.
        message: String,
    },
    /// The session hit a server-side error but the reply is well-formed.
    Error {
        /// Human-readable explanation.
        message: String,
    },
}

/// Full `POST /questions` body: the status-typed payload plus the session
/// echo used to discard stale resolutions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TurnEnvelope {
    /// Session the reply belongs to, when the service echoes it.
    #[serde(default)]
    pub session_id: Option<String>,
    /// The status-selected payload.
    #[serde(flatten)]
    pub reply: TurnReply,
}

/// Reply to `POST /confirm_guess`, selected by `status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfirmReply {
    /// The player confirmed the guess; the session is over and won.
    FinishedWon {
        /// Celebration message from the service.
        message: String,
        /// Ranked candidates at the moment of the win.
        #[serde(default)]
        top_candidates: Vec<TopCandidate>,
    },
    /// The player rejected the guess and the service resumed questioning.
    Playing {
        /// Next question to present.
        question_text: String,
        /// Service key for the next question.
        attribute_key: String,
        /// Updated question count.
        questions_asked: u32,
    },
    /// The player rejected the guess and the service has nothing left.
    Failure {
        /// Best remaining candidate, if any.
        #[serde(default)]
        guess: Option<String>,
        /// Confidence in that candidate.
        #[serde(default)]
        certainty: f64,
        /// Human-readable explanation.
        message: String,
    },
}

/// Full `POST /confirm_guess` body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfirmEnvelope {
    /// Session the reply belongs to, when the service echoes it.
    #[serde(default)]
    pub session_id: Option<String>,
    /// The status-selected payload.
    #[serde(flatten)]
    pub reply: ConfirmReply,
}

/// Body of the welcome endpoint, used by connectivity checks.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WelcomeReply {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// Error body the service attaches to non-success HTTP statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_playing_parses() {
        let body = r#"{
            "session_id": "s1",
            "status": "playing",
            "question_text": "Do they write Rust?",
            "attribute_key": "writes_rust",
            "questions_asked": 3
        }"#;
        let envelope: TurnEnvelope = serde_json::from_str(body).expect("playing should parse");
        assert_eq!(envelope.session_id.as_deref(), Some("s1"));
        assert_eq!(
            envelope.reply,
            TurnReply::Playing {
                question_text: "Do they write Rust?".to_string(),
                attribute_key: "writes_rust".to_string(),
                questions_asked: 3,
            }
        );
    }

    #[test]
    fn test_turn_make_guess_null_guess_parses() {
        let body = r#"{"session_id": "s1", "status": "make_guess", "guess": null, "certainty": 0.42}"#;
        let envelope: TurnEnvelope = serde_json::from_str(body).expect("make_guess should parse");
        assert_eq!(
            envelope.reply,
            TurnReply::MakeGuess {
                guess: None,
                certainty: 0.42,
            }
        );
    }

    #[test]
    fn test_turn_failure_defaults_optional_fields() {
        let body = r#"{"session_id": "s1", "status": "failure", "message": "You beat me!"}"#;
        let envelope: TurnEnvelope = serde_json::from_str(body).expect("failure should parse");
        assert_eq!(
            envelope.reply,
            TurnReply::Failure {
                guess: None,
                certainty: 0.0,
                message: "You beat me!".to_string(),
            }
        );
    }

    #[test]
    fn test_turn_unknown_status_is_rejected() {
        let body = r#"{"session_id": "s1", "status": "meditating"}"#;
        let result = serde_json::from_str::<TurnEnvelope>(body);
        assert!(result.is_err());
    }

    #[test]
    fn test_confirm_won_parses_top_candidates() {
        let body = r#"{
            "session_id": "s1",
            "status": "finished_won",
            "message": "Great! I knew it!",
            "guess": "Grace Hopper",
            "certainty": 0.97,
            "top_candidates": [["Grace Hopper", 0.97], ["Ada Lovelace", 0.02]]
        }"#;
        let envelope: ConfirmEnvelope = serde_json::from_str(body).expect("won should parse");
        match envelope.reply {
            ConfirmReply::FinishedWon {
                message,
                top_candidates,
            } => {
                assert_eq!(message, "Great! I knew it!");
                assert_eq!(top_candidates.len(), 2);
                assert_eq!(top_candidates[0].0, "Grace Hopper");
            }
            other => panic!("expected finished_won, got {other:?}"),
        }
    }

    #[test]
    fn test_start_reply_validates_playing() {
        let body = r#"{
            "session_id": "s1",
            "status": "playing",
            "question_text": "Do they use Vim?",
            "attribute_key": "uses_vim",
            "questions_asked": 1
        }"#;
        let raw: RawStartReply = serde_json::from_str(body).expect("raw should parse");
        let reply = raw.into_reply().expect("validation should succeed");
        assert_eq!(reply.session_id, "s1");
        assert_eq!(reply.questions_asked, 1);
    }

    #[test]
    fn test_start_reply_error_status_carries_message() {
        let body = r#"{"session_id": "s1", "status": "error", "message": "No characters loaded"}"#;
        let raw: RawStartReply = serde_json::from_str(body).expect("raw should parse");
        let err = raw.into_reply().expect_err("error status should fail");
        assert!(err.to_string().contains("No characters loaded"));
    }

    #[test]
    fn test_start_reply_missing_field_is_protocol_error() {
        let body = r#"{"session_id": "s1", "status": "playing", "questions_asked": 1}"#;
        let raw: RawStartReply = serde_json::from_str(body).expect("raw should parse");
        assert!(raw.into_reply().is_err());
    }

    #[test]
    fn test_answer_wire_strings() {
        assert_eq!(Answer::Yes.as_str(), "Yes");
        assert_eq!(Answer::ProbablyNo.as_str(), "Probably No");
        assert_eq!(Answer::all().len(), 4);
    }
}
