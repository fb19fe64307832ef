//! Well-known keys for persisted session state.

use tracing::instrument;

/// Keys under which the orchestrator persists session state.
///
/// All values are stored as strings. `QuestionsAsked` holds a decimal
/// integer and `GuessData` holds a JSON document; the other keys hold
/// the service's values verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// Opaque identifier naming the active game session.
    SessionId,
    /// Text of the question currently presented to the player.
    QuestionText,
    /// Service-chosen key for the current question, echoed back verbatim
    /// when the answer is submitted.
    AttributeKey,
    /// Count of questions asked so far in the session.
    QuestionsAsked,
    /// JSON-encoded guess payload, present once the service has guessed.
    GuessData,
}

impl SessionKey {
    /// Returns the storage key string.
    #[instrument]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionId => "session_id",
            Self::QuestionText => "question_text",
            Self::AttributeKey => "attribute_key",
            Self::QuestionsAsked => "questions_asked",
            Self::GuessData => "guess_data",
        }
    }

    /// The four keys a resumable session requires. Absence of any one of
    /// them is treated as absence of the whole session.
    pub fn required() -> &'static [SessionKey] {
        &[
            Self::SessionId,
            Self::QuestionText,
            Self::AttributeKey,
            Self::QuestionsAsked,
        ]
    }

    /// All session keys, required and optional alike.
    pub fn all() -> &'static [SessionKey] {
        &[
            Self::SessionId,
            Self::QuestionText,
            Self::AttributeKey,
            Self::QuestionsAsked,
            Self::GuessData,
        ]
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_is_prefix_of_all() {
        let required = SessionKey::required();
        let all = SessionKey::all();
        assert_eq!(&all[..required.len()], required);
        assert_eq!(all.len(), required.len() + 1);
    }

    #[test]
    fn test_key_strings_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for key in SessionKey::all() {
            assert!(seen.insert(key.as_str()), "duplicate key {key}");
        }
    }
}
