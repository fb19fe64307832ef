//! Phase-to-view projection.

use crate::game::Phase;

/// The view a phase belongs on.
///
/// Navigation is a pure function of phase; the controller swaps screens
/// whenever the projected route changes, and only after the phase (and
/// its store effects) have settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Start screen.
    Home,
    /// Question-and-answer screen.
    Questions,
    /// Guess confirmation and end-of-game screen.
    Results,
    /// Degraded-session screen.
    Error,
}

impl Route {
    /// Projects a phase onto its route. In-flight submissions stay on
    /// the route they departed from.
    pub fn for_phase(phase: &Phase) -> Self {
        match phase {
            Phase::Idle => Self::Home,
            Phase::Playing { .. } => Self::Questions,
            Phase::AwaitingGuess { prior } => Self::for_phase(prior),
            Phase::GuessMade { .. } | Phase::Confirmed { .. } | Phase::Failed { .. } => {
                Self::Results
            }
            Phase::Error { .. } => Self::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Guess, Question};

    #[test]
    fn test_routes_cover_every_phase() {
        assert_eq!(Route::for_phase(&Phase::Idle), Route::Home);
        assert_eq!(
            Route::for_phase(&Phase::Playing {
                question: Question::new("?".to_string(), "k".to_string()),
                questions_asked: 1,
            }),
            Route::Questions
        );
        assert_eq!(
            Route::for_phase(&Phase::GuessMade {
                guess: Guess::new("Ada".to_string(), 0.9, None),
            }),
            Route::Results
        );
        assert_eq!(
            Route::for_phase(&Phase::Confirmed {
                message: "won".to_string(),
                top_candidates: Vec::new(),
            }),
            Route::Results
        );
        assert_eq!(
            Route::for_phase(&Phase::Failed {
                message: "lost".to_string(),
            }),
            Route::Results
        );
        assert_eq!(
            Route::for_phase(&Phase::Error {
                message: "broken".to_string(),
            }),
            Route::Error
        );
    }

    #[test]
    fn test_waiting_keeps_departed_route() {
        let waiting = Phase::AwaitingGuess {
            prior: Box::new(Phase::Playing {
                question: Question::new("?".to_string(), "k".to_string()),
                questions_asked: 1,
            }),
        };
        assert_eq!(Route::for_phase(&waiting), Route::Questions);

        let waiting_on_start = Phase::AwaitingGuess {
            prior: Box::new(Phase::Idle),
        };
        assert_eq!(Route::for_phase(&waiting_on_start), Route::Home);
    }
}
