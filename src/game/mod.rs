//! Session orchestration: phases, transitions, and navigation.

mod machine;
mod phase;
mod route;

pub use machine::{AnswerCall, ConfirmCall, SessionMachine};
pub use phase::{Guess, Phase, Question};
pub use route::Route;
