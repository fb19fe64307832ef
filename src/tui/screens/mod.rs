//! Screen implementations for the session TUI.

mod error;
mod home;
mod questions;
mod results;

pub use error::ErrorScreen;
pub use home::HomeScreen;
pub use questions::QuestionsScreen;
pub use results::ResultsScreen;
