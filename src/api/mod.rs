//! HTTP client and wire protocol for the guessing game service.

mod client;
mod error;
mod protocol;

pub use client::GameClient;
pub use error::ClientError;
pub use protocol::{
    Answer, ConfirmEnvelope, ConfirmReply, NO_GUESS, StartGameReply, TopCandidate, TurnEnvelope,
    TurnReply,
};
