//! HTTP client for the guessing game service.

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::api::protocol::{ErrorBody, RawStartReply, WelcomeReply};
use crate::api::{Answer, ClientError, ConfirmEnvelope, StartGameReply, TurnEnvelope};

/// Client for the guessing game's REST API.
///
/// Holds no session state of its own; callers thread the session id and
/// attribute key through each call. Cheap to clone, so spawned tasks can
/// each take their own copy.
#[derive(Debug, Clone)]
pub struct GameClient {
    base_url: String,
    client: reqwest::Client,
}

impl GameClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        info!("Creating game service client");
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The service base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts a new game session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the service is unreachable or the reply
    /// is not a well-formed playing state.
    #[instrument(skip(self))]
    pub async fn start_game(&self) -> Result<StartGameReply, ClientError> {
        info!("Starting new game");

        let response = self
            .client
            .post(format!("{}/start_game", self.base_url))
            .send()
            .await?;

        let raw: RawStartReply = Self::read_reply(response, "start_game").await?;
        let reply = raw.into_reply()?;
        debug!(session_id = %reply.session_id, "Game started");
        Ok(reply)
    }

    /// Submits an answer to the current question.
    ///
    /// The `attribute_key` must be the one the service sent with the
    /// question, echoed back verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the service is unreachable or replies
    /// with an unrecognized shape. A well-formed `error` status is a
    /// valid reply, not an error.
    #[instrument(skip(self), fields(session_id = %session_id, attribute_key = %attribute_key, answer = %answer))]
    pub async fn submit_answer(
        &self,
        session_id: &str,
        attribute_key: &str,
        answer: Answer,
    ) -> Result<TurnEnvelope, ClientError> {
        debug!("Submitting answer");

        let body = serde_json::json!({
            "session_id": session_id,
            "attribute_key": attribute_key,
            "answer": answer.as_str(),
        });
        let response = self
            .client
            .post(format!("{}/questions", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::read_reply(response, "questions").await
    }

    /// Reports whether the service's guess was correct.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the service is unreachable or replies
    /// with an unrecognized shape.
    #[instrument(skip(self), fields(session_id = %session_id, guess = %guess_name, confirms = confirms_correct))]
    pub async fn confirm_guess(
        &self,
        session_id: &str,
        guess_name: &str,
        confirms_correct: bool,
    ) -> Result<ConfirmEnvelope, ClientError> {
        debug!("Confirming guess");

        let body = serde_json::json!({
            "session_id": session_id,
            "guessed_character_name": guess_name,
            "user_confirms_correct": confirms_correct,
        });
        let response = self
            .client
            .post(format!("{}/confirm_guess", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::read_reply(response, "confirm_guess").await
    }

    /// Checks connectivity by hitting the welcome endpoint.
    ///
    /// Returns the service's welcome message when it provides one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the service is unreachable or the
    /// endpoint does not answer with a success status.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<Option<String>, ClientError> {
        debug!("Pinging service");

        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .send()
            .await?;

        let welcome: WelcomeReply = Self::read_reply(response, "welcome").await?;
        Ok(welcome.message)
    }

    /// Reads a response body, mapping non-success statuses to protocol
    /// errors carrying the service's `detail` message when present.
    async fn read_reply<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ClientError::transport(format!("Failed to read {} reply: {}", context, e))
        })?;
        debug!(status = %status, context, "Got service reply");

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or_else(|| format!("Service returned HTTP {}", status));
            return Err(ClientError::protocol(detail));
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::protocol(format!("Malformed {} reply: {}", context, e)))
    }
}
