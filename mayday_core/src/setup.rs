//! The validated session configuration surface.
//!
//! Validation is all-or-nothing: a session is never started from a bundle
//! that fails any check, and the connection probe must have succeeded first.

use crate::error::EngineError;
use crate::state::Participant;
use mayday_env::{Endpoint, GeneratorError, TextGenerator};
use serde::{Deserialize, Serialize};

/// Everything the setup surface collects before a session can start.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSetup {
    /// Company name, non-empty
    pub company: String,
    /// Participants with non-empty names and titles
    pub participants: Vec<Participant>,
    /// Endpoint credentials/URL for the text-generation service
    pub endpoint: Endpoint,
}

impl SessionSetup {
    /// Checks every field; the first violation aborts with nothing mutated.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.company.trim().is_empty() {
            return Err(EngineError::MissingField("company"));
        }
        if self.participants.is_empty() {
            return Err(EngineError::NoParticipants);
        }
        for (i, p) in self.participants.iter().enumerate() {
            if p.name.trim().is_empty() || p.title.trim().is_empty() {
                return Err(EngineError::IncompleteParticipant(i));
            }
        }
        match &self.endpoint {
            Endpoint::WorkersAi {
                account_id,
                api_token,
            } => {
                if account_id.trim().is_empty() {
                    return Err(EngineError::MissingField("account id"));
                }
                if api_token.trim().is_empty() {
                    return Err(EngineError::MissingField("api token"));
                }
            }
            Endpoint::Proxy { url } => {
                if !url.starts_with("https://") {
                    return Err(EngineError::InsecureEndpoint);
                }
            }
        }
        Ok(())
    }
}

/// Runs the pre-session connection probe.
///
/// Returns the raw response text for the setup surface. A failure here is
/// fatal to session start; the caller must not proceed to `start()`.
pub async fn verify_endpoint(generator: &dyn TextGenerator) -> Result<String, GeneratorError> {
    generator.probe().await
}
