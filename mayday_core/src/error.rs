//! Error types for the session engine.

use thiserror::Error;

/// Errors reported by setup validation and engine operations.
///
/// Every variant is immediate and leaves state untouched: a failed
/// operation never partially mutates the session.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// A required setup field is empty
    #[error("required setup field is empty: {0}")]
    MissingField(&'static str),

    /// The participant list is empty
    #[error("at least one participant is required")]
    NoParticipants,

    /// A participant entry has a blank name or title
    #[error("participant {0} is missing a name or title")]
    IncompleteParticipant(usize),

    /// Proxy endpoint URL without a secure-transport scheme
    #[error("endpoint URL must use https")]
    InsecureEndpoint,

    /// Document submitted with empty (after trimming) content
    #[error("document content is empty")]
    EmptyDocument,

    /// Document author does not reference a known participant
    #[error("author {0} is not a registered participant")]
    UnknownAuthor(String),

    /// No active task with the given id
    #[error("no active task with id {0}")]
    UnknownTask(String),

    /// Option index out of range for the task
    #[error("task {task} has no option {index}")]
    UnknownOption {
        /// Task id
        task: String,
        /// Option index that was requested
        index: usize,
    },

    /// Operation requires an active session
    #[error("session is not active")]
    NotActive,

    /// The session was already started
    #[error("session already started")]
    AlreadyStarted,

    /// Ending the session requires explicit confirmation
    #[error("ending the session requires confirmation")]
    NotConfirmed,
}
