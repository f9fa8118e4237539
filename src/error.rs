//! Error types for the punishment engine
//!
//! This module defines the errors that can occur while resolving subjects,
//! formatting notifications, and driving the enforcement lifecycle.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during punishment operations
#[derive(Debug, Error)]
pub enum TribunalError {
    /// Raw input matched none of the recognized subject shapes
    #[error("could not make {0:?} into a subject")]
    InvalidFormat(String),

    /// Well-formed UUID unknown to the identity cache
    #[error("uuid {0} is unknown to the identity cache")]
    InvalidIdentity(Uuid),

    /// Remote name resolution failed
    #[error("name lookup failed for {0}")]
    NameLookupFailed(Uuid),

    /// Required configuration key is missing or has the wrong type
    #[error("missing or malformed configuration key: {0}")]
    ConfigurationIntegrity(String),

    /// A subject was used in a role its tag does not permit
    #[error("a {tag} subject cannot act as {role}")]
    UnsupportedRole {
        tag: &'static str,
        role: &'static str,
    },

    /// Punishment window violates `end == 0 || end > start`
    #[error("invalid punishment window: end {end} does not follow start {start}")]
    InvalidWindow { start: i64, end: i64 },

    /// Punishment record not found
    #[error("punishment not found: {0}")]
    NotFound(i64),
}

/// Result type for punishment operations
pub type TribunalResult<T> = Result<T, TribunalError>;
