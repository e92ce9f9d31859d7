//! Engine errors.
//!
//! Every error here is fatal to the turn that raised it. The interpreter
//! never catches or retries; the session owner decides whether to restart
//! or exit. Bad player input is not an error at all: boards answer it with
//! a message and a fresh prompt.

use thiserror::Error;

use super::config::ConfigError;
use crate::effects::EffectKind;

/// Engine result type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// The effect stream itself is malformed: an unmatched wait or
    /// conditional marker, a stray end marker, or an effect missing a
    /// reference it needs. Only content bugs produce these.
    #[error("malformed {kind:?} effect at position {position}: {reason}")]
    Structural {
        kind: EffectKind,
        position: usize,
        reason: String,
    },

    /// An effect reached a collaborator without a reference it needs.
    /// Collaborators cannot see sequence positions, so the interpreter turns
    /// this into `Structural` at the effect's position before it escapes.
    #[error("{kind:?} effect without {what}")]
    MissingReference { kind: EffectKind, what: String },

    /// A collaborator broke its contract.
    #[error("contract violation in {collaborator}: {reason}")]
    ContractViolation {
        collaborator: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Create a structural error for the effect at `position`.
    pub fn structural(kind: EffectKind, position: usize, reason: impl Into<String>) -> Self {
        Self::Structural {
            kind,
            position,
            reason: reason.into(),
        }
    }

    /// Create a missing-reference error for an effect of `kind`.
    pub fn missing(kind: EffectKind, what: impl Into<String>) -> Self {
        Self::MissingReference {
            kind,
            what: what.into(),
        }
    }

    /// Pin a missing reference to the sequence position it came from.
    /// Every other error passes through unchanged.
    #[must_use]
    pub fn at(self, position: usize) -> Self {
        match self {
            Self::MissingReference { kind, what } => {
                Self::structural(kind, position, format!("effect without {what}"))
            }
            other => other,
        }
    }

    /// Create a contract violation blamed on `collaborator`.
    pub fn contract(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            collaborator,
            reason: reason.into(),
        }
    }
}
