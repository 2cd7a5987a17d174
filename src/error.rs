//! Error types for the combat engine.
//!
//! Every fallible engine call reports one of the `EngineError` kinds.
//! Nothing is retried inside the engine; errors are surfaced to the
//! caller as data.

use std::fmt;
use thiserror::Error;

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotFoundKind {
    Character,
    Equipment,
    Monster,
    Dungeon,
    LootTable,
    CultivationTier,
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotFoundKind::Character => "character",
            NotFoundKind::Equipment => "equipment",
            NotFoundKind::Monster => "monster",
            NotFoundKind::Dungeon => "dungeon",
            NotFoundKind::LootTable => "loot table",
            NotFoundKind::CultivationTier => "cultivation tier",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while resolving combat, loot, rewards or progression.
///
/// # Examples
///
/// ```rust
/// use zzcombat::error::{EngineError, NotFoundKind};
///
/// let err = EngineError::not_found(NotFoundKind::Monster, "slime");
/// assert_eq!(err.to_string(), "monster not found: slime");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// A referenced record does not exist in the supplied snapshot or catalog.
    #[error("{kind} not found: {id}")]
    NotFound { kind: NotFoundKind, id: String },

    /// Advancement was requested from the top tier.
    ///
    /// This is a boundary outcome, not a fault. It only appears as an
    /// error when a caller converts an `Advancement` with `into_result`.
    #[error("maximum cultivation tier reached at level {level}")]
    MaxTierReached { level: u32 },

    /// The caller does not hold enough of a resource to pay a cost.
    #[error("insufficient {resource}: required {required}, available {available}")]
    InsufficientResource {
        resource: String,
        required: u128,
        available: u128,
    },

    /// A tier table breaks the strictly increasing level/threshold ordering.
    #[error("invalid tier table: {0}")]
    InvalidTierTable(String),

    /// Configuration could not be parsed or holds out-of-range values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Shorthand for building a `NotFound` error.
    pub fn not_found(kind: NotFoundKind, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Result alias used across the crate.
pub type EngineResult<T> = Result<T, EngineError>;
