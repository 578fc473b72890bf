//! Content lookup and validation errors.

use crate::error::{ErrorSeverity, GameError};

/// Category of a content document, used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ContentKind {
    Item,
    Enemy,
    Theme,
    Map,
    Portal,
    Dialogue,
    DialogueNode,
    Skill,
    CombatAction,
    LootTable,
}

/// Errors raised when required content is missing or inconsistent.
///
/// These are configuration errors: they abort loading or world construction
/// and are never produced by ordinary play.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("missing {kind} `{key}`")]
    Missing { kind: ContentKind, key: String },

    #[error("{owner} references unknown {kind} `{key}`")]
    BrokenReference {
        owner: String,
        kind: ContentKind,
        key: String,
    },

    #[error("invalid {kind} `{key}`: {reason}")]
    Invalid {
        kind: ContentKind,
        key: String,
        reason: String,
    },
}

impl ContentError {
    pub fn missing(kind: ContentKind, key: impl Into<String>) -> Self {
        Self::Missing {
            kind,
            key: key.into(),
        }
    }

    pub fn broken(owner: impl Into<String>, kind: ContentKind, key: impl Into<String>) -> Self {
        Self::BrokenReference {
            owner: owner.into(),
            kind,
            key: key.into(),
        }
    }

    pub fn invalid(kind: ContentKind, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            kind,
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "CONTENT_MISSING",
            Self::BrokenReference { .. } => "CONTENT_BROKEN_REFERENCE",
            Self::Invalid { .. } => "CONTENT_INVALID",
        }
    }
}
