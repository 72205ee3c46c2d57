use crate::component::{ComponentId, ComponentKind};
use thiserror::Error;

pub type TreeResult<T> = Result<T, TreeError>;

/// Structural operation failures. The tree is unchanged whenever one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Component not found: {0}")]
    NotFound(ComponentId),

    #[error("Invalid target: {reason}")]
    InvalidTarget { reason: String },

    #[error("Index {index} out of range (0..={len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Cannot move {node} into {target}: target is the node or one of its descendants")]
    CyclicMove {
        node: ComponentId,
        target: ComponentId,
    },
}

impl TreeError {
    pub fn invalid_target(reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            reason: reason.into(),
        }
    }

    pub(crate) fn leaf_target(id: &ComponentId, kind: ComponentKind) -> Self {
        Self::invalid_target(format!("{} is a {} and cannot hold children", id, kind))
    }

    pub(crate) fn missing_target(id: &ComponentId) -> Self {
        Self::invalid_target(format!("target parent {} does not exist", id))
    }

    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TreeError::NotFound(_) => "NotFound",
            TreeError::InvalidTarget { .. } => "InvalidTarget",
            TreeError::OutOfRange { .. } => "OutOfRange",
            TreeError::CyclicMove { .. } => "CyclicMove",
        }
    }
}
