use thiserror::Error;

use crate::model::Branch;

/// Faults raised while following bindings through a [`FollowGraph`](crate::model::FollowGraph).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("index {index} out of range for {entity}.{branch} (length {len})")]
    IndexOutOfRange {
        entity: String,
        branch: Branch,
        index: usize,
        len: usize,
    },

    #[error("transform `{function}` on {entity} has no output at index {index}")]
    OutputOutOfRange {
        entity: String,
        function: String,
        index: usize,
    },

    #[error("binding targets unknown entity #{id}")]
    UnknownEntity { id: usize },

    #[error("reference cycle: {path}")]
    Cycle { path: String },
}

impl ResolveError {
    /// True for both stored-index and computed-output range faults.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            ResolveError::IndexOutOfRange { .. } | ResolveError::OutputOutOfRange { .. }
        )
    }
}

/// Faults raised while assembling a graph from declarations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("entity '{0}' is declared more than once")]
    DuplicateEntity(String),

    #[error("binding references undeclared entity '{0}'")]
    UnknownEntity(String),

    #[error("unknown transform function '{0}'")]
    UnknownTransform(String),

    #[error("entity '{name}' is not a {expected}")]
    WrongKind { name: String, expected: &'static str },

    #[error("values '{0}' must hold at least one literal")]
    EmptyValues(String),
}
