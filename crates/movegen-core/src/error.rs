//! Unified error type for callers driving the whole pipeline.
//!
//! Subsystems keep their own error enums ([`GraphError`],
//! [`SerializeError`]); `From` bridges fold them into [`MoveGenError`] so a
//! driver can use one result type end to end.

use thiserror::Error;

use crate::graph::GraphError;
use crate::serialize::SerializeError;

/// Canonical pipeline error.
#[derive(Debug, Error)]
pub enum MoveGenError {
    /// Graph construction or lookup failure.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Table serialization failure.
    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

impl MoveGenError {
    /// True when the failure is a consistency violation rather than an
    /// environment problem; re-running with the same input reproduces it.
    pub fn is_deterministic(&self) -> bool {
        match self {
            MoveGenError::Graph(_) => true,
            MoveGenError::Serialize(err) => matches!(
                err,
                SerializeError::UnexpectedEmptyContext { .. } | SerializeError::Graph(_)
            ),
        }
    }
}
