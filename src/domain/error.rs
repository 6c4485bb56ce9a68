use crate::domain::handle::VertexHandle;
use std::fmt;
use thiserror::Error;

/// Which endpoint of a call edge failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleRole {
    Caller,
    Callee,
}

impl fmt::Display for HandleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleRole::Caller => f.write_str("caller"),
            HandleRole::Callee => f.write_str("callee"),
        }
    }
}

/// Errors surfaced by the call graph engine.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unknown {role} handle {handle}")]
    InvalidHandle {
        role: HandleRole,
        handle: VertexHandle,
    },

    #[error("failed to write graph export: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
