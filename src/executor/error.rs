//! Execution errors

use std::fmt;
use crate::compiler::CompileError;

#[derive(Debug)]
pub enum ExecuteError {
    /// The query could not be compiled for its source
    Compile(CompileError),
    /// The backend rejected or failed the compiled query
    Backend(String),
}

impl fmt::Display for ExecuteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteError::Compile(e) => write!(f, "Compilation failed: {}", e),
            ExecuteError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for ExecuteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecuteError::Compile(e) => Some(e),
            ExecuteError::Backend(_) => None,
        }
    }
}

impl From<CompileError> for ExecuteError {
    fn from(err: CompileError) -> Self {
        ExecuteError::Compile(err)
    }
}
