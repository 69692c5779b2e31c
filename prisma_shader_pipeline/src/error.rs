//! Error types for the Prisma shader pipeline
//!
//! Resource-table misuse (duplicate names, unknown names, metadata
//! mismatches) is a contract violation here, never a condition that is
//! silently repaired. Every error carries the offending name so the
//! message alone identifies the call site's mistake.

use std::fmt;

/// Result type for shader pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Shader pipeline errors
///
/// Stage-set configuration errors (duplicate or missing mandatory stage
/// kind) are rejected at compile time and have no variant here.
#[derive(Debug, Clone)]
pub enum Error {
    /// A pipeline stage required by the operation has not been initialized
    StageUnavailable(String),

    /// A name was declared twice in the same resource table
    NameConflict(String),

    /// An operation referenced a name never declared in the table
    NameNotFound(String),

    /// Requested type, size, or mutability disagrees with the declared metadata
    Inconsistent(String),

    /// Device, context, or shader-compiler failure
    Backend(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StageUnavailable(msg) => write!(f, "Stage unavailable: {}", msg),
            Error::NameConflict(msg) => write!(f, "Name conflict: {}", msg),
            Error::NameNotFound(msg) => write!(f, "Name not found: {}", msg),
            Error::Inconsistent(msg) => write!(f, "Inconsistent declaration: {}", msg),
            Error::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build an [`Error`], logging it at ERROR severity with file:line first.
///
/// # Example
///
/// ```no_run
/// # use prisma_shader_pipeline::prisma_err;
/// # let name = "Transform";
/// let err = prisma_err!(NameNotFound, "prisma::ConstantBufferManager",
///     "constant buffer not found: {}", name);
/// ```
#[macro_export]
macro_rules! prisma_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::prisma::log::dispatch_detailed(
            $crate::prisma::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!(),
        );
        $crate::prisma::Error::$variant(message)
    }};
}

/// Return early with a logged [`Error`] (the `Err` form of [`prisma_err!`]).
#[macro_export]
macro_rules! prisma_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::prisma_err!($variant, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
