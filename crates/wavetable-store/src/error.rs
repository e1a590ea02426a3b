//! Errors returned by [`WavetableStore::build`](crate::WavetableStore::build).

use crate::validation::ValidationError;
use std::fmt;

/// Why a build was rejected.
///
/// Either way the store keeps the tables from its last successful build.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// The header or payload is malformed.
    Validation(ValidationError),
    /// The arenas could not grow to the planned size.
    Allocation {
        /// Samples per arena that were requested.
        requested_samples: usize,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid wavetable: {}", err),
            Self::Allocation { requested_samples } => write!(
                f,
                "failed to allocate wavetable arenas of {} samples",
                requested_samples
            ),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Allocation { .. } => None,
        }
    }
}

impl From<ValidationError> for BuildError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}
