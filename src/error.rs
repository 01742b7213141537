//! error returned by the facility location engine

use thiserror::Error;

/// All failures of the engine come from a precondition violated by the caller
/// (empty collection, malformed entity, zero population for weighted metrics).
/// The algorithms themselves are total over well formed input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FacilityError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl FacilityError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FacilityError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FacilityError>;
