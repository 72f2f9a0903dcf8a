//! Crate-level error type.

use crate::engine::EngineError;
use crate::factory::FactoryError;
use crate::invocation::InvocationError;
use crate::registry::RegistryError;

/// Top-level error aggregating every layer of the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Factory error: {0}")]
    Factory(#[from] FactoryError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invocation error: {0}")]
    Invocation(#[from] InvocationError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
