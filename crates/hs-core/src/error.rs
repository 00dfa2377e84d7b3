//! Shared error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` or wrap it as one variant, whichever keeps error sites clean.

use thiserror::Error;

use crate::{NodeId, ZoneId};

/// The base error type for `hs-core` and a common building block for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("zone {0} not found")]
    ZoneNotFound(ZoneId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `hs-core`.
pub type CoreResult<T> = Result<T, CoreError>;
