use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("slot {slot} is outside the sim order (length {len})")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("demand record has {found} slots but the sim order has {expected}")]
    SlotCountMismatch { expected: usize, found: usize },
}

pub type LoadResult<T> = Result<T, LoadError>;
