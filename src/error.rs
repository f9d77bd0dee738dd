//! Library error type.
//!
//! Only environmental failures surface as errors; everything inside the
//! simulation reports through boolean outcomes or guarded no-ops.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] std::io::Error),
}
