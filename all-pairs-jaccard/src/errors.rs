//! Error definitions.
use std::error::Error;
use std::fmt;

/// Error used when a join is aborted through its cancellation flag.
///
/// Returned inside [`anyhow::Error`], so callers can recognize it with
/// `err.is::<Cancelled>()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cancelled: the join was aborted before completion")
    }
}

impl Error for Cancelled {}
