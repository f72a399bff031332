use svdb_core::IntervalError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum GroupError {
    /// An interval was offered to a group whose core it does not overlap.
    /// The sweep only offers overlapping intervals, so this means the sort
    /// order or the core bookkeeping was broken upstream.
    #[error("Interval {interval} does not overlap the core {core} of the group")]
    InvalidGroupMembership { interval: String, core: String },

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

pub type Result<T> = std::result::Result<T, GroupError>;
