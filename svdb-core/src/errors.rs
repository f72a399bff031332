use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum IntervalError {
    #[error("Invalid span {chrom}:{start}-{end}: end is before start")]
    InvalidSpan { chrom: String, start: u32, end: u32 },

    #[error("Unknown SV type: {0}")]
    UnknownSvType(String),

    #[error("Unknown genotype: {0}")]
    UnknownGenotype(String),
}

pub type Result<T> = std::result::Result<T, IntervalError>;
