use thiserror::Error;

use crate::catalog::{PatientId, SvId};

#[derive(Error, Debug, PartialEq)]
pub enum CarrierError {
    #[error("Distance cutoff must be in [0, 1), got {0}")]
    InvalidCutoff(f64),

    #[error("No SV with id {0} in the catalog")]
    UnknownSv(SvId),

    #[error("No patient with id {0} in the catalog")]
    UnknownPatient(PatientId),
}

pub type Result<T> = std::result::Result<T, CarrierError>;
