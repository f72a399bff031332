use thiserror::Error;

use svdb_carriers::CarrierError;
use svdb_core::IntervalError;
use svdb_grouping::GroupError;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Carrier(#[from] CarrierError),

    #[error("Calls reference a patient missing from the patient table: {0}")]
    UnknownPatient(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("SV {0} was inserted but cannot be found in the catalog")]
    MissingCatalogRow(String),

    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, ImportError>;
