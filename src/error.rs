use thiserror::Error;

use crate::interp::InterpError;
use crate::reference::ReadError;

/// Malformed input text: timestamps or line labels.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Failed to parse timestamp '{input}': {reason}")]
    Timestamp { input: String, reason: String },
    #[error("No wavelength found in line label '{0}'")]
    WavelengthLabel(String),
}

/// Inputs that parse but cannot be used for the requested calculation.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Please input a single date (got {0})")]
    DateCount(usize),
    #[error("No wavelengths were requested")]
    EmptyWavelengths,
    #[error(
        "Invalid wavelength(s). Please only select values in either the short (165 - 213) or long (245 - 292) wavelength bands"
    )]
    InvalidWavelengths,
    #[error("No preflight effective area curve outside the short and long bands")]
    NoPreflightCurve,
    #[error("Calibration ratio at {wavelength} Å is not usable ({ratio})")]
    InvalidRatio { wavelength: f64, ratio: f64 },
}

#[derive(Debug, Error)]
pub enum CalibError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Interpolation failed: {0}")]
    Interpolation(#[from] InterpError),
    #[error("Reference dataset error: {0}")]
    Read(#[from] ReadError),
}

pub type CalibResult<T> = Result<T, CalibError>;
