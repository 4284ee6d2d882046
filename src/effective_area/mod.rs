//! EIS effective area models
//!
//! - [`Model2014`]: exponential decay of each knot with time, log-linear
//!   interpolation in wavelength.
//! - [`Model2023`]: knot values interpolated in time from the measured fit
//!   series, then a cubic spline in wavelength. Optionally converted to
//!   radiometric calibration units.
//! - [`PreflightEffectiveArea`]: the time-independent launch curve used as
//!   the numerator of the calibration ratio.
//!
//! Every model returns an [`EffectiveArea`] holding the values in request
//! order together with the non-fatal [`CalibWarning`]s raised on the way.

pub mod model_2014;
pub mod model_2023;
pub mod preflight;
pub mod radcal;

use std::fmt;

use tracing::warn;

pub use model_2014::Model2014;
pub use model_2023::{Model2023, Options2023};
pub use preflight::PreflightEffectiveArea;
pub use radcal::RadcalConstants;

use crate::bands::Band;
use crate::error::CalibResult;

/// Wavelengths at which an effective area is requested.
#[derive(Debug, Clone, PartialEq)]
pub enum WavelengthRequest {
    /// Explicit wavelengths in Å, output keeps their order
    Values(Vec<f64>),
    /// The model's default short band grid
    ShortGrid,
    /// The model's default long band grid
    LongGrid,
}

impl WavelengthRequest {
    pub fn grid(band: Band) -> Option<Self> {
        match band {
            Band::Short => Some(WavelengthRequest::ShortGrid),
            Band::Long => Some(WavelengthRequest::LongGrid),
            Band::None => None,
        }
    }
}

impl From<f64> for WavelengthRequest {
    fn from(wavelength: f64) -> Self {
        WavelengthRequest::Values(vec![wavelength])
    }
}

impl From<Vec<f64>> for WavelengthRequest {
    fn from(wavelengths: Vec<f64>) -> Self {
        WavelengthRequest::Values(wavelengths)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalibWarning {
    OutOfBand { wavelength: f64 },
    PreOperations { date: String },
    BeforeFirstCalibration { first: String },
    AfterLastCalibration { last: String },
}

impl CalibWarning {
    /// Logs the warning and records it.
    pub(crate) fn emit(self, warnings: &mut Vec<CalibWarning>) {
        warn!("{}", self);
        warnings.push(self);
    }
}

impl fmt::Display for CalibWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibWarning::OutOfBand { wavelength } => {
                write!(f, "Wavelength out of bounds: {} Å", wavelength)
            }
            CalibWarning::PreOperations { date } => write!(
                f,
                "Selected date {} is before the start of normal EIS science operations. Output values may be inaccurate",
                date
            ),
            CalibWarning::BeforeFirstCalibration { first } => write!(
                f,
                "Selected date is before the first calibrated date on {}. Returning first fit calibration",
                first
            ),
            CalibWarning::AfterLastCalibration { last } => write!(
                f,
                "Selected date is after the last calibrated date on {}. Returning last fit calibration",
                last
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveArea {
    pub wavelengths: Vec<f64>,
    pub values: Vec<f64>,
    pub warnings: Vec<CalibWarning>,
}

impl EffectiveArea {
    /// The value of a one-wavelength result.
    pub fn single(&self) -> Option<f64> {
        match self.values.as_slice() {
            [value] => Some(*value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelengths
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

/// An effective area as a function of observation date and wavelength.
pub trait EffectiveAreaModel {
    fn name(&self) -> &'static str;

    fn effective_area(&self, date: &str, request: &WavelengthRequest)
    -> CalibResult<EffectiveArea>;
}
