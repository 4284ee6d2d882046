//! Effective area calibration of the Hinode/EIS spectrometer.
//!
//! Intensities calibrated with the preflight effective area are rescaled to
//! account for the in-flight sensitivity loss, using either the 2014 decay
//! model or the 2023 fitted time series.

pub mod bands;
pub mod calibrate;
pub mod config;
pub mod effective_area;
pub mod error;
pub mod interp;
pub mod reference;
pub mod time;

pub use calibrate::{Observation, ObservationMeta, apply, calibration_ratio, wavelength_from_label};
pub use config::Config;
pub use effective_area::{
    CalibWarning, EffectiveArea, EffectiveAreaModel, Model2014, Model2023, Options2023,
    PreflightEffectiveArea, RadcalConstants, WavelengthRequest,
};
pub use error::{CalibError, CalibResult, ParseError, ValidationError};
pub use reference::{ReferenceDatasets, ReferencePaths, create_reader};
