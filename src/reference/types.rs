use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::bands::Band;
use crate::interp::is_strictly_increasing;
use crate::time::{ScaleA, ScaleB, to_scale_a, to_scale_b};

/// Source of the calibration reference data.
pub trait ReferenceReader {
    fn read_nrl_2014(&self) -> Result<Calibration2014, ReadError>;
    fn read_fit_2023(&self) -> Result<FitCalibration2023, ReadError>;
    fn read_preflight(&self, band: Band) -> Result<PreflightCurve, ReadError>;
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid reference data: {0}")]
    Invalid(String),
    #[error("No 2023 fit file (fit_eis_ea_*.json) is available")]
    NoFitFile,
}

#[derive(Debug, Error, PartialEq)]
pub enum FileError {
    #[error("Unsupported reference file type: {0}")]
    UnknownFileType(PathBuf),
}

#[derive(Debug, PartialEq)]
pub enum FileType {
    Json,
}

/// Exponential decay parameters of the 2014 model (Warren et al. 2014).
#[derive(Debug, Clone, Deserialize)]
pub struct Calibration2014 {
    /// Reference epoch of the decay
    pub t0: String,
    pub wave_knots_sw: Vec<f64>,
    pub wave_knots_lw: Vec<f64>,
    pub a0_sw: Vec<f64>,
    pub tau_sw: Vec<f64>,
    pub a0_lw: Vec<f64>,
    pub tau_lw: Vec<f64>,
    /// Default output grids
    pub wave_area_sw: Vec<f64>,
    pub wave_area_lw: Vec<f64>,
}

/// Knots of one band of the 2014 model.
#[derive(Debug, Clone, Copy)]
pub struct DecayKnots<'a> {
    pub wave_knots: &'a [f64],
    pub a0: &'a [f64],
    pub tau: &'a [f64],
    pub default_grid: &'a [f64],
}

impl Calibration2014 {
    pub fn short(&self) -> DecayKnots<'_> {
        DecayKnots {
            wave_knots: &self.wave_knots_sw,
            a0: &self.a0_sw,
            tau: &self.tau_sw,
            default_grid: &self.wave_area_sw,
        }
    }

    pub fn long(&self) -> DecayKnots<'_> {
        DecayKnots {
            wave_knots: &self.wave_knots_lw,
            a0: &self.a0_lw,
            tau: &self.tau_lw,
            default_grid: &self.wave_area_lw,
        }
    }

    pub fn band(&self, band: Band) -> Option<DecayKnots<'_>> {
        match band {
            Band::Short => Some(self.short()),
            Band::Long => Some(self.long()),
            Band::None => None,
        }
    }

    pub fn reference_epoch(&self) -> Result<ScaleA, ReadError> {
        to_scale_a(&self.t0).map_err(|e| ReadError::Invalid(format!("t0: {}", e)))
    }

    pub fn validate(&self) -> Result<(), ReadError> {
        self.reference_epoch()?;

        for (band, knots) in [(Band::Short, self.short()), (Band::Long, self.long())] {
            let n = knots.wave_knots.len();
            let label = band.label();

            if n < 2 || !is_strictly_increasing(knots.wave_knots) {
                return Err(ReadError::Invalid(format!(
                    "wave_knots_{} must hold at least 2 strictly increasing values",
                    label.to_lowercase()
                )));
            }
            for (name, values) in [("a0", knots.a0), ("tau", knots.tau)] {
                if values.len() != 1 && values.len() != n {
                    return Err(ReadError::Invalid(format!(
                        "{}_{} has {} values for {} knots",
                        name,
                        label.to_lowercase(),
                        values.len(),
                        n
                    )));
                }
            }
            if knots.a0.iter().any(|&a| a <= 0.0) || knots.tau.iter().any(|&t| t == 0.0) {
                return Err(ReadError::Invalid(format!(
                    "{} amplitudes must be positive and time constants non-zero",
                    label
                )));
            }
        }

        Ok(())
    }
}

/// Effective area on the knot grid of one band, one row per knot wavelength
/// and one column per reference date.
#[derive(Debug, Clone)]
pub struct KnotGrid {
    pub wave: Vec<f64>,
    pub ea: Vec<Vec<f64>>,
}

/// Measured effective area time series of the 2023 model.
#[derive(Debug, Clone)]
pub struct FitCalibration2023 {
    pub date_obs: Vec<String>,
    pub dates: Vec<ScaleB>,
    pub short: KnotGrid,
    pub long: KnotGrid,
}

#[derive(Debug, Deserialize)]
pub struct FitCalibrationFile {
    pub date_obs: Vec<String>,
    pub sw_wave: Vec<f64>,
    pub lw_wave: Vec<f64>,
    pub sw_ea: Vec<Vec<f64>>,
    pub lw_ea: Vec<Vec<f64>>,
}

impl TryFrom<FitCalibrationFile> for FitCalibration2023 {
    type Error = ReadError;

    fn try_from(file: FitCalibrationFile) -> Result<Self, Self::Error> {
        let dates = file
            .date_obs
            .iter()
            .map(|date| to_scale_b(date))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ReadError::Invalid(format!("date_obs: {}", e)))?;

        let fit = FitCalibration2023 {
            date_obs: file.date_obs,
            dates,
            short: KnotGrid {
                wave: file.sw_wave,
                ea: file.sw_ea,
            },
            long: KnotGrid {
                wave: file.lw_wave,
                ea: file.lw_ea,
            },
        };
        fit.validate()?;
        Ok(fit)
    }
}

impl FitCalibration2023 {
    pub fn validate(&self) -> Result<(), ReadError> {
        if self.dates.is_empty() || !self.dates.windows(2).all(|w| w[0] < w[1]) {
            return Err(ReadError::Invalid(
                "date_obs must hold strictly increasing dates".to_string(),
            ));
        }
        if self.date_obs.len() != self.dates.len() {
            return Err(ReadError::Invalid(format!(
                "{} date labels for {} dates",
                self.date_obs.len(),
                self.dates.len()
            )));
        }

        for (label, grid) in [("sw", &self.short), ("lw", &self.long)] {
            if grid.wave.len() < 2 || !is_strictly_increasing(&grid.wave) {
                return Err(ReadError::Invalid(format!(
                    "{}_wave must hold at least 2 strictly increasing values",
                    label
                )));
            }
            if grid.ea.len() != grid.wave.len() {
                return Err(ReadError::Invalid(format!(
                    "{}_ea has {} rows for {} knot wavelengths",
                    label,
                    grid.ea.len(),
                    grid.wave.len()
                )));
            }
            if let Some(row) = grid.ea.iter().position(|row| row.len() != self.dates.len()) {
                return Err(ReadError::Invalid(format!(
                    "{}_ea row {} does not have one value per date ({})",
                    label,
                    row,
                    self.dates.len()
                )));
            }
        }

        Ok(())
    }

    pub fn band(&self, band: Band) -> Option<&KnotGrid> {
        match band {
            Band::Short => Some(&self.short),
            Band::Long => Some(&self.long),
            Band::None => None,
        }
    }

    pub fn first_date(&self) -> (ScaleB, &str) {
        (self.dates[0], &self.date_obs[0])
    }

    pub fn last_date(&self) -> (ScaleB, &str) {
        let last = self.dates.len() - 1;
        (self.dates[last], &self.date_obs[last])
    }
}

/// Launch-time effective area of one band.
#[derive(Debug, Clone, Deserialize)]
pub struct PreflightCurve {
    pub wave: Vec<f64>,
    pub ea: Vec<f64>,
}

impl PreflightCurve {
    pub fn validate(&self) -> Result<(), ReadError> {
        if self.wave.len() != self.ea.len() {
            return Err(ReadError::Invalid(format!(
                "preflight curve has {} wavelengths and {} effective areas",
                self.wave.len(),
                self.ea.len()
            )));
        }
        if self.wave.is_empty() || !is_strictly_increasing(&self.wave) {
            return Err(ReadError::Invalid(
                "preflight wavelengths must be strictly increasing".to_string(),
            ));
        }
        if self.ea.iter().any(|&ea| ea <= 0.0) {
            return Err(ReadError::Invalid(
                "preflight effective areas must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
