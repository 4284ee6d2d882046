use tracing::{debug, info};

use super::{CalibWarning, EffectiveArea, EffectiveAreaModel, RadcalConstants, WavelengthRequest};
use crate::bands::{Band, SHORT_SELECTION_LIMIT};
use crate::error::{CalibResult, ValidationError};
use crate::interp::{CubicSpline, interp_clamped};
use crate::reference::{FitCalibration2023, KnotGrid, ReadError, ReferenceReader};
use crate::time::{ScaleB, normal_operations_start, single_date, to_scale_b};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Options2023 {
    /// Return radiometric calibration values instead of effective areas
    pub radcal: bool,
    /// Do not report dates outside the fitted range
    pub quiet: bool,
}

/// Effective area interpolated from the measured 2023 fit series.
#[derive(Debug, Clone)]
pub struct Model2023 {
    fit: FitCalibration2023,
    date_seconds: Vec<f64>,
    radcal: RadcalConstants,
}

impl Model2023 {
    pub fn new(fit: FitCalibration2023, radcal: RadcalConstants) -> Result<Self, ReadError> {
        fit.validate()?;
        let date_seconds = fit.dates.iter().map(|d| d.seconds()).collect();
        Ok(Self {
            fit,
            date_seconds,
            radcal,
        })
    }

    pub fn from_reader(
        reader: &dyn ReferenceReader,
        radcal: RadcalConstants,
    ) -> Result<Self, ReadError> {
        Self::new(reader.read_fit_2023()?, radcal)
    }

    /// Clamps `tai` to the fitted date range.
    fn clamp_date(&self, tai: ScaleB, quiet: bool, warnings: &mut Vec<CalibWarning>) -> ScaleB {
        let (first, first_label) = self.fit.first_date();
        let (last, last_label) = self.fit.last_date();

        if tai < first {
            if !quiet {
                CalibWarning::BeforeFirstCalibration {
                    first: first_label.to_string(),
                }
                .emit(warnings);
            }
            return first;
        }
        if tai > last {
            if !quiet {
                CalibWarning::AfterLastCalibration {
                    last: last_label.to_string(),
                }
                .emit(warnings);
            }
            return last;
        }
        tai
    }

    fn knot_values(&self, grid: &KnotGrid, tai: ScaleB) -> CalibResult<Vec<f64>> {
        let values = grid
            .ea
            .iter()
            .map(|row| interp_clamped(tai.seconds(), &self.date_seconds, row))
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(values)
    }

    /// Effective area at every knot of `band` at `tai`, linear in time and
    /// held constant outside the fitted range.
    pub fn knot_effective_area(&self, band: Band, tai: ScaleB) -> CalibResult<Option<Vec<f64>>> {
        match self.fit.band(band) {
            Some(grid) => Ok(Some(self.knot_values(grid, tai)?)),
            None => Ok(None),
        }
    }

    pub fn interpolate<S: AsRef<str>>(
        &self,
        dates: &[S],
        request: &WavelengthRequest,
        options: Options2023,
    ) -> CalibResult<EffectiveArea> {
        let date = single_date(dates)?;
        let requested = to_scale_b(date)?;
        let mut warnings = Vec::new();

        if requested < normal_operations_start() {
            CalibWarning::PreOperations {
                date: date.to_string(),
            }
            .emit(&mut warnings);
        }

        let band = match request {
            WavelengthRequest::ShortGrid => Band::Short,
            WavelengthRequest::LongGrid => Band::Long,
            WavelengthRequest::Values(wavelengths) => {
                Band::validate_batch(wavelengths)?;
                let max = wavelengths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if max < SHORT_SELECTION_LIMIT {
                    Band::Short
                } else {
                    Band::Long
                }
            }
        };

        let tai = self.clamp_date(requested, options.quiet, &mut warnings);
        debug!("Interpolating {} band fit at {}", band, tai);

        let grid = self
            .fit
            .band(band)
            .ok_or(ValidationError::InvalidWavelengths)?;
        let knot_ea = self.knot_values(grid, tai)?;

        let (wavelengths, mut values) = match request {
            WavelengthRequest::Values(wavelengths) => {
                let spline = CubicSpline::new(&grid.wave, &knot_ea)?;
                let values = wavelengths
                    .iter()
                    .map(|&w| spline.evaluate(w))
                    .collect::<Result<Vec<f64>, _>>()?;
                (wavelengths.clone(), values)
            }
            WavelengthRequest::ShortGrid | WavelengthRequest::LongGrid => {
                (grid.wave.clone(), knot_ea)
            }
        };

        if options.radcal {
            info!("Returning radcal values for converting [DN/s] to [ergs/(sr cm^2 s)]");
            info!("Note: You may still need to adjust for exposure time and slit size");
            values = self.radcal.apply(&wavelengths, &values);
        }

        Ok(EffectiveArea {
            wavelengths,
            values,
            warnings,
        })
    }
}

impl EffectiveAreaModel for Model2023 {
    fn name(&self) -> &'static str {
        "2023"
    }

    fn effective_area(
        &self,
        date: &str,
        request: &WavelengthRequest,
    ) -> CalibResult<EffectiveArea> {
        self.interpolate(&[date], request, Options2023::default())
    }
}
