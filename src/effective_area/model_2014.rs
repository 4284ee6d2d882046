use tracing::debug;

use super::{CalibWarning, EffectiveArea, EffectiveAreaModel, WavelengthRequest};
use crate::bands::Band;
use crate::error::CalibResult;
use crate::interp::interp_bounded;
use crate::reference::{Calibration2014, DecayKnots, ReadError, ReferenceReader};
use crate::time::{ScaleA, to_scale_a};

/// Effective area model of Warren et al. (2014): each knot decays
/// exponentially from the reference epoch, and the curve is interpolated
/// linearly in log space between knots.
#[derive(Debug, Clone)]
pub struct Model2014 {
    calibration: Calibration2014,
    t0: ScaleA,
}

/// A single value applies to every knot.
fn knot_param(values: &[f64], i: usize) -> f64 {
    if values.len() == 1 { values[0] } else { values[i] }
}

fn log_knot_effective_area(knots: &DecayKnots<'_>, years: f64) -> Vec<f64> {
    (0..knots.wave_knots.len())
        .map(|i| {
            let ea = knot_param(knots.a0, i) * (-years / knot_param(knots.tau, i)).exp();
            ea.ln()
        })
        .collect()
}

impl Model2014 {
    pub fn new(calibration: Calibration2014) -> Result<Self, ReadError> {
        calibration.validate()?;
        let t0 = calibration.reference_epoch()?;
        Ok(Self { calibration, t0 })
    }

    pub fn from_reader(reader: &dyn ReferenceReader) -> Result<Self, ReadError> {
        Self::new(reader.read_nrl_2014()?)
    }

    /// Years elapsed between the reference epoch and `date`.
    pub fn elapsed_years(&self, date: &str) -> CalibResult<f64> {
        Ok(to_scale_a(date)?.years_since(self.t0))
    }

    /// Effective area at the knots of `band` after `years`.
    pub fn knot_effective_area(&self, band: Band, years: f64) -> Option<Vec<f64>> {
        let knots = self.calibration.band(band)?;
        Some(
            log_knot_effective_area(&knots, years)
                .into_iter()
                .map(f64::exp)
                .collect(),
        )
    }

    pub fn effective_area(
        &self,
        date: &str,
        request: &WavelengthRequest,
    ) -> CalibResult<EffectiveArea> {
        let years = self.elapsed_years(date)?;
        debug!("{:.3} years since the 2014 model epoch {}", years, self.calibration.t0);

        let short = self.calibration.short();
        let long = self.calibration.long();
        let mut warnings = Vec::new();

        let (wavelengths, values) = match request {
            WavelengthRequest::ShortGrid | WavelengthRequest::LongGrid => {
                let knots = if *request == WavelengthRequest::ShortGrid {
                    short
                } else {
                    long
                };
                let log_ea = log_knot_effective_area(&knots, years);

                let values = knots
                    .default_grid
                    .iter()
                    .map(|&w| interp_bounded(w, knots.wave_knots, &log_ea).map(f64::exp))
                    .collect::<Result<Vec<f64>, _>>()?;
                (knots.default_grid.to_vec(), values)
            }
            WavelengthRequest::Values(wavelengths) => {
                let log_short = log_knot_effective_area(&short, years);
                let log_long = log_knot_effective_area(&long, years);

                let mut values = Vec::with_capacity(wavelengths.len());
                for &wavelength in wavelengths {
                    let (knots, log_ea) = match Band::classify(wavelength) {
                        Band::Short => (short, &log_short),
                        Band::Long => (long, &log_long),
                        Band::None => {
                            CalibWarning::OutOfBand { wavelength }.emit(&mut warnings);
                            values.push(0.0);
                            continue;
                        }
                    };
                    values.push(interp_bounded(wavelength, knots.wave_knots, log_ea)?.exp());
                }
                (wavelengths.clone(), values)
            }
        };

        Ok(EffectiveArea {
            wavelengths,
            values,
            warnings,
        })
    }
}

impl EffectiveAreaModel for Model2014 {
    fn name(&self) -> &'static str {
        "2014"
    }

    fn effective_area(
        &self,
        date: &str,
        request: &WavelengthRequest,
    ) -> CalibResult<EffectiveArea> {
        Model2014::effective_area(self, date, request)
    }
}
