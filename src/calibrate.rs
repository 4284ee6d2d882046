//! Rescales observed intensities from the preflight calibration to a
//! time-dependent effective area model.

use std::sync::LazyLock;

use ndarray::ArrayD;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::effective_area::{EffectiveAreaModel, WavelengthRequest};
use crate::error::{CalibError, CalibResult, ParseError, ValidationError};

static WAVELENGTH_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationMeta {
    /// Spectral line label, e.g. "Fe XII 195.119"
    pub line_id: String,
    pub date_obs: String,
}

/// A fitted line intensity map, or any array calibrated with the preflight
/// effective area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub meta: ObservationMeta,
    pub data: ArrayD<f64>,
}

/// First decimal number of a line label, in Å.
pub fn wavelength_from_label(label: &str) -> Result<f64, ParseError> {
    WAVELENGTH_LABEL
        .find(label)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| ParseError::WavelengthLabel(label.to_string()))
}

fn effective_area_at(
    model: &dyn EffectiveAreaModel,
    date: &str,
    wavelength: f64,
) -> CalibResult<f64> {
    let ea = model.effective_area(date, &WavelengthRequest::from(wavelength))?;
    // A one-wavelength request always yields one value
    Ok(ea.single().unwrap_or(0.0))
}

/// Preflight effective area over the model effective area at `wavelength`.
pub fn calibration_ratio(
    preflight: &dyn EffectiveAreaModel,
    model: &dyn EffectiveAreaModel,
    date: &str,
    wavelength: f64,
) -> CalibResult<f64> {
    let preflight_ea = effective_area_at(preflight, date, wavelength)?;
    let model_ea = effective_area_at(model, date, wavelength)?;
    let ratio = preflight_ea / model_ea;

    if ratio == 0.0 || !ratio.is_finite() {
        return Err(CalibError::Validation(ValidationError::InvalidRatio {
            wavelength,
            ratio,
        }));
    }

    Ok(ratio)
}

/// Returns a copy of `observation` with its data multiplied by the
/// calibration ratio at the observation's line wavelength and date.
pub fn apply(
    observation: &Observation,
    preflight: &dyn EffectiveAreaModel,
    model: &dyn EffectiveAreaModel,
) -> CalibResult<Observation> {
    let wavelength = wavelength_from_label(&observation.meta.line_id)?;
    let ratio = calibration_ratio(preflight, model, &observation.meta.date_obs, wavelength)?;

    info!(
        "Applying {} calibration to {} at {} (ratio {:.6})",
        model.name(),
        observation.meta.line_id,
        observation.meta.date_obs,
        ratio
    );

    Ok(Observation {
        meta: observation.meta.clone(),
        data: &observation.data * ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effective_area::{Model2014, Model2023, PreflightEffectiveArea, RadcalConstants};
    use crate::reference::fixtures;
    use approx::assert_relative_eq;
    use ndarray::{IxDyn, array};

    fn observation(line_id: &str) -> Observation {
        Observation {
            meta: ObservationMeta {
                line_id: line_id.to_string(),
                date_obs: "2015-07-01T12:00:00".to_string(),
            },
            data: array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn(),
        }
    }

    fn preflight() -> PreflightEffectiveArea {
        PreflightEffectiveArea::from_datasets(&fixtures::datasets()).unwrap()
    }

    #[test]
    fn test_wavelength_from_label() {
        assert_eq!(wavelength_from_label("Fe 195.120").unwrap(), 195.12);
        assert_eq!(wavelength_from_label("Fe XII 195.119").unwrap(), 195.119);
        assert_eq!(wavelength_from_label("Si VII 275.368 (2nd)").unwrap(), 275.368);
        assert_eq!(
            wavelength_from_label("Fe XII"),
            Err(ParseError::WavelengthLabel("Fe XII".to_string()))
        );
        assert!(wavelength_from_label("Fe 195").is_err());
    }

    #[test]
    fn test_identity_round_trip() {
        let preflight = preflight();
        let input = observation("Fe XII 195.119");

        let ratio = calibration_ratio(&preflight, &preflight, &input.meta.date_obs, 195.119)
            .unwrap();
        assert_relative_eq!(ratio, 1.0, max_relative = 1e-12);

        let output = apply(&input, &preflight, &preflight).unwrap();
        assert_eq!(output.meta, input.meta);
        for (a, b) in output.data.iter().zip(input.data.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_apply_scales_by_ratio() {
        let preflight = preflight();
        let model = Model2023::new(fixtures::fit_2023(), RadcalConstants::default()).unwrap();
        let input = observation("Fe 195.120");

        let ratio = calibration_ratio(&preflight, &model, &input.meta.date_obs, 195.12).unwrap();
        let output = apply(&input, &preflight, &model).unwrap();

        assert_eq!(output.data.shape(), input.data.shape());
        assert_relative_eq!(output.data[IxDyn(&[1, 2])], 6.0 * ratio, max_relative = 1e-12);
        // The input is left untouched
        assert_eq!(input.data[IxDyn(&[1, 2])], 6.0);
    }

    #[test]
    fn test_degradation_raises_intensity() {
        let preflight = preflight();
        let model = Model2014::new(fixtures::nrl_2014()).unwrap();

        let ratio = calibration_ratio(&preflight, &model, "2015-07-01T12:00:00", 256.32).unwrap();
        assert!(ratio > 1.0);
    }

    #[test]
    fn test_out_of_band_line_is_rejected() {
        let preflight = preflight();
        let model = Model2014::new(fixtures::nrl_2014()).unwrap();

        let result = apply(&observation("He II 230.000"), &preflight, &model);
        assert!(matches!(
            result,
            Err(CalibError::Validation(ValidationError::InvalidRatio { .. }))
        ));
    }

    #[test]
    fn test_missing_wavelength_in_label() {
        let preflight = preflight();
        let result = apply(&observation("unknown"), &preflight, &preflight);
        assert!(matches!(result, Err(CalibError::Parse(_))));
    }
}
