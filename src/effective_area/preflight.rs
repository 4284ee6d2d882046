use super::{CalibWarning, EffectiveArea, EffectiveAreaModel, WavelengthRequest};
use crate::bands::Band;
use crate::error::{CalibResult, ValidationError};
use crate::interp::interp_clamped;
use crate::reference::{
    PreflightCurve, ReadError, ReferenceDatasets, ReferenceReader, read_preflight_curves,
};

/// Launch-time effective area, independent of the observation date.
#[derive(Debug, Clone)]
pub struct PreflightEffectiveArea {
    short: PreflightCurve,
    long: PreflightCurve,
    log_short: Vec<f64>,
    log_long: Vec<f64>,
}

impl PreflightEffectiveArea {
    pub fn new(short: PreflightCurve, long: PreflightCurve) -> Result<Self, ReadError> {
        short.validate()?;
        long.validate()?;

        let log_short = short.ea.iter().map(|ea| ea.ln()).collect();
        let log_long = long.ea.iter().map(|ea| ea.ln()).collect();
        Ok(Self {
            short,
            long,
            log_short,
            log_long,
        })
    }

    pub fn from_datasets(datasets: &ReferenceDatasets) -> Result<Self, ReadError> {
        Self::new(
            datasets.preflight_short.clone(),
            datasets.preflight_long.clone(),
        )
    }

    pub fn from_reader(reader: &dyn ReferenceReader) -> Result<Self, ReadError> {
        let (short, long) = read_preflight_curves(reader)?;
        Self::new(short, long)
    }

    /// Raw wavelength grid and effective area of one band.
    pub fn read(&self, band: Band) -> Result<(&[f64], &[f64]), ValidationError> {
        match band {
            Band::Short => Ok((self.short.wave.as_slice(), self.short.ea.as_slice())),
            Band::Long => Ok((self.long.wave.as_slice(), self.long.ea.as_slice())),
            Band::None => Err(ValidationError::NoPreflightCurve),
        }
    }

    pub fn effective_area(&self, request: &WavelengthRequest) -> CalibResult<EffectiveArea> {
        let wavelengths = match request {
            WavelengthRequest::ShortGrid | WavelengthRequest::LongGrid => {
                let band = if *request == WavelengthRequest::ShortGrid {
                    Band::Short
                } else {
                    Band::Long
                };
                let (wave, ea) = self.read(band)?;
                return Ok(EffectiveArea {
                    wavelengths: wave.to_vec(),
                    values: ea.to_vec(),
                    warnings: Vec::new(),
                });
            }
            WavelengthRequest::Values(wavelengths) => wavelengths,
        };

        let mut warnings = Vec::new();
        let mut values = Vec::with_capacity(wavelengths.len());
        for &wavelength in wavelengths {
            let (wave, log_ea) = match Band::classify_strict(wavelength) {
                Band::Short => (&self.short.wave, &self.log_short),
                Band::Long => (&self.long.wave, &self.log_long),
                Band::None => {
                    CalibWarning::OutOfBand { wavelength }.emit(&mut warnings);
                    values.push(0.0);
                    continue;
                }
            };
            values.push(interp_clamped(wavelength, wave, log_ea)?.exp());
        }

        Ok(EffectiveArea {
            wavelengths: wavelengths.clone(),
            values,
            warnings,
        })
    }
}

impl EffectiveAreaModel for PreflightEffectiveArea {
    fn name(&self) -> &'static str {
        "preflight"
    }

    fn effective_area(
        &self,
        _date: &str,
        request: &WavelengthRequest,
    ) -> CalibResult<EffectiveArea> {
        PreflightEffectiveArea::effective_area(self, request)
    }
}
