use serde::Deserialize;

/// Instrument constants for converting an effective area into a
/// radiometric calibration curve, [DN/s] to [ergs/(sr cm^2 s)].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RadcalConstants {
    /// Solid angle of one arcsec^2 seen from 1 AU, (725 km / 1 AU)^2
    pub sr_factor: f64,
    /// h c with the wavelength in Å, [erg Å]
    pub ergs_to_photons: f64,
    /// Detector gain [electrons/DN]
    pub gain: f64,
    /// Electrons per photon at 1 Å, 12398.5 eV / 3.65 eV
    pub phot_to_elec: f64,
}

impl Default for RadcalConstants {
    fn default() -> Self {
        Self {
            sr_factor: (725.0_f64 / 1.496e8).powi(2),
            ergs_to_photons: 6.626e-27 * 2.998e10 * 1.0e8,
            gain: 6.3,
            phot_to_elec: 12398.5 / 3.65,
        }
    }
}

impl RadcalConstants {
    /// Radcal value at one wavelength [Å] for an effective area [cm^2].
    pub fn radcal(&self, wavelength: f64, effective_area: f64) -> f64 {
        // [DN/s] to [photons/(arcsec^2 cm^2 s)]
        let photons = (wavelength * self.gain) / (effective_area * self.phot_to_elec);
        photons * self.ergs_to_photons / wavelength / self.sr_factor
    }

    pub fn apply(&self, wavelengths: &[f64], effective_area: &[f64]) -> Vec<f64> {
        wavelengths
            .iter()
            .zip(effective_area)
            .map(|(&w, &ea)| self.radcal(w, ea))
            .collect()
    }
}
