use std::fmt::Display;

use crate::error::ValidationError;

// Band limits in Å
pub const SW_MIN: f64 = 165.0;
pub const SW_MAX: f64 = 213.0;
pub const LW_MIN: f64 = 245.0;
pub const LW_MAX: f64 = 292.0;

/// Batches whose largest wavelength is below this use the short-band fit.
pub const SHORT_SELECTION_LIMIT: f64 = 220.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Short,
    Long,
    None,
}

fn p_short(wavelength: f64) -> f64 {
    (wavelength - SW_MIN) * (SW_MAX - wavelength)
}

fn p_long(wavelength: f64) -> f64 {
    (wavelength - LW_MIN) * (LW_MAX - wavelength)
}

impl Band {
    /// Band of `wavelength`, band edges included.
    pub fn classify(wavelength: f64) -> Self {
        if p_long(wavelength) >= 0.0 {
            Band::Long
        } else if p_short(wavelength) >= 0.0 {
            Band::Short
        } else {
            Band::None
        }
    }

    /// Band of `wavelength`, band edges excluded.
    pub fn classify_strict(wavelength: f64) -> Self {
        if p_long(wavelength) > 0.0 {
            Band::Long
        } else if p_short(wavelength) > 0.0 {
            Band::Short
        } else {
            Band::None
        }
    }

    /// Checks that every wavelength of a batch lies strictly inside one and
    /// the same band, and returns that band.
    pub fn validate_batch(wavelengths: &[f64]) -> Result<Band, ValidationError> {
        if wavelengths.is_empty() {
            return Err(ValidationError::EmptyWavelengths);
        }

        let (mut n_short, mut n_long) = (0, 0);
        for &wavelength in wavelengths {
            match Band::classify_strict(wavelength) {
                Band::Short => n_short += 1,
                Band::Long => n_long += 1,
                Band::None => {}
            }
        }

        if n_short + n_long < wavelengths.len() || (n_short > 0 && n_long > 0) {
            return Err(ValidationError::InvalidWavelengths);
        }

        Ok(if n_short > 0 { Band::Short } else { Band::Long })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::Short => "SW",
            Band::Long => "LW",
            Band::None => "",
        }
    }
}

impl Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Short => write!(f, "short ({SW_MIN}-{SW_MAX} Å)"),
            Band::Long => write!(f, "long ({LW_MIN}-{LW_MAX} Å)"),
            Band::None => write!(f, "out of band"),
        }
    }
}
