use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    Calibration2014, FitCalibration2023, FitCalibrationFile, PreflightCurve, ReadError,
    ReferencePaths, ReferenceReader,
};
use crate::bands::Band;

/// Reads reference datasets exported to JSON.
pub struct JsonReader {
    pub paths: ReferencePaths,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReadError> {
    debug!("Reading reference file {}", path.display());

    let file = File::open(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| ReadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl ReferenceReader for JsonReader {
    fn read_nrl_2014(&self) -> Result<Calibration2014, ReadError> {
        read_json(&self.paths.nrl_2014)
    }

    fn read_fit_2023(&self) -> Result<FitCalibration2023, ReadError> {
        let path = self.paths.fit_2023.as_ref().ok_or(ReadError::NoFitFile)?;
        let file: FitCalibrationFile = read_json(path)?;
        FitCalibration2023::try_from(file)
    }

    fn read_preflight(&self, band: Band) -> Result<PreflightCurve, ReadError> {
        match band {
            Band::Short => read_json(&self.paths.preflight_short),
            Band::Long => read_json(&self.paths.preflight_long),
            Band::None => Err(ReadError::Invalid(
                "no preflight curve outside the short and long bands".to_string(),
            )),
        }
    }
}
