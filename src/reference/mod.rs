//! Calibration reference datasets.
//!
//! The reference data (2014 decay parameters, 2023 fitted time series and
//! the preflight curves) is loaded once, validated, and then only read.

pub mod json;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::PathBuf;

use tracing::info;

pub use json::JsonReader;
pub use types::{
    Calibration2014, DecayKnots, FileError, FileType, FitCalibration2023, FitCalibrationFile,
    KnotGrid, PreflightCurve, ReadError, ReferenceReader,
};
pub use utils::reader_from_filetype;

use crate::bands::Band;

/// Locations of the reference files. The 2023 fit file is only needed by the
/// 2023 model and may be absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePaths {
    pub nrl_2014: PathBuf,
    pub fit_2023: Option<PathBuf>,
    pub preflight_short: PathBuf,
    pub preflight_long: PathBuf,
}

impl ReferencePaths {
    fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.nrl_2014, &self.preflight_short, &self.preflight_long]
            .into_iter()
            .chain(self.fit_2023.as_ref())
    }
}

pub fn create_reader(paths: ReferencePaths) -> Result<Box<dyn ReferenceReader>, FileError> {
    for path in paths.iter() {
        match reader_from_filetype(path)? {
            FileType::Json => {}
        }
    }
    Ok(Box::new(JsonReader { paths }))
}

/// All reference datasets, validated.
#[derive(Debug, Clone)]
pub struct ReferenceDatasets {
    pub nrl_2014: Calibration2014,
    pub fit_2023: FitCalibration2023,
    pub preflight_short: PreflightCurve,
    pub preflight_long: PreflightCurve,
}

impl ReferenceDatasets {
    pub fn load(reader: &dyn ReferenceReader) -> Result<Self, ReadError> {
        let nrl_2014 = reader.read_nrl_2014()?;
        nrl_2014.validate()?;

        let fit_2023 = reader.read_fit_2023()?;
        fit_2023.validate()?;

        let (preflight_short, preflight_long) = read_preflight_curves(reader)?;

        info!(
            "Loaded reference datasets: {} fit dates ({} to {})",
            fit_2023.dates.len(),
            fit_2023.first_date().1,
            fit_2023.last_date().1
        );

        Ok(Self {
            nrl_2014,
            fit_2023,
            preflight_short,
            preflight_long,
        })
    }
}

/// Both preflight curves, validated.
pub fn read_preflight_curves(
    reader: &dyn ReferenceReader,
) -> Result<(PreflightCurve, PreflightCurve), ReadError> {
    let short = reader.read_preflight(Band::Short)?;
    short.validate()?;
    let long = reader.read_preflight(Band::Long)?;
    long.validate()?;
    Ok((short, long))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    fn write(path: &Path, value: &serde_json::Value) {
        let mut file = File::create(path).unwrap();
        file.write_all(value.to_string().as_bytes()).unwrap();
    }

    fn write_fixture_files(dir: &Path) -> ReferencePaths {
        let paths = ReferencePaths {
            nrl_2014: dir.join("eis_calib_warren_2014.json"),
            fit_2023: Some(dir.join("fit_eis_ea_2023-05-04.json")),
            preflight_short: dir.join("preflight_calib_short.json"),
            preflight_long: dir.join("preflight_calib_long.json"),
        };
        write(&paths.nrl_2014, &fixtures::nrl_2014_json());
        write(
            paths.fit_2023.as_deref().unwrap(),
            &fixtures::fit_2023_json(),
        );
        write(&paths.preflight_short, &fixtures::preflight_short_json());
        write(&paths.preflight_long, &fixtures::preflight_long_json());
        paths
    }

    #[test]
    fn test_load_json_datasets() {
        let dir = tempdir().unwrap();
        let paths = write_fixture_files(dir.path());

        let reader = create_reader(paths).unwrap();
        let datasets = ReferenceDatasets::load(reader.as_ref()).unwrap();

        assert_eq!(datasets.fit_2023.dates.len(), 3);
        assert_eq!(datasets.fit_2023.short.wave, fixtures::SW_KNOTS.to_vec());
        assert_eq!(datasets.nrl_2014.wave_knots_lw, fixtures::LW_KNOTS.to_vec());
        assert_eq!(datasets.preflight_long.ea.len(), fixtures::LW_KNOTS.len());
    }

    #[test]
    fn test_create_reader_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let mut paths = write_fixture_files(dir.path());
        paths.nrl_2014 = dir.path().join("eis_calib_warren_2014.sav");

        assert!(matches!(
            create_reader(paths),
            Err(FileError::UnknownFileType(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let paths = write_fixture_files(dir.path());
        std::fs::remove_file(&paths.preflight_short).unwrap();

        let reader = create_reader(paths).unwrap();
        assert!(matches!(
            ReferenceDatasets::load(reader.as_ref()),
            Err(ReadError::Io { .. })
        ));
    }

    #[test]
    fn test_missing_fit_file_only_fails_fit_read() {
        let dir = tempdir().unwrap();
        let mut paths = write_fixture_files(dir.path());
        paths.fit_2023 = None;

        let reader = create_reader(paths).unwrap();
        assert!(reader.read_nrl_2014().is_ok());
        assert!(read_preflight_curves(reader.as_ref()).is_ok());
        assert!(matches!(reader.read_fit_2023(), Err(ReadError::NoFitFile)));
        assert!(matches!(
            ReferenceDatasets::load(reader.as_ref()),
            Err(ReadError::NoFitFile)
        ));
    }

    #[test]
    fn test_fit_dates_must_increase() {
        let mut file: FitCalibrationFile =
            serde_json::from_value(fixtures::fit_2023_json()).unwrap();
        file.date_obs.swap(0, 1);

        assert!(matches!(
            FitCalibration2023::try_from(file),
            Err(ReadError::Invalid(_))
        ));
    }

    #[test]
    fn test_fit_grid_shape_is_checked() {
        let mut file: FitCalibrationFile =
            serde_json::from_value(fixtures::fit_2023_json()).unwrap();
        file.lw_ea[2].pop();

        assert!(matches!(
            FitCalibration2023::try_from(file),
            Err(ReadError::Invalid(_))
        ));
    }

    #[test]
    fn test_decay_parameter_lengths_are_checked() {
        let mut calibration = fixtures::nrl_2014();
        assert!(calibration.validate().is_ok());

        calibration.tau_sw.pop();
        assert!(matches!(
            calibration.validate(),
            Err(ReadError::Invalid(_))
        ));

        // A single value applies to every knot
        calibration.tau_sw = vec![10.0];
        assert!(calibration.validate().is_ok());
    }

    #[test]
    fn test_hand_built_fit_is_validated() {
        let mut fit = fixtures::fit_2023();
        assert!(fit.validate().is_ok());

        fit.dates.clear();
        fit.date_obs.clear();
        assert!(matches!(fit.validate(), Err(ReadError::Invalid(_))));
    }

    #[test]
    fn test_preflight_curve_validation() {
        let curve = PreflightCurve {
            wave: vec![170.0, 180.0],
            ea: vec![0.1, 0.0],
        };
        assert!(curve.validate().is_err());

        let curve = PreflightCurve {
            wave: vec![180.0, 170.0],
            ea: vec![0.1, 0.2],
        };
        assert!(curve.validate().is_err());
    }
}
