use glob::{Pattern, glob};
use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;
use tracing::{debug, info, warn};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::effective_area::RadcalConstants;
use crate::reference::ReferencePaths;

pub mod error;
pub use error::ConfigError;

const FIT_FILE_PATTERN: &str = "fit_eis_ea_*.json";

#[derive(Debug, Clone)]
pub struct Config {
    calibration_dir: PathBuf,
    nrl_2014_file: String,
    fit_2023_file: Option<String>,
    preflight_short_file: String,
    preflight_long_file: String,
    radcal: RadcalConstants,
}

// Fills in the default reference file names and rejects empty names.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            calibration_dir: PathBuf,
            nrl_2014_file: Option<String>,
            fit_2023_file: Option<String>,
            preflight_short_file: Option<String>,
            preflight_long_file: Option<String>,
            #[serde(default)]
            radcal: RadcalConstants,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        if helper.calibration_dir.as_os_str().is_empty() {
            return Err(D::Error::custom("calibration_dir cannot be empty"));
        }

        let file_name = |name: Option<String>, default: &str, key: &str| match name {
            Some(name) if name.trim().is_empty() => {
                Err(D::Error::custom(format!("{} cannot be empty", key)))
            }
            Some(name) => Ok(name),
            None => Ok(default.to_string()),
        };

        let nrl_2014_file = file_name(
            helper.nrl_2014_file,
            "eis_calib_warren_2014.json",
            "nrl_2014_file",
        )?;
        let preflight_short_file = file_name(
            helper.preflight_short_file,
            "preflight_calib_short.json",
            "preflight_short_file",
        )?;
        let preflight_long_file = file_name(
            helper.preflight_long_file,
            "preflight_calib_long.json",
            "preflight_long_file",
        )?;
        let fit_2023_file = helper
            .fit_2023_file
            .map(|name| file_name(Some(name), "", "fit_2023_file"))
            .transpose()?;

        Ok(Config {
            calibration_dir: helper.calibration_dir,
            nrl_2014_file,
            fit_2023_file,
            preflight_short_file,
            preflight_long_file,
            radcal: helper.radcal,
        })
    }
}

impl Config {
    pub fn new<P: Into<PathBuf>>(calibration_dir: P) -> Self {
        Self {
            calibration_dir: calibration_dir.into(),
            nrl_2014_file: "eis_calib_warren_2014.json".to_string(),
            fit_2023_file: None,
            preflight_short_file: "preflight_calib_short.json".to_string(),
            preflight_long_file: "preflight_calib_long.json".to_string(),
            radcal: RadcalConstants::default(),
        }
    }

    /// Reads a JSON configuration. A relative `calibration_dir` is taken
    /// relative to the directory holding the configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        if config.calibration_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.calibration_dir = parent.join(&config.calibration_dir);
            }
        }

        Ok(config)
    }

    pub fn calibration_dir(&self) -> &Path {
        &self.calibration_dir
    }

    pub fn radcal(&self) -> RadcalConstants {
        self.radcal
    }

    /// Full paths of the reference files. Without a configured fit file the
    /// newest one in the calibration directory is used, if there is one.
    pub fn reference_paths(&self) -> Result<ReferencePaths, ConfigError> {
        let fit_2023 = match &self.fit_2023_file {
            Some(name) => Some(self.calibration_dir.join(name)),
            None => match latest_fit_file(&self.calibration_dir) {
                Ok(path) => Some(path),
                Err(ConfigError::MissingFitFile(dir)) => {
                    debug!("No fit file in {}", dir.display());
                    None
                }
                Err(e) => return Err(e),
            },
        };

        Ok(ReferencePaths {
            nrl_2014: self.calibration_dir.join(&self.nrl_2014_file),
            fit_2023,
            preflight_short: self.calibration_dir.join(&self.preflight_short_file),
            preflight_long: self.calibration_dir.join(&self.preflight_long_file),
        })
    }
}

/// Newest `fit_eis_ea_*.json` in `dir`. File names carry the fit date, so the
/// last one in lexicographic order is the newest.
pub fn latest_fit_file(dir: &Path) -> Result<PathBuf, ConfigError> {
    let pattern = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        FIT_FILE_PATTERN
    );

    let mut files = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => warn!("Error accessing fit file: {}", e),
        }
    }

    files.sort();
    let latest = files
        .pop()
        .ok_or_else(|| ConfigError::MissingFitFile(dir.to_path_buf()))?;
    info!("Using fit file {}", latest.display());
    Ok(latest)
}
