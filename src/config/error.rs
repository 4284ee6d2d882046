use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No fit_eis_ea_*.json file found in {0}")]
    MissingFitFile(PathBuf),
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}
