use super::types::{FileError, FileType};
use std::path::Path;

pub fn reader_from_filetype(path: &Path) -> Result<FileType, FileError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(FileType::Json),
        _ => Err(FileError::UnknownFileType(path.to_path_buf())),
    }
}
