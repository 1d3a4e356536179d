//! Various utility functions, primarily wrapping the standard library's IO and filesystem functions

use crate::error::FileError;
use std::{
    fs::{self, File},
    path::Path,
};

pub fn open_file(path: impl AsRef<Path>) -> Result<File, FileError> {
    let path = path.as_ref();
    File::open(path).map_err(|e| FileError::FileOpen(path.to_path_buf(), e))
}

/// Note: creates all intermediary directories if needed.
pub fn create_file<P: AsRef<Path>>(path: P) -> Result<File, FileError> {
    let path = path.as_ref();
    log::trace!("creating file at {}", path.display());
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent)?;
        }
    }
    File::create(path).map_err(|e| FileError::FileCreate(path.to_path_buf(), e))
}

/// Creates the directory and all of its missing parents. An existing directory is not an error.
pub fn create_dir_all<P: AsRef<Path>>(path: P) -> Result<(), FileError> {
    let path = path.as_ref();
    if path.is_file() {
        return Err(FileError::UnexpectedFile(path.to_path_buf()));
    }
    fs::create_dir_all(path).map_err(|e| FileError::DirCreate(path.to_path_buf(), e))
}
