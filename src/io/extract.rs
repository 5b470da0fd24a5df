//! Single-file zip extraction.
//!
//! Zip is the only archive format supported: a zipped asset must contain
//! exactly one file, which becomes the installed binary.

use std::fs::File;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Expected exactly one file in zip archive, found {found}")]
    NotSingleFile { found: usize },
}

/// Extract the single file from a zip archive at `archive` into `dest`.
pub fn extract_single_zip_entry(archive: &Path, dest: &Path) -> Result<(), ExtractError> {
    let mut zip = zip::ZipArchive::new(File::open(archive)?)?;

    let mut file_indices = Vec::new();
    for index in 0..zip.len() {
        if zip.by_index(index)?.is_file() {
            file_indices.push(index);
        }
    }

    match file_indices.as_slice() {
        [index] => {
            let mut entry = zip.by_index(*index)?;
            let mut out = File::create(dest)?;
            std::io::copy(&mut entry, &mut out)?;
            Ok(())
        }
        other => Err(ExtractError::NotSingleFile { found: other.len() }),
    }
}
