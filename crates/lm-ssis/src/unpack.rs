//! ISPAC archive unpacking
//!
//! Exported SSIS projects arrive as one folder per project, each holding an
//! `.ispac` deployment archive. Unpacking inflates the archive in place and
//! normalizes the `%20` escapes the catalog leaves in package file names.

use crate::error::{SsisError, SsisResult};
use log::{info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use zip::ZipArchive;

/// Delete and recreate a directory
pub fn recreate_dir(dir: &Path) -> SsisResult<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Immediate subdirectories of a directory
pub fn project_folders(dir: &Path) -> SsisResult<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| SsisError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let path = entry?.path();
        if path.is_dir() {
            folders.push(path);
        }
    }
    folders.sort();
    Ok(folders)
}

/// All files under `dir` (recursively) with the given extension
pub fn files_with_extension(dir: &Path, extension: &str) -> SsisResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
            {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Extract every `.ispac` archive in a project folder into that folder
pub fn extract_ispac_files(folder: &Path) -> SsisResult<usize> {
    let mut extracted = 0;
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if !path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("ispac"))
        {
            continue;
        }
        let file = File::open(&path).map_err(|e| SsisError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut archive = ZipArchive::new(file)?;
        archive.extract(folder)?;
        info!("Extracted {} to {}", path.display(), folder.display());
        extracted += 1;
    }
    Ok(extracted)
}

/// Rename `.dtsx` files replacing `%20` escapes with spaces.
///
/// Renames are skipped when the normalized name already exists.
pub fn normalize_dtsx_names(folder: &Path) -> SsisResult<()> {
    for path in files_with_extension(folder, "dtsx")? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.contains("%20") {
            continue;
        }
        let new_path = path.with_file_name(name.replace("%20", " "));
        if !new_path.exists() {
            std::fs::rename(&path, &new_path)?;
        }
    }
    Ok(())
}

/// Unpack every project folder under `dir`, at most `concurrency` archives
/// at a time. Failures are logged and the remaining folders continue.
///
/// Returns the number of folders that unpacked cleanly.
pub async fn unpack_all(dir: &Path, concurrency: usize) -> SsisResult<usize> {
    let folders = project_folders(dir)?;
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::new();

    for folder in folders {
        let semaphore = Arc::clone(&semaphore);
        handles.push(tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => return false,
            };
            let result = tokio::task::spawn_blocking(move || {
                extract_ispac_files(&folder)?;
                normalize_dtsx_names(&folder)?;
                Ok::<_, SsisError>(folder)
            })
            .await;

            match result {
                Ok(Ok(folder)) => {
                    info!("Unpacked {}", folder.display());
                    true
                }
                Ok(Err(e)) => {
                    warn!("Unpack failed: {e}");
                    false
                }
                Err(e) => {
                    warn!("Unpack task panicked: {e}");
                    false
                }
            }
        }));
    }

    let mut unpacked = 0;
    for handle in handles {
        if matches!(handle.await, Ok(true)) {
            unpacked += 1;
        }
    }
    Ok(unpacked)
}

#[cfg(test)]
#[path = "unpack_test.rs"]
mod tests;
