//! PBIX archive unpacking
//!
//! A `.pbix` file is a zip archive. Each one inflates into a sibling folder
//! named after the report, which the metadata scan then walks.

use crate::error::{PbixError, PbixResult};
use log::{info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use zip::ZipArchive;

/// All `.pbix` files under a directory, recursively
pub fn pbix_files(dir: &Path) -> PbixResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current).map_err(|e| PbixError::IoWithPath {
            path: current.display().to_string(),
            source: e,
        })? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("pbix"))
            {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Extract one archive into a folder named after the report
pub fn extract_pbix(path: &Path) -> PbixResult<PathBuf> {
    let target = path.with_extension("");
    std::fs::create_dir_all(&target)?;
    let file = File::open(path).map_err(|e| PbixError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(&target)?;
    Ok(target)
}

/// Extract every archive under `dir`, at most `concurrency` at a time.
/// Failures are logged and skipped. Returns the extracted folders.
pub async fn unpack_all(dir: &Path, concurrency: usize) -> PbixResult<Vec<PathBuf>> {
    let files = pbix_files(dir)?;
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::new();

    for path in files {
        let semaphore = Arc::clone(&semaphore);
        handles.push(tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => return None,
            };
            match tokio::task::spawn_blocking(move || extract_pbix(&path)).await {
                Ok(Ok(folder)) => {
                    info!("Extracted {}", folder.display());
                    Some(folder)
                }
                Ok(Err(e)) => {
                    warn!("PBIX extraction failed: {e}");
                    None
                }
                Err(e) => {
                    warn!("PBIX extraction task panicked: {e}");
                    None
                }
            }
        }));
    }

    let mut folders = Vec::new();
    for handle in handles {
        if let Ok(Some(folder)) = handle.await {
            folders.push(folder);
        }
    }
    folders.sort();
    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_pbix(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_pbix_files_recurses() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        write_pbix(&dir.path().join("a.pbix"), &[("x", "y")]);
        write_pbix(&dir.path().join("sub/b.pbix"), &[("x", "y")]);
        std::fs::write(dir.path().join("notes.txt"), "n").unwrap();

        assert_eq!(pbix_files(dir.path()).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unpack_all_skips_bad_archives() {
        let dir = tempfile::tempdir().unwrap();
        write_pbix(
            &dir.path().join("Sales.pbix"),
            &[("Connections.json", r#"{"Connections":[]}"#)],
        );
        std::fs::write(dir.path().join("Broken.pbix"), "not a zip").unwrap();

        let folders = unpack_all(dir.path(), 2).await.unwrap();
        assert_eq!(folders, vec![dir.path().join("Sales")]);
        assert!(dir.path().join("Sales/Connections.json").exists());
    }
}
