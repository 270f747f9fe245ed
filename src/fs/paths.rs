//! Path and directory management.

use std::path::Path;

use crate::error::{Error, Result};

/// Ensure the download directory exists and is a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }

    if !path.is_dir() {
        return Err(Error::Config(format!(
            "Download path {} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

/// Whether a regular file already exists at `path`.
pub async fn file_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("downloads").join("1003");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("taken");
        std::fs::write(&file, b"x").unwrap();
        assert!(ensure_dir(&file).is_err());
    }

    #[tokio::test]
    async fn test_file_exists() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("a.jpg");
        assert!(!file_exists(&file).await);
        std::fs::write(&file, b"x").unwrap();
        assert!(file_exists(&file).await);
        assert!(!file_exists(temp.path()).await);
    }
}
