//! Input validation: make sure every path handed to the batch core is a
//! readable PDF file.
//!
//! The drivers assume validated input. Checking up front means a typo in
//! the fifth path fails the run before the first four are summarised.

use crate::error::SummarizeError;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Validate that `path` exists, is a regular file, is readable and starts
/// with the `%PDF` magic bytes.
pub fn validate_input(path: &Path) -> Result<(), SummarizeError> {
    if !path.exists() {
        return Err(SummarizeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if path.is_dir() {
        return Err(SummarizeError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(SummarizeError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(SummarizeError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(SummarizeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Validated input PDF: {}", path.display());
    Ok(())
}

/// Validate every path, stopping at the first bad one.
pub fn validate_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<(), SummarizeError> {
    paths.iter().try_for_each(|p| validate_input(p.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file() {
        let err = validate_input(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, SummarizeError::FileNotFound { .. }));
    }

    #[test]
    fn directory_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = validate_input(tmp.path()).unwrap_err();
        assert!(matches!(err, SummarizeError::NotAFile { .. }));
    }

    #[test]
    fn non_pdf_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.pdf");
        std::fs::write(&path, b"hello world").unwrap();
        let err = validate_input(&path).unwrap_err();
        match err {
            SummarizeError::NotAPdf { magic, .. } => assert_eq!(&magic, b"hell"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pdf_magic_passes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.pdf");
        std::fs::write(&path, b"%PDF-1.7\n%fake").unwrap();
        validate_input(&path).unwrap();
        validate_inputs(&[path.clone(), path]).unwrap();
    }
}
