//! Input resolution: validate the user-supplied source path.
//!
//! The PDF magic bytes (`%PDF`) are checked before the path reaches the
//! document engine, so callers get a meaningful error rather than an opaque
//! engine failure when they point the converter at a JPEG or a text file.

use crate::error::Pdf2ImgError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a source path, validating existence, readability, and PDF magic
/// bytes.
pub fn resolve_document(path: &Path) -> Result<PathBuf, Pdf2ImgError> {
    if !path.exists() {
        return Err(Pdf2ImgError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2ImgError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2ImgError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Pdf2ImgError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved source PDF: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let err = resolve_document(Path::new("/definitely/not/a/real/file.pdf")).unwrap_err();
        assert!(matches!(err, Pdf2ImgError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.pdf");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n").unwrap();

        let err = resolve_document(&path).unwrap_err();
        match err {
            Pdf2ImgError::NotAPdf { magic, .. } => assert_eq!(&magic, b"\x89PNG"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.7\n%stub\n").unwrap();

        let resolved = resolve_document(&path).unwrap();
        assert_eq!(resolved, path);
    }
}
