//! Input validation: check the source path before the splitter touches it.
//!
//! lopdf reports a corrupt document for anything that is not a PDF, which
//! makes for a confusing message when the user passed a JPEG or a text file
//! by mistake. Checking the `%PDF` magic bytes up front turns that into a
//! precise [`OcrError::NotAPdf`] with the offending bytes in the message.

use crate::error::OcrError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists, is readable, and starts with `%PDF`.
///
/// Returns the path unchanged on success so callers can chain it into the
/// splitter.
pub fn validate_pdf_path(path: &Path) -> Result<PathBuf, OcrError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(OcrError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(OcrError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(OcrError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(OcrError::FileNotFound { path });
        }
    }

    debug!("Validated source PDF: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let err = validate_pdf_path(Path::new("/definitely/not/a/real/file.pdf")).unwrap_err();
        assert!(matches!(err, OcrError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"hello world").unwrap();

        let err = validate_pdf_path(&path).unwrap_err();
        match err {
            OcrError::NotAPdf { magic, .. } => assert_eq!(&magic, b"hell"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[test]
    fn pdf_magic_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.5\n").unwrap();

        let validated = validate_pdf_path(&path).unwrap();
        assert_eq!(validated, path);
    }
}
