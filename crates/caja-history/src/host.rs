//! # Host Bridge
//!
//! Side effects the page hands to its host: saving a file, navigating to a
//! URL and showing a blocking alert.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::HostError;

/// Host environment effects.
pub trait HostBridge: Send + Sync {
    /// Saves `bytes` under the suggested `filename`.
    fn save_document(&self, filename: &str, bytes: &[u8]) -> Result<(), HostError>;

    /// Opens `url` in a new browsing context.
    fn open_url(&self, url: &str) -> Result<(), HostError>;

    /// Shows a blocking message to the operator.
    fn alert(&self, message: &str);
}

/// Host for running outside a browser.
///
/// Documents go to a directory; URLs and alerts are printed to the
/// terminal.
#[derive(Debug, Clone)]
pub struct FsHost {
    out_dir: PathBuf,
}

impl FsHost {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        FsHost {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl HostBridge for FsHost {
    fn save_document(&self, filename: &str, bytes: &[u8]) -> Result<(), HostError> {
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(filename);
        std::fs::write(&path, bytes)?;
        info!(?path, bytes = bytes.len(), "Document saved");
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        println!("{}", url);
        Ok(())
    }

    fn alert(&self, message: &str) {
        warn!(alert = message, "Operator alert");
        eprintln!("⚠ {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_document_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let host = FsHost::new(dir.path().join("boletas"));

        host.save_document("boleta_1042.prn", &[0x1B, b'@']).unwrap();

        let written = std::fs::read(host.out_dir().join("boleta_1042.prn")).unwrap();
        assert_eq!(written, [0x1B, b'@']);
    }

    #[test]
    fn test_save_document_into_a_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let host = FsHost::new(&blocker);
        let err = host.save_document("boleta_1.prn", b"data").unwrap_err();
        assert!(matches!(err, HostError::Io(_)));
    }
}
