//! Tesseract subprocess recognition backend.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{OcrError, Result};
use crate::models::OcrConfig;

/// Runs the system `tesseract` binary against conditioned page images.
///
/// The engine is invoked once per page with output on stdout. The spawned
/// process is killed if the surrounding future is dropped, so a timed-out
/// or cancelled page does not leave tesseract running.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    config: OcrConfig,
}

impl TesseractRecognizer {
    /// Create a recognizer with the given engine settings.
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }
}

impl super::TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, page: &Path) -> Result<String> {
        debug!(page = %page.display(), "invoking tesseract");

        let output = Command::new(&self.config.tesseract_path)
            .arg(page)
            .arg("stdout")
            .arg("-l")
            .arg(self.config.language_arg())
            .arg("--oem")
            .arg(self.config.oem.to_string())
            .arg("--psm")
            .arg(self.config.psm.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(OcrError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(stderr.trim().to_string()).into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvexError;
    use crate::ocr::TextRecognizer;

    #[tokio::test]
    async fn test_missing_binary_is_an_io_error() {
        let config = OcrConfig {
            tesseract_path: "/nonexistent/bin/tesseract".to_string(),
            ..OcrConfig::default()
        };
        let recognizer = TesseractRecognizer::new(config);

        let result = recognizer.recognize(Path::new("page.png")).await;
        assert!(matches!(result, Err(InvexError::Ocr(OcrError::Io(_)))));
    }
}
