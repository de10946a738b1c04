//! Poppler-backed PDF rasterization.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use lopdf::Document;
use tokio::process::Command;
use tracing::debug;

use crate::error::{RasterError, Result};
use crate::models::RasterConfig;

/// Rasterizes PDF pages by shelling out to `pdftoppm`.
///
/// Each page is rendered by its own invocation (`-f n -l n`), so pages of
/// one document can render concurrently. Like the recognizer, the spawned
/// process is killed when the future is dropped.
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    config: RasterConfig,
}

impl PopplerRasterizer {
    /// Create a rasterizer with the given renderer settings.
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }
}

impl super::PageRasterizer for PopplerRasterizer {
    fn probe(&self, document: &Path) -> Result<u32> {
        let data = std::fs::read(document).map_err(RasterError::Io)?;
        let mut doc = Document::load_mem(&data).map_err(|e| RasterError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            // Try to decrypt with empty password
            if doc.decrypt("").is_err() {
                return Err(RasterError::Encrypted.into());
            }
        }

        let pages = doc.get_pages().len() as u32;
        if pages == 0 {
            return Err(RasterError::NoPages.into());
        }
        Ok(pages)
    }

    async fn rasterize(&self, document: &Path, page: u32, scratch: &Path) -> Result<PathBuf> {
        let prefix = scratch.join(format!("page_{page:04}"));
        debug!(page, dpi = self.config.dpi, "rasterizing page");

        let output = Command::new(&self.config.pdftoppm_path)
            .arg("-png")
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg(document)
            .arg(&prefix)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(RasterError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RasterError::Render {
                page,
                message: stderr.trim().to_string(),
            }
            .into());
        }

        find_page_output(scratch, page)
    }
}

/// Locate the file pdftoppm wrote for a page.
///
/// pdftoppm pads the page number in output names to the digit count of the
/// whole document, so match on the per-page prefix instead of building a
/// fixed name.
fn find_page_output(scratch: &Path, page: u32) -> Result<PathBuf> {
    let prefix = format!("page_{page:04}-");
    for entry in std::fs::read_dir(scratch).map_err(RasterError::Io)? {
        let entry = entry.map_err(RasterError::Io)?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(&prefix) && name.ends_with(".png") {
            return Ok(entry.path());
        }
    }
    Err(RasterError::MissingPage(page).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvexError;
    use crate::raster::PageRasterizer;
    use lopdf::{Object, dictionary};
    use pretty_assertions::assert_eq;

    fn single_page_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_probe_counts_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.pdf");
        single_page_pdf(&path);

        let rasterizer = PopplerRasterizer::new(RasterConfig::default());
        assert_eq!(rasterizer.probe(&path).unwrap(), 1);
    }

    #[test]
    fn test_probe_rejects_malformed_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let rasterizer = PopplerRasterizer::new(RasterConfig::default());
        let result = rasterizer.probe(&path);
        assert!(matches!(
            result,
            Err(InvexError::Raster(RasterError::Parse(_)))
        ));
    }

    #[test]
    fn test_probe_rejects_documents_without_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(Vec::new()),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(&path).unwrap();

        let rasterizer = PopplerRasterizer::new(RasterConfig::default());
        let result = rasterizer.probe(&path);
        assert!(matches!(
            result,
            Err(InvexError::Raster(RasterError::NoPages))
        ));
    }

    #[tokio::test]
    async fn test_rasterize_missing_renderer_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.pdf");
        single_page_pdf(&path);

        let config = RasterConfig {
            pdftoppm_path: "/nonexistent/bin/pdftoppm".to_string(),
            ..RasterConfig::default()
        };
        let rasterizer = PopplerRasterizer::new(config);

        let result = rasterizer.rasterize(&path, 1, dir.path()).await;
        assert!(matches!(
            result,
            Err(InvexError::Raster(RasterError::Io(_)))
        ));
    }

    #[test]
    fn test_find_page_output_matches_any_padding() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page_0003-03.png"), b"png").unwrap();
        std::fs::write(dir.path().join("page_0001-1.png"), b"png").unwrap();

        let found = find_page_output(dir.path(), 3).unwrap();
        assert_eq!(found.file_name().unwrap(), "page_0003-03.png");

        let missing = find_page_output(dir.path(), 2);
        assert!(matches!(
            missing,
            Err(InvexError::Raster(RasterError::MissingPage(2)))
        ));
    }
}
