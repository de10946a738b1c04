//! PDF page rasterization backends.

mod poppler;

pub use poppler::PopplerRasterizer;

use std::future::Future;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};

use crate::error::{RasterError, Result};

/// Renders the pages of a PDF document into per-page images.
pub trait PageRasterizer: Send + Sync {
    /// Validate the document and return its page count.
    ///
    /// Encrypted documents that cannot be opened with an empty password
    /// and documents without pages are rejected here, before any page
    /// work starts.
    fn probe(&self, document: &Path) -> Result<u32>;

    /// Render one page (1-based) into `scratch` and return the image path.
    fn rasterize(
        &self,
        document: &Path,
        page: u32,
        scratch: &Path,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Rasterizer that synthesizes blank pages, for tests and offline runs.
///
/// The document content is ignored; `probe` reports a fixed page count and
/// `rasterize` writes a small flat-gray PNG per page.
#[derive(Debug, Clone)]
pub struct MockRasterizer {
    pages: u32,
}

impl MockRasterizer {
    pub fn new(pages: u32) -> Self {
        Self { pages }
    }
}

impl PageRasterizer for MockRasterizer {
    fn probe(&self, _document: &Path) -> Result<u32> {
        if self.pages == 0 {
            return Err(RasterError::NoPages.into());
        }
        Ok(self.pages)
    }

    async fn rasterize(&self, _document: &Path, page: u32, scratch: &Path) -> Result<PathBuf> {
        let path = scratch.join(format!("page_{page:04}-mock.png"));
        let blank = GrayImage::from_pixel(48, 48, Luma([240]));
        blank.save(&path)?;
        Ok(path)
    }
}
