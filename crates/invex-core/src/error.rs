//! Error types for the invex-core library.

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// PDF rasterization error.
    #[error("raster error: {0}")]
    Raster(#[from] RasterError),

    /// Image conditioning error.
    #[error("conditioning error: {0}")]
    Condition(#[from] ConditionError),

    /// Text recognition error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Document-level rejection.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Image decoding or encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A background worker task failed or was aborted.
    #[error("worker error: {0}")]
    Worker(String),
}

/// Errors related to probing and rasterizing PDF documents.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The renderer exited with an error for a page.
    #[error("failed to render page {page}: {message}")]
    Render { page: u32, message: String },

    /// The renderer ran but produced no output file for a page.
    #[error("no rendered output for page {0}")]
    MissingPage(u32),

    /// I/O error while reading the document or its rendered pages.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to image conditioning.
#[derive(Error, Debug)]
pub enum ConditionError {
    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to text recognition.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Recognition exceeded the configured per-page timeout.
    #[error("recognition timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The recognition engine exited with an error.
    #[error("recognition engine failed: {0}")]
    Engine(String),

    /// I/O error while invoking the recognition engine.
    #[error("failed to run recognizer: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that reject a document as a whole.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// No page produced any text.
    #[error("no extractable content found")]
    NoExtractableContent,

    /// The file extension is not in the allowed set.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The file exceeds the configured size limit.
    #[error("file size {size} bytes exceeds the {limit_mb} MB limit")]
    FileTooLarge { size: u64, limit_mb: u64 },
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
