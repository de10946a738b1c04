//! Core library for invoice field extraction.
//!
//! This crate provides:
//! - Intake checks (file type and size limits)
//! - PDF rasterization through poppler's pdftoppm
//! - Image conditioning (denoise, contrast equalization, binarization)
//! - Text recognition through the tesseract CLI
//! - Rule-based field extraction (tax id, invoice date, total amount)

pub mod error;
pub mod models;
pub mod raster;
pub mod imaging;
pub mod ocr;
pub mod fields;
pub mod pipeline;

pub use error::{ConditionError, DocumentError, InvexError, OcrError, RasterError, Result};
pub use models::{ConditioningConfig, IntakeConfig, InvexConfig, OcrConfig, RasterConfig};
pub use raster::{MockRasterizer, PageRasterizer, PopplerRasterizer};
pub use imaging::PageConditioner;
pub use ocr::{MockOutcome, MockRecognizer, TesseractRecognizer, TextRecognizer};
pub use fields::{ExtractedFields, FieldRule, built_in_rules, extract_fields};
pub use pipeline::{DocumentPipeline, EnvelopeMetadata, ExtractionEnvelope};
