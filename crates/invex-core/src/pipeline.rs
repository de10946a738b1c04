//! End-to-end document processing pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future;
use serde::{Deserialize, Serialize};
use tokio::task;
use tokio::time;
use tracing::{debug, info, warn};

use crate::error::{DocumentError, InvexError, OcrError, Result};
use crate::fields::{self, ExtractedFields, FieldRule};
use crate::imaging::PageConditioner;
use crate::models::InvexConfig;
use crate::ocr::TextRecognizer;
use crate::raster::PageRasterizer;

/// Text recognized from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number.
    pub page: u32,
    /// Raw recognizer output for the page.
    pub text: String,
}

/// Page texts joined into one document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedText {
    /// Trimmed page texts joined with newlines, in page order.
    pub text: String,
    /// Number of pages that contributed text.
    pub pages_processed: u32,
}

/// Result envelope returned for a successfully processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionEnvelope {
    /// Always `"success"`; failures surface as errors instead.
    pub status: String,
    /// Extracted fields, with explicit nulls for absent ones.
    pub data: ExtractedFields,
    pub metadata: EnvelopeMetadata,
}

/// Counters describing what the pipeline saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    /// Pages that contributed text to the aggregate.
    pub pages_processed: u32,
    /// Length of the aggregated text in characters.
    pub text_length: u64,
}

enum DocumentKind {
    Pdf,
    Image,
}

/// Drives a document from file to extracted fields.
///
/// Pages are rasterized and recognized concurrently; conditioning runs on
/// the blocking thread pool. All intermediate page images live in a
/// per-call scratch directory that is removed when processing finishes,
/// succeeds or not.
pub struct DocumentPipeline<R, T> {
    rasterizer: R,
    recognizer: T,
    conditioner: Arc<PageConditioner>,
    config: InvexConfig,
    rules: Vec<FieldRule>,
}

impl<R: PageRasterizer, T: TextRecognizer> DocumentPipeline<R, T> {
    /// Create a pipeline with the built-in extraction rules.
    pub fn new(rasterizer: R, recognizer: T, config: InvexConfig) -> Self {
        let conditioner = Arc::new(PageConditioner::new(config.conditioning.clone()));
        Self {
            rasterizer,
            recognizer,
            conditioner,
            config,
            rules: fields::built_in_rules(),
        }
    }

    /// Replace the extraction rule set.
    pub fn with_rules(mut self, rules: Vec<FieldRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Process one document end to end.
    pub async fn process(&self, document: &Path) -> Result<ExtractionEnvelope> {
        let kind = self.check_intake(document)?;
        let scratch = tempfile::tempdir()?;
        info!(document = %document.display(), "processing document");

        let aggregated = match kind {
            DocumentKind::Pdf => self.process_pdf(document, scratch.path()).await?,
            DocumentKind::Image => {
                let outcome = self.recognize_page(document, 1, scratch.path()).await;
                aggregate_pages(vec![outcome])
            }
        };

        if aggregated.pages_processed == 0 {
            return Err(DocumentError::NoExtractableContent.into());
        }

        let data = fields::extract_fields(&aggregated.text, &self.rules);
        Ok(ExtractionEnvelope {
            status: "success".to_string(),
            data,
            metadata: EnvelopeMetadata {
                pages_processed: aggregated.pages_processed,
                text_length: aggregated.text.chars().count() as u64,
            },
        })
    }

    /// Reject unsupported and oversized files before any page work.
    fn check_intake(&self, document: &Path) -> Result<DocumentKind> {
        let extension = document
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !self.config.intake.is_allowed(&extension) {
            return Err(DocumentError::UnsupportedFileType(extension).into());
        }

        let size = std::fs::metadata(document)?.len();
        if size > self.config.intake.max_file_size_bytes() {
            return Err(DocumentError::FileTooLarge {
                size,
                limit_mb: self.config.intake.max_file_size_mb,
            }
            .into());
        }

        Ok(if extension == "pdf" {
            DocumentKind::Pdf
        } else {
            DocumentKind::Image
        })
    }

    async fn process_pdf(&self, document: &Path, scratch: &Path) -> Result<AggregatedText> {
        let pages = self.rasterizer.probe(document)?;
        info!(pages, "document probed");

        let tasks = (1..=pages).map(|page| self.process_pdf_page(document, page, scratch));
        let outcomes = future::join_all(tasks).await;
        Ok(aggregate_pages(outcomes))
    }

    async fn process_pdf_page(
        &self,
        document: &Path,
        page: u32,
        scratch: &Path,
    ) -> Result<PageText> {
        let rendered = self.rasterizer.rasterize(document, page, scratch).await?;
        self.recognize_page(&rendered, page, scratch).await
    }

    /// Condition a page image on the blocking pool, then recognize it
    /// under the configured timeout.
    async fn recognize_page(&self, source: &Path, page: u32, scratch: &Path) -> Result<PageText> {
        let conditioner = self.conditioner.clone();
        let source = source.to_path_buf();
        let conditioned = scratch.join(format!("conditioned_{page:04}.png"));
        let target = conditioned.clone();

        task::spawn_blocking(move || -> Result<()> {
            let decoded = image::open(&source)?;
            let binary = conditioner.condition(&decoded)?;
            binary.save(&target)?;
            Ok(())
        })
        .await
        .map_err(|e| InvexError::Worker(e.to_string()))??;

        let timeout = Duration::from_secs(self.config.ocr.timeout_secs);
        let text = match time::timeout(timeout, self.recognizer.recognize(&conditioned)).await {
            Ok(recognized) => recognized?,
            Err(_) => {
                return Err(OcrError::Timeout {
                    secs: self.config.ocr.timeout_secs,
                }
                .into());
            }
        };

        Ok(PageText { page, text })
    }
}

/// Join page texts in page order.
///
/// Failed pages are logged and skipped rather than failing the document;
/// blank pages are skipped silently. `pages_processed` counts only the
/// pages that contributed text.
fn aggregate_pages(outcomes: Vec<Result<PageText>>) -> AggregatedText {
    let mut texts = Vec::new();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(page) => {
                let trimmed = page.text.trim();
                if trimmed.is_empty() {
                    debug!(page = page.page, "page produced no text");
                } else {
                    texts.push(trimmed.to_string());
                }
            }
            Err(error) => {
                warn!(page = index + 1, %error, "page skipped");
            }
        }
    }

    AggregatedText {
        pages_processed: texts.len() as u32,
        text: texts.join("\n"),
    }
}
