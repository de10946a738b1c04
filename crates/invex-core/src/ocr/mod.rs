//! Text recognition backends.

mod tesseract;

pub use tesseract::TesseractRecognizer;

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::error::{OcrError, Result};

/// A text recognition backend.
///
/// Implementations receive the path of a conditioned page image and return
/// the raw recognized text. Futures must be `Send` so pages can be
/// recognized concurrently from a multi-threaded runtime.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, page: &Path) -> impl Future<Output = Result<String>> + Send;
}

/// Scripted outcome for one page of a [`MockRecognizer`].
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this text.
    Text(String),
    /// Fail with an engine error carrying this message.
    Fail(String),
    /// Sleep for the given duration, then return empty text.
    Stall(Duration),
}

/// Recognizer with canned responses, keyed by page file name.
///
/// Used by the pipeline tests, and handy for exercising the rest of the
/// stack on machines without tesseract installed.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    responses: HashMap<String, MockOutcome>,
    fallback: Option<MockOutcome>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for pages whose file name equals `name`.
    pub fn with_page(mut self, name: &str, outcome: MockOutcome) -> Self {
        self.responses.insert(name.to_string(), outcome);
        self
    }

    /// Outcome for pages without a scripted entry; unset means empty text.
    pub fn with_fallback(mut self, outcome: MockOutcome) -> Self {
        self.fallback = Some(outcome);
        self
    }
}

impl TextRecognizer for MockRecognizer {
    async fn recognize(&self, page: &Path) -> Result<String> {
        let name = page
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match self.responses.get(&name).or(self.fallback.as_ref()) {
            Some(MockOutcome::Text(text)) => Ok(text.clone()),
            Some(MockOutcome::Fail(message)) => Err(OcrError::Engine(message.clone()).into()),
            Some(MockOutcome::Stall(delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(String::new())
            }
            None => Ok(String::new()),
        }
    }
}
