//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the invex pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// Text recognition configuration.
    pub ocr: OcrConfig,

    /// PDF rasterization configuration.
    pub raster: RasterConfig,

    /// Image conditioning configuration.
    pub conditioning: ConditioningConfig,

    /// Document intake configuration.
    pub intake: IntakeConfig,
}

impl Default for InvexConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            raster: RasterConfig::default(),
            conditioning: ConditioningConfig::default(),
            intake: IntakeConfig::default(),
        }
    }
}

/// Text recognition engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path or name of the tesseract binary.
    pub tesseract_path: String,

    /// Recognition languages, combined with `+` on the command line.
    pub languages: Vec<String>,

    /// Tesseract page segmentation mode.
    pub psm: u8,

    /// Tesseract OCR engine mode.
    pub oem: u8,

    /// Per-page recognition timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            languages: vec!["eng".to_string(), "ind".to_string()],
            psm: 6,
            oem: 3,
            timeout_secs: 30,
        }
    }
}

impl OcrConfig {
    /// The `-l` argument value, e.g. `eng+ind`.
    pub fn language_arg(&self) -> String {
        self.languages.join("+")
    }
}

/// PDF rasterization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Path or name of the pdftoppm binary.
    pub pdftoppm_path: String,

    /// DPI for rendering PDF pages to images.
    pub dpi: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            pdftoppm_path: "pdftoppm".to_string(),
            dpi: 200,
        }
    }
}

/// Image conditioning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditioningConfig {
    /// Denoising filter strength.
    pub denoise_strength: f32,

    /// Denoising comparison patch side in pixels (forced odd).
    pub denoise_patch: u32,

    /// Denoising search window side in pixels (forced odd).
    pub denoise_search: u32,

    /// Contrast equalization clip limit.
    pub clip_limit: f32,

    /// Contrast equalization tile grid side (grid x grid tiles).
    pub tile_grid: u32,

    /// Binarization neighborhood side in pixels (forced odd).
    pub block_size: u32,

    /// Subtracted from the local mean before thresholding.
    pub threshold_bias: i32,
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            denoise_strength: 10.0,
            denoise_patch: 7,
            denoise_search: 21,
            clip_limit: 3.0,
            tile_grid: 8,
            block_size: 11,
            threshold_bias: 2,
        }
    }
}

/// Document intake configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Accepted file extensions, lowercase and without the dot.
    pub allowed_extensions: Vec<String>,

    /// Maximum document size in megabytes.
    pub max_file_size_mb: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![
                "pdf".to_string(),
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
            ],
            max_file_size_mb: 5,
        }
    }
}

impl IntakeConfig {
    /// Whether `extension` (without the dot) is accepted, case-insensitively.
    pub fn is_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }

    /// The size limit in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl InvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
