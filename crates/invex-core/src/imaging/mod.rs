//! Image conditioning for OCR: denoising, contrast equalization, and
//! binarization.

mod binarize;
mod contrast;
mod denoise;

pub use binarize::adaptive_threshold;
pub use contrast::equalize_contrast;
pub use denoise::denoise;

use image::{DynamicImage, GrayImage};
use tracing::debug;

use crate::error::{ConditionError, Result};
use crate::models::ConditioningConfig;

/// Conditions raster pages so the recognition engine sees clean,
/// high-contrast black-on-white text.
#[derive(Debug, Clone)]
pub struct PageConditioner {
    config: ConditioningConfig,
}

impl PageConditioner {
    /// Create a conditioner with the given settings.
    pub fn new(config: ConditioningConfig) -> Self {
        Self { config }
    }

    /// Run the full conditioning chain on a decoded page.
    ///
    /// Stages run in a fixed order: grayscale, denoise, contrast
    /// equalization, binarization.
    pub fn condition(&self, page: &DynamicImage) -> Result<GrayImage> {
        let gray = page.to_luma8();
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(ConditionError::InvalidImage("image has zero area".to_string()).into());
        }
        debug!(width, height, "conditioning page");

        let denoised = denoise(
            &gray,
            self.config.denoise_strength,
            self.config.denoise_patch,
            self.config.denoise_search,
        );
        let equalized = equalize_contrast(&denoised, self.config.clip_limit, self.config.tile_grid);
        let binary = adaptive_threshold(
            &equalized,
            self.config.block_size,
            self.config.threshold_bias,
        );

        Ok(binary)
    }
}

/// Round even kernel or window sides up to the next odd value.
pub(crate) fn force_odd(side: u32) -> u32 {
    if side % 2 == 0 { side + 1 } else { side }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvexError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_condition_produces_binary_output() {
        let page = DynamicImage::ImageLuma8(GrayImage::from_fn(32, 24, |x, _| {
            image::Luma([if x % 8 < 2 { 60 } else { 210 }])
        }));

        let conditioner = PageConditioner::new(ConditioningConfig::default());
        let binary = conditioner.condition(&page).unwrap();

        assert_eq!(binary.dimensions(), (32, 24));
        assert!(binary.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_condition_rejects_zero_area_image() {
        let page = DynamicImage::new_luma8(0, 0);
        let conditioner = PageConditioner::new(ConditioningConfig::default());

        let result = conditioner.condition(&page);
        assert!(matches!(
            result,
            Err(InvexError::Condition(ConditionError::InvalidImage(_)))
        ));
    }

    #[test]
    fn test_force_odd() {
        assert_eq!(force_odd(11), 11);
        assert_eq!(force_odd(10), 11);
        assert_eq!(force_odd(0), 1);
        assert_eq!(force_odd(1), 1);
    }
}
