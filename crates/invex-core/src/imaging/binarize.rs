//! Adaptive Gaussian binarization.

use image::{GrayImage, Luma};

use super::force_odd;

/// Binarize against a Gaussian-weighted local mean.
///
/// A pixel becomes white (255) when it is brighter than the weighted mean
/// of its `block_size`-sided neighborhood minus `bias`, black (0)
/// otherwise. The Gaussian is separable, so the mean is computed with a
/// horizontal pass followed by a vertical pass; borders clamp to the edge
/// pixel.
pub fn adaptive_threshold(image: &GrayImage, block_size: u32, bias: i32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let block = force_odd(block_size);
    let kernel = gaussian_kernel(block);
    let half = (block / 2) as i64;

    let w = width as i64;
    let h = height as i64;
    let pixels = image.as_raw();

    let mut rows = vec![0.0f32; pixels.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x + k as i64 - half).clamp(0, w - 1);
                acc += weight * pixels[(y * w + sx) as usize] as f32;
            }
            rows[(y * w + x) as usize] = acc;
        }
    }

    let mut output = GrayImage::new(width, height);
    for y in 0..h {
        for x in 0..w {
            let mut mean = 0.0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y + k as i64 - half).clamp(0, h - 1);
                mean += weight * rows[(sy * w + x) as usize];
            }

            let threshold = mean - bias as f32;
            let pixel = pixels[(y * w + x) as usize] as f32;
            let value = if pixel > threshold { 255 } else { 0 };
            output.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }
    output
}

/// Normalized 1-D Gaussian weights with the sigma convention used by the
/// usual adaptive-threshold implementations:
/// `sigma = 0.3 * ((side - 1) * 0.5 - 1) + 0.8`.
fn gaussian_kernel(side: u32) -> Vec<f32> {
    let sigma = 0.3 * ((side as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (side / 2) as i32;

    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f32 = kernel.iter().sum();
    for weight in kernel.iter_mut() {
        *weight /= total;
    }
    kernel
}
