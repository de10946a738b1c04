//! Non-local means denoising.

use image::GrayImage;

use super::force_odd;

/// Denoise a grayscale image with a non-local means filter.
///
/// Every pixel is replaced by a weighted average of the pixels inside its
/// `search`-sided window, weighted by how similar the `patch`-sided
/// neighborhoods around source and candidate are. `strength` controls how
/// quickly weights fall off with patch distance; higher values smooth more.
///
/// Runs one pass per window offset, using an integral image over squared
/// differences so each pass costs O(pixels) regardless of patch size.
pub fn denoise(image: &GrayImage, strength: f32, patch: u32, search: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let patch = force_odd(patch) as i64;
    let search = force_odd(search) as i64;
    let half_patch = patch / 2;
    let half_search = search / 2;
    let h2 = (strength * strength).max(f32::EPSILON);

    let w = width as i64;
    let h = height as i64;
    let pixels = image.as_raw();
    let at = |x: i64, y: i64| (y * w + x) as usize;

    let mut numerator = vec![0.0f32; pixels.len()];
    let mut denominator = vec![0.0f32; pixels.len()];

    // Scratch buffers reused across window offsets.
    let mut diff2: Vec<f32> = Vec::new();
    let mut integral: Vec<f64> = Vec::new();

    for dy in -half_search..=half_search {
        for dx in -half_search..=half_search {
            // Region where both the pixel and its shifted partner exist.
            let x0 = 0.max(-dx);
            let y0 = 0.max(-dy);
            let x1 = w.min(w - dx);
            let y1 = h.min(h - dy);
            let ow = x1 - x0;
            let oh = y1 - y0;
            if ow <= 0 || oh <= 0 {
                continue;
            }

            diff2.clear();
            diff2.resize((ow * oh) as usize, 0.0);
            for cy in 0..oh {
                for cx in 0..ow {
                    let p = pixels[at(x0 + cx, y0 + cy)] as f32;
                    let q = pixels[at(x0 + cx + dx, y0 + cy + dy)] as f32;
                    diff2[(cy * ow + cx) as usize] = (p - q) * (p - q);
                }
            }

            // integral[(r, c)] = sum of diff2 over rows < r, cols < c.
            let stride = (ow + 1) as usize;
            integral.clear();
            integral.resize(stride * (oh + 1) as usize, 0.0);
            for cy in 0..oh {
                let mut row_sum = 0.0f64;
                for cx in 0..ow {
                    row_sum += diff2[(cy * ow + cx) as usize] as f64;
                    integral[(cy + 1) as usize * stride + (cx + 1) as usize] =
                        integral[cy as usize * stride + (cx + 1) as usize] + row_sum;
                }
            }

            for cy in 0..oh {
                let r0 = 0.max(cy - half_patch) as usize;
                let r1 = oh.min(cy + half_patch + 1) as usize;
                for cx in 0..ow {
                    let c0 = 0.max(cx - half_patch) as usize;
                    let c1 = ow.min(cx + half_patch + 1) as usize;

                    let patch_sum = integral[r1 * stride + c1]
                        - integral[r0 * stride + c1]
                        - integral[r1 * stride + c0]
                        + integral[r0 * stride + c0];
                    let area = ((r1 - r0) * (c1 - c0)) as f64;
                    let distance = (patch_sum / area) as f32;
                    let weight = (-distance / h2).exp();

                    let target = at(x0 + cx, y0 + cy);
                    numerator[target] += weight * pixels[at(x0 + cx + dx, y0 + cy + dy)] as f32;
                    denominator[target] += weight;
                }
            }
        }
    }

    // The zero offset always contributes weight 1, so denominators are
    // never zero.
    let mut output = GrayImage::new(width, height);
    for (i, pixel) in output.iter_mut().enumerate() {
        *pixel = (numerator[i] / denominator[i]).round().clamp(0.0, 255.0) as u8;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn noisy_image(width: u32, height: u32, seed: u64) -> GrayImage {
        let mut state = seed;
        GrayImage::from_fn(width, height, |_, _| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let noise = ((state >> 33) % 61) as i32 - 30;
            Luma([(128 + noise).clamp(0, 255) as u8])
        })
    }

    fn variance(image: &GrayImage) -> f64 {
        let n = image.as_raw().len() as f64;
        let mean = image.as_raw().iter().map(|&p| p as f64).sum::<f64>() / n;
        image
            .as_raw()
            .iter()
            .map(|&p| (p as f64 - mean) * (p as f64 - mean))
            .sum::<f64>()
            / n
    }

    #[test]
    fn test_denoise_preserves_dimensions() {
        let image = noisy_image(40, 25, 7);
        let output = denoise(&image, 10.0, 7, 21);
        assert_eq!(output.dimensions(), (40, 25));
    }

    #[test]
    fn test_denoise_reduces_noise_variance() {
        let image = noisy_image(64, 64, 0x2545F4914F6CDD1D);
        let output = denoise(&image, 10.0, 7, 21);

        assert!(variance(&output) < variance(&image) / 2.0);
    }

    #[test]
    fn test_denoise_preserves_strong_edges() {
        // Hard vertical edge, no noise: averaging must stay on-side.
        let image = GrayImage::from_fn(48, 32, |x, _| Luma([if x < 24 { 0 } else { 255 }]));
        let output = denoise(&image, 10.0, 7, 21);

        assert!(output.get_pixel(4, 16)[0] < 20);
        assert!(output.get_pixel(23, 16)[0] < 20);
        assert!(output.get_pixel(24, 16)[0] > 235);
        assert!(output.get_pixel(43, 16)[0] > 235);
    }

    #[test]
    fn test_denoise_keeps_flat_regions_flat() {
        let image = GrayImage::from_pixel(30, 30, Luma([200]));
        let output = denoise(&image, 10.0, 7, 21);

        assert!(output.pixels().all(|p| p[0] == 200));
    }
}
