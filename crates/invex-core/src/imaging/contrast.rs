//! Contrast-limited adaptive histogram equalization.

use image::{GrayImage, Luma};

/// Equalize contrast per tile, with the histogram clipped at `clip_limit`
/// times the uniform bin height.
///
/// The image is split into a `grid` x `grid` arrangement of tiles, each
/// tile gets its own clipped-histogram lookup table, and every pixel is
/// remapped by bilinear interpolation between the four nearest tile
/// tables. Clipping excess is redistributed evenly, which caps how much
/// any single gray level can be stretched.
pub fn equalize_contrast(image: &GrayImage, clip_limit: f32, grid: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let grid = grid.max(1);
    let tile_w = width.div_ceil(grid);
    let tile_h = height.div_ceil(grid);
    // Small images can have fewer populated tiles than requested.
    let grid_x = width.div_ceil(tile_w) as usize;
    let grid_y = height.div_ceil(tile_h) as usize;

    let mut tables = vec![[0u8; 256]; grid_x * grid_y];
    for ty in 0..grid_y {
        for tx in 0..grid_x {
            let x0 = tx as u32 * tile_w;
            let y0 = ty as u32 * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);

            let mut histogram = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    histogram[image.get_pixel(x, y)[0] as usize] += 1;
                }
            }

            let area = (x1 - x0) as u64 * (y1 - y0) as u64;
            clip_histogram(&mut histogram, clip_limit, area);

            let table = &mut tables[ty * grid_x + tx];
            let mut cumulative = 0u64;
            for value in 0..256 {
                cumulative += histogram[value] as u64;
                table[value] = ((cumulative * 255) as f64 / area as f64).round() as u8;
            }
        }
    }

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        let fy = (y as f32 + 0.5) / tile_h as f32 - 0.5;
        let row = fy.floor();
        let wy = fy - row;
        let j0 = (row.max(0.0) as usize).min(grid_y - 1);
        let j1 = ((row + 1.0).max(0.0) as usize).min(grid_y - 1);

        for x in 0..width {
            let fx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
            let col = fx.floor();
            let wx = fx - col;
            let i0 = (col.max(0.0) as usize).min(grid_x - 1);
            let i1 = ((col + 1.0).max(0.0) as usize).min(grid_x - 1);

            let value = image.get_pixel(x, y)[0] as usize;
            let top = (1.0 - wx) * tables[j0 * grid_x + i0][value] as f32
                + wx * tables[j0 * grid_x + i1][value] as f32;
            let bottom = (1.0 - wx) * tables[j1 * grid_x + i0][value] as f32
                + wx * tables[j1 * grid_x + i1][value] as f32;
            let blended = (1.0 - wy) * top + wy * bottom;

            output.put_pixel(x, y, Luma([blended.round().clamp(0.0, 255.0) as u8]));
        }
    }
    output
}

/// Cap each bin at `clip_limit` times the uniform height and spread the
/// removed counts evenly over all bins.
fn clip_histogram(histogram: &mut [u32; 256], clip_limit: f32, area: u64) {
    let clip = ((clip_limit * area as f32) / 256.0).max(1.0) as u32;

    let mut excess = 0u64;
    for bin in histogram.iter_mut() {
        if *bin > clip {
            excess += (*bin - clip) as u64;
            *bin = clip;
        }
    }

    let batch = (excess / 256) as u32;
    let remainder = (excess % 256) as usize;
    for (value, bin) in histogram.iter_mut().enumerate() {
        *bin += batch + u32::from(value < remainder);
    }
}
