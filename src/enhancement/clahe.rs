use image::GrayImage;

use super::reflect_101;

/// Tiles per axis.
pub const TILE_GRID: usize = 8;

const BINS: usize = 256;

/// Contrast-limited adaptive histogram equalization on an 8x8 tile grid.
///
/// Images whose sides are not multiples of the grid are virtually extended
/// to the right and bottom with reflect-101 borders before the tile
/// histograms are built. Output pixels blend the lookup tables of the four
/// nearest tile centres bilinearly.
pub fn equalize_adaptive(image: &GrayImage, clip_limit: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return image.clone();
    }

    let tile_width = w.div_ceil(TILE_GRID);
    let tile_height = h.div_ceil(TILE_GRID);
    let tile_area = tile_width * tile_height;

    let clip = if clip_limit > 0.0 {
        ((clip_limit * tile_area as f32 / BINS as f32) as usize).max(1)
    } else {
        usize::MAX
    };

    let raw = image.as_raw();
    let mut luts = vec![[0u8; BINS]; TILE_GRID * TILE_GRID];
    for ty in 0..TILE_GRID {
        for tx in 0..TILE_GRID {
            let mut histogram = [0usize; BINS];
            for y in ty * tile_height..(ty + 1) * tile_height {
                let sy = reflect_101(y as isize, h);
                for x in tx * tile_width..(tx + 1) * tile_width {
                    let sx = reflect_101(x as isize, w);
                    histogram[usize::from(raw[sy * w + sx])] += 1;
                }
            }
            clip_histogram(&mut histogram, clip);
            luts[ty * TILE_GRID + tx] = build_lut(&histogram, tile_area);
        }
    }

    let columns: Vec<(usize, usize, f32)> = (0..w)
        .map(|x| neighbour_tiles(x, tile_width))
        .collect();

    let mut output = Vec::with_capacity(w * h);
    for y in 0..h {
        let (ty1, ty2, ya) = neighbour_tiles(y, tile_height);
        let upper = ty1 * TILE_GRID;
        let lower = ty2 * TILE_GRID;
        for (x, &(tx1, tx2, xa)) in columns.iter().enumerate() {
            let value = usize::from(raw[y * w + x]);
            let top = f32::from(luts[upper + tx1][value]) * (1.0 - xa)
                + f32::from(luts[upper + tx2][value]) * xa;
            let bottom = f32::from(luts[lower + tx1][value]) * (1.0 - xa)
                + f32::from(luts[lower + tx2][value]) * xa;
            let blended = top * (1.0 - ya) + bottom * ya;
            output.push(blended.round().clamp(0.0, 255.0) as u8);
        }
    }

    GrayImage::from_raw(width, height, output).unwrap_or_else(|| image.clone())
}

/// Caps every bin at `clip` and spreads the excess over all bins: an even
/// share first, then the remainder one count at a time at a fixed stride.
fn clip_histogram(histogram: &mut [usize; BINS], clip: usize) {
    let mut clipped = 0;
    for bin in histogram.iter_mut() {
        if *bin > clip {
            clipped += *bin - clip;
            *bin = clip;
        }
    }

    let batch = clipped / BINS;
    let mut residual = clipped - batch * BINS;
    for bin in histogram.iter_mut() {
        *bin += batch;
    }

    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut index = 0;
        while index < BINS && residual > 0 {
            histogram[index] += 1;
            index += step;
            residual -= 1;
        }
    }
}

fn build_lut(histogram: &[usize; BINS], tile_area: usize) -> [u8; BINS] {
    let scale = (BINS - 1) as f32 / tile_area as f32;
    let mut lut = [0u8; BINS];
    let mut cumulative = 0;
    for (entry, &count) in lut.iter_mut().zip(histogram) {
        cumulative += count;
        *entry = (cumulative as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// The two tiles whose centres surround `position` and the blend factor
/// towards the second one.
fn neighbour_tiles(position: usize, tile_size: usize) -> (usize, usize, f32) {
    let tile_f = position as f32 / tile_size as f32 - 0.5;
    let first = tile_f.floor();
    let fraction = tile_f - first;
    let first = first as isize;
    let second = (first + 1).min(TILE_GRID as isize - 1) as usize;
    (first.max(0) as usize, second, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn spread(image: &GrayImage) -> u8 {
        let raw = image.as_raw();
        raw.iter().max().unwrap() - raw.iter().min().unwrap()
    }

    #[test]
    fn low_contrast_gradient_is_stretched() {
        let dull = GrayImage::from_fn(128, 128, |x, y| Luma([100 + ((x + y) / 8) as u8]));
        let equalized = equalize_adaptive(&dull, 4.0);
        assert!(spread(&equalized) > spread(&dull));
    }

    #[test]
    fn higher_clip_limit_gives_more_contrast() {
        let dull = GrayImage::from_fn(128, 128, |x, y| Luma([90 + ((x * 3 + y) % 24) as u8]));
        let gentle = equalize_adaptive(&dull, 1.0);
        let strong = equalize_adaptive(&dull, 5.0);
        assert!(spread(&strong) >= spread(&gentle));
    }

    #[test]
    fn monotonic_within_a_single_tile_lut() {
        let mut histogram = [0usize; BINS];
        histogram[10] = 40;
        histogram[200] = 24;
        clip_histogram(&mut histogram, 8);
        let lut = build_lut(&histogram, 64);
        assert!(lut.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn clipping_preserves_total_count() {
        let mut histogram = [0usize; BINS];
        histogram[0] = 1000;
        histogram[128] = 300;
        clip_histogram(&mut histogram, 50);
        assert_eq!(histogram.iter().sum::<usize>(), 1300);
        assert!(histogram[0] <= 50 + 1300 / BINS + 1);
    }

    #[test]
    fn odd_sizes_are_handled() {
        let image = GrayImage::from_fn(13, 5, |x, y| Luma([(x * 19 + y * 5) as u8]));
        let equalized = equalize_adaptive(&image, 2.0);
        assert_eq!(equalized.dimensions(), (13, 5));
    }

    #[test]
    fn neighbour_tiles_clamp_at_edges() {
        assert_eq!(neighbour_tiles(0, 10), (0, 0, 0.5));
        let (first, second, _) = neighbour_tiles(79, 10);
        assert_eq!((first, second), (7, 7));
        let (first, second, fraction) = neighbour_tiles(15, 10);
        assert_eq!((first, second), (1, 2));
        assert!(fraction.abs() < 1e-6);
    }
}
