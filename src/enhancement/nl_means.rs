use image::GrayImage;

use super::reflect_101;

pub const TEMPLATE_WINDOW: usize = 7;
pub const SEARCH_WINDOW: usize = 21;

const TEMPLATE_RADIUS: usize = TEMPLATE_WINDOW / 2;
const SEARCH_RADIUS: usize = SEARCH_WINDOW / 2;
const PATCH_AREA: u64 = (TEMPLATE_WINDOW * TEMPLATE_WINDOW) as u64;
const MAX_AVERAGE_DISTANCE: usize = 255 * 255;

/// Non-local-means denoising of a grayscale image.
///
/// Every output pixel is the weighted mean of the pixels in its 21x21 search
/// window. The weight of a candidate is `exp(-d / h²)` where `d` is the mean
/// squared difference between the 7x7 patches around the two pixels.
///
/// Patch distances are computed one search offset at a time: the squared
/// difference between the image and its shifted copy is summed into an
/// integral image, so each patch sum is four lookups.
pub fn denoise(image: &GrayImage, strength: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return image.clone();
    }

    let margin = SEARCH_RADIUS + TEMPLATE_RADIUS;
    let padded_width = w + 2 * margin;
    let padded = pad_reflect(image, margin);

    let weights = weight_table(strength);

    // Squared differences are needed for every pixel whose patch can be
    // touched: the image grown by the template radius.
    let region_width = w + 2 * TEMPLATE_RADIUS;
    let region_height = h + 2 * TEMPLATE_RADIUS;
    let integral_stride = region_width + 1;
    let mut integral = vec![0u64; integral_stride * (region_height + 1)];

    let mut weight_sums = vec![0f64; w * h];
    let mut value_sums = vec![0f64; w * h];

    let search = SEARCH_RADIUS as isize;
    for dy in -search..=search {
        for dx in -search..=search {
            for ry in 0..region_height {
                let py = ry + SEARCH_RADIUS;
                let qy = (py as isize + dy) as usize;
                let mut row_sum = 0u64;
                for rx in 0..region_width {
                    let px = rx + SEARCH_RADIUS;
                    let qx = (px as isize + dx) as usize;
                    let diff = i32::from(padded[py * padded_width + px])
                        - i32::from(padded[qy * padded_width + qx]);
                    row_sum += (diff * diff) as u64;
                    integral[(ry + 1) * integral_stride + rx + 1] =
                        integral[ry * integral_stride + rx + 1] + row_sum;
                }
            }

            for y in 0..h {
                let top = y * integral_stride;
                let bottom = (y + TEMPLATE_WINDOW) * integral_stride;
                let qy = (y + margin) as isize + dy;
                for x in 0..w {
                    let left = x;
                    let right = x + TEMPLATE_WINDOW;
                    let ssd = integral[bottom + right] + integral[top + left]
                        - integral[top + right]
                        - integral[bottom + left];
                    let distance = (ssd / PATCH_AREA) as usize;
                    let weight = weights[distance.min(MAX_AVERAGE_DISTANCE)];
                    if weight == 0.0 {
                        continue;
                    }

                    let qx = (x + margin) as isize + dx;
                    let candidate = padded[qy as usize * padded_width + qx as usize];
                    let index = y * w + x;
                    weight_sums[index] += weight;
                    value_sums[index] += weight * f64::from(candidate);
                }
            }
        }
    }

    let pixels = value_sums
        .iter()
        .zip(&weight_sums)
        .map(|(value, weight)| (value / weight).round().clamp(0.0, 255.0) as u8)
        .collect();

    GrayImage::from_raw(width, height, pixels).unwrap_or_else(|| image.clone())
}

/// `exp(-d / h²)` for every integer mean patch distance `d`.
fn weight_table(strength: f32) -> Vec<f64> {
    let h2 = f64::from(strength.max(f32::EPSILON)).powi(2);
    (0..=MAX_AVERAGE_DISTANCE)
        .map(|distance| (-(distance as f64) / h2).exp())
        .collect()
}

fn pad_reflect(image: &GrayImage, margin: usize) -> Vec<u8> {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let padded_width = w + 2 * margin;
    let padded_height = h + 2 * margin;
    let raw = image.as_raw();

    let columns: Vec<usize> = (0..padded_width)
        .map(|px| reflect_101(px as isize - margin as isize, w))
        .collect();

    let mut padded = Vec::with_capacity(padded_width * padded_height);
    for py in 0..padded_height {
        let sy = reflect_101(py as isize - margin as isize, h);
        let row = &raw[sy * w..(sy + 1) * w];
        padded.extend(columns.iter().map(|&sx| row[sx]));
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn variance(image: &GrayImage) -> f64 {
        let raw = image.as_raw();
        let mean = raw.iter().map(|&v| f64::from(v)).sum::<f64>() / raw.len() as f64;
        raw.iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / raw.len() as f64
    }

    #[test]
    fn constant_image_is_unchanged() {
        let flat = GrayImage::from_pixel(17, 11, Luma([97]));
        assert_eq!(denoise(&flat, 10.0), flat);
    }

    #[test]
    fn noise_on_flat_field_is_reduced() {
        let noisy = GrayImage::from_fn(32, 32, |x, y| {
            let jitter = ((x * 7919 + y * 104_729) % 11) as u8;
            Luma([120 + jitter])
        });
        let denoised = denoise(&noisy, 15.0);
        assert!(variance(&denoised) < variance(&noisy) / 2.0);
    }

    #[test]
    fn strong_edges_survive() {
        let edge = GrayImage::from_fn(30, 30, |x, _| Luma([if x < 15 { 20 } else { 230 }]));
        let denoised = denoise(&edge, 10.0);
        assert!(denoised.get_pixel(5, 10)[0] < 40);
        assert!(denoised.get_pixel(25, 10)[0] > 210);
    }

    #[test]
    fn weights_fall_with_distance() {
        let table = weight_table(10.0);
        assert_eq!(table[0], 1.0);
        assert!(table[100] < table[10]);
        assert_eq!(table.len(), MAX_AVERAGE_DISTANCE + 1);
    }

    #[test]
    fn padding_reflects_borders() {
        let image = GrayImage::from_raw(3, 1, vec![1, 2, 3]).unwrap();
        let padded = pad_reflect(&image, 2);
        // 5 rows of the same reflected line
        assert_eq!(&padded[0..7], &[3, 2, 1, 2, 3, 2, 1]);
        assert_eq!(padded.len(), 7 * 5);
    }
}
