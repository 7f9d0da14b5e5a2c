//! X-ray enhancement: non-local-means denoising followed by CLAHE.
//!
//! Both filters are deterministic and keep the input dimensions. The input
//! buffer is never modified.

mod clahe;
mod nl_means;

use image::GrayImage;
use std::ops::RangeInclusive;

use crate::image_pipeline::ImageError;

pub use clahe::equalize_adaptive;
pub use nl_means::denoise;

pub const DENOISE_STRENGTH_RANGE: RangeInclusive<u8> = 1..=20;
pub const CONTRAST_LIMIT_RANGE: RangeInclusive<f32> = 1.0..=5.0;
pub const DEFAULT_DENOISE_STRENGTH: u8 = 10;
pub const DEFAULT_CONTRAST_LIMIT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhancementParameters {
    denoise_strength: u8,
    contrast_limit: f32,
}

impl Default for EnhancementParameters {
    fn default() -> Self {
        Self {
            denoise_strength: DEFAULT_DENOISE_STRENGTH,
            contrast_limit: DEFAULT_CONTRAST_LIMIT,
        }
    }
}

impl EnhancementParameters {
    pub fn new(denoise_strength: u8, contrast_limit: f32) -> Result<Self, ImageError> {
        if !DENOISE_STRENGTH_RANGE.contains(&denoise_strength) {
            return Err(ImageError::ParameterOutOfRange {
                name: "Denoising strength",
                min: f32::from(*DENOISE_STRENGTH_RANGE.start()),
                max: f32::from(*DENOISE_STRENGTH_RANGE.end()),
                value: f32::from(denoise_strength),
            });
        }
        if !CONTRAST_LIMIT_RANGE.contains(&contrast_limit) {
            return Err(ImageError::ParameterOutOfRange {
                name: "Contrast limit",
                min: *CONTRAST_LIMIT_RANGE.start(),
                max: *CONTRAST_LIMIT_RANGE.end(),
                value: contrast_limit,
            });
        }
        Ok(Self {
            denoise_strength,
            contrast_limit,
        })
    }

    pub fn denoise_strength(&self) -> u8 {
        self.denoise_strength
    }

    pub fn contrast_limit(&self) -> f32 {
        self.contrast_limit
    }
}

pub fn enhance(image: &GrayImage, params: &EnhancementParameters) -> GrayImage {
    let (width, height) = image.dimensions();
    log::debug!(
        "Enhancing {width}x{height} image (h={}, clip={})",
        params.denoise_strength(),
        params.contrast_limit()
    );
    let denoised = denoise(image, f32::from(params.denoise_strength()));
    equalize_adaptive(&denoised, params.contrast_limit())
}

/// Border index for reflect-101 (`gfedcb|abcdefgh|gfedcba`).
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    let last = len as isize - 1;
    if last <= 0 {
        return 0;
    }
    let mut index = index;
    loop {
        if index < 0 {
            index = -index;
        } else if index > last {
            index = 2 * last - index;
        } else {
            return index as usize;
        }
    }
}
