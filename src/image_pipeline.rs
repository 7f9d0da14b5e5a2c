use dicom::object::DefaultDicomObject;
use dicom::pixeldata::{DecodedPixelData, PhotometricInterpretation, PixelDecoder};
use iced::widget::image::Handle;
use image::{GrayImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

use crate::enhancement::{enhance, EnhancementParameters};
use crate::model::{EncodedImage, EnhancedXray};

pub const PNG_MIME: &str = "image/png";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("Could not decode X-ray image: {0}")]
    InvalidImage(String),

    #[error("Could not read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Image is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Could not encode enhanced image: {0}")]
    Encode(String),

    #[error("Image processing was interrupted: {0}")]
    Interrupted(String),

    #[error("{name} must be within {min}..={max}, got {value}")]
    ParameterOutOfRange {
        name: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
}

/// Decoding of raster and DICOM inputs into 8-bit grayscale, plus the
/// conversions needed to show and transmit the result.
pub struct XrayImagePipeline;

impl XrayImagePipeline {
    /// Raster input (JPEG/PNG), reduced to luma.
    pub fn decode_raster(bytes: &[u8]) -> Result<GrayImage, ImageError> {
        image::load_from_memory(bytes)
            .map(|image| image.to_luma8())
            .map_err(|err| ImageError::InvalidImage(err.to_string()))
    }

    pub fn decode_dicom_first_frame(object: &DefaultDicomObject) -> Result<GrayImage, ImageError> {
        let decoded = object.decode_pixel_data().map_err(|err| {
            ImageError::InvalidImage(format!("Failed to decode pixel data: {err}"))
        })?;

        if decoded.number_of_frames() == 0 {
            return Err(ImageError::InvalidImage(String::from(
                "DICOM file contains no image frames",
            )));
        }

        match decoded.photometric_interpretation() {
            photometric if photometric.is_monochrome() && decoded.samples_per_pixel() == 1 => {
                Self::monochrome_frame(&decoded, 0)
            }
            other => Self::fallback_to_luma(&decoded, 0, other),
        }
    }

    fn monochrome_frame(decoded: &DecodedPixelData<'_>, frame_idx: u32) -> Result<GrayImage, ImageError> {
        let width = decoded.columns();
        let height = decoded.rows();
        let invert = matches!(
            decoded.photometric_interpretation(),
            PhotometricInterpretation::Monochrome1
        );

        let gray = if decoded.bits_allocated() <= 8 {
            let samples = decoded
                .to_vec_frame::<u8>(frame_idx)
                .map_err(|err| ImageError::InvalidImage(format!("Failed to read frame: {err}")))?;
            samples
                .into_iter()
                .map(|value| if invert { 255 - value } else { value })
                .collect::<Vec<u8>>()
        } else {
            let samples = decoded
                .to_vec_frame::<u16>(frame_idx)
                .map_err(|err| ImageError::InvalidImage(format!("Failed to read frame: {err}")))?;
            let (min, max) = min_max_u16(&samples).unwrap_or((0, 0));
            samples
                .into_iter()
                .map(|value| {
                    let gray = normalize_u16(value, min, max);
                    if invert {
                        255 - gray
                    } else {
                        gray
                    }
                })
                .collect::<Vec<u8>>()
        };

        GrayImage::from_raw(width, height, gray).ok_or_else(|| {
            ImageError::InvalidImage(format!(
                "Frame data does not cover {width}x{height} pixels"
            ))
        })
    }

    fn fallback_to_luma(
        decoded: &DecodedPixelData<'_>,
        frame_idx: u32,
        interpretation: &PhotometricInterpretation,
    ) -> Result<GrayImage, ImageError> {
        let luma = decoded
            .to_dynamic_image(frame_idx)
            .map_err(|err| {
                ImageError::InvalidImage(format!(
                    "Unsupported photometric interpretation `{}`: {err}",
                    interpretation.as_str()
                ))
            })?
            .to_luma8();
        let (width, height) = luma.dimensions();
        GrayImage::from_raw(width, height, luma.into_raw()).ok_or_else(|| {
            ImageError::InvalidImage(String::from("Converted frame has an unexpected size"))
        })
    }

    /// Enhances, encodes and renders a preview in one step.
    pub fn enhance_xray(
        pixels: &GrayImage,
        params: &EnhancementParameters,
    ) -> Result<EnhancedXray, ImageError> {
        let started = std::time::Instant::now();
        let enhanced = enhance(pixels, params);
        let encoded = Self::encode_png(&enhanced)?;
        log::info!(
            "Enhanced {}x{} X-ray in {} ms ({} byte PNG)",
            enhanced.width(),
            enhanced.height(),
            started.elapsed().as_millis(),
            encoded.bytes.len()
        );
        Ok(EnhancedXray {
            preview: Self::to_handle(&enhanced),
            encoded,
        })
    }

    pub fn to_handle(image: &GrayImage) -> Handle {
        let (width, height) = image.dimensions();
        let mut rgba = Vec::with_capacity(image.as_raw().len() * 4);
        for &gray in image.as_raw() {
            rgba.extend_from_slice(&[gray, gray, gray, 255]);
        }
        Handle::from_rgba(width, height, rgba)
    }

    pub fn encode_png(image: &GrayImage) -> Result<EncodedImage, ImageError> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|err| ImageError::Encode(err.to_string()))?;
        Ok(EncodedImage {
            mime_type: PNG_MIME,
            bytes,
        })
    }
}

fn min_max_u16(values: &[u16]) -> Option<(u16, u16)> {
    values.iter().copied().fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

fn normalize_u16(value: u16, min: u16, max: u16) -> u8 {
    if max <= min {
        return 0;
    }

    let range = (max - min) as f32;
    let normalized = (value.saturating_sub(min)) as f32 / range;
    (normalized * 255.0).clamp(0.0, 255.0).round() as u8
}
