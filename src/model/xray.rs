use super::patient::Gender;
use image::GrayImage;
use iced::widget::image::Handle;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XraySource {
    Raster,
    Dicom,
}

/// Patient attributes found in a DICOM header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DicomPatientHints {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
}

/// An X-ray as picked by the user, decoded to 8-bit grayscale.
#[derive(Debug, Clone)]
pub struct LoadedXray {
    pub file_path: PathBuf,
    pub source: XraySource,
    pub pixels: GrayImage,
    pub preview: Handle,
    pub hints: Option<DicomPatientHints>,
}

/// Lossless encoding of the enhanced image, as sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct EnhancedXray {
    pub encoded: EncodedImage,
    pub preview: Handle,
}
