use super::patient::Gender;
use super::{DicomPatientHints, LoadedXray, XraySource};
use crate::image_pipeline::{ImageError, XrayImagePipeline};
use dicom::object::{from_reader, DefaultDicomObject};
use std::path::PathBuf;

/// Inputs larger than this are refused before decoding.
pub const MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;
const MIN_INPUT_BYTES: usize = 8;

const DICOM_MAGIC_OFFSET: usize = 128;
const DICOM_MAGIC: &[u8; 4] = b"DICM";

pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "dcm"];

pub fn load_xray(path: PathBuf) -> Result<LoadedXray, ImageError> {
    log::info!("Loading X-ray: {}", path.display());
    let io_error = |err: std::io::Error| {
        let error = ImageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        };
        log::error!("{error}");
        error
    };

    let size = std::fs::metadata(&path).map_err(io_error)?.len();
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    if size > MAX_INPUT_BYTES {
        return Err(ImageError::TooLarge {
            size,
            limit: MAX_INPUT_BYTES,
        });
    }

    let bytes = std::fs::read(&path).map_err(io_error)?;
    if bytes.len() < MIN_INPUT_BYTES {
        return Err(ImageError::InvalidImage(format!(
            "{}: file is too small to be an image",
            path.display()
        )));
    }

    let (source, pixels, hints) = if is_dicom(&bytes) {
        let object = from_reader(&bytes[DICOM_MAGIC_OFFSET..]).map_err(|err| {
            ImageError::InvalidImage(format!("{}: failed to parse DICOM file ({err})", path.display()))
        })?;
        let pixels = XrayImagePipeline::decode_dicom_first_frame(&object)?;
        (XraySource::Dicom, pixels, Some(patient_hints(&object)))
    } else {
        let pixels = XrayImagePipeline::decode_raster(&bytes)?;
        (XraySource::Raster, pixels, None)
    };

    log::info!(
        "Decoded {:?} X-ray {}x{}",
        source,
        pixels.width(),
        pixels.height()
    );

    let preview = XrayImagePipeline::to_handle(&pixels);
    Ok(LoadedXray {
        file_path: path,
        source,
        pixels,
        preview,
        hints,
    })
}

pub fn is_dicom(bytes: &[u8]) -> bool {
    bytes
        .get(DICOM_MAGIC_OFFSET..DICOM_MAGIC_OFFSET + DICOM_MAGIC.len())
        .is_some_and(|magic| magic == DICOM_MAGIC)
}

fn patient_hints(object: &DefaultDicomObject) -> DicomPatientHints {
    DicomPatientHints {
        name: attribute_text(object, "PatientName").and_then(|raw| person_name(&raw)),
        age: attribute_text(object, "PatientAge").and_then(|raw| age_in_years(&raw)),
        gender: attribute_text(object, "PatientSex").and_then(|raw| Gender::from_dicom_code(&raw)),
    }
}

/// `Doe^Jane^^Dr` style person names become `Doe Jane Dr`.
fn person_name(raw: &str) -> Option<String> {
    let name = raw
        .split(['^', '='])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(name).filter(|name| !name.is_empty())
}

/// Age strings are `nnnD`, `nnnW`, `nnnM` or `nnnY`; only years map onto
/// the form.
fn age_in_years(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    let digits = raw.strip_suffix('Y')?;
    digits
        .parse::<u8>()
        .ok()
        .filter(|age| (super::patient::MIN_AGE..=super::patient::MAX_AGE).contains(age))
}

fn attribute_text(object: &DefaultDicomObject, name: &str) -> Option<String> {
    object
        .element_by_name(name)
        .ok()
        .and_then(|element| element.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use std::io::Write;

    #[test]
    fn loads_png_from_disk() {
        let image = GrayImage::from_fn(12, 7, |x, y| Luma([(x * 20 + y) as u8]));
        let encoded = XrayImagePipeline::encode_png(&image).unwrap();
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&encoded.bytes).unwrap();

        let loaded = load_xray(file.path().to_path_buf()).unwrap();
        assert_eq!(loaded.source, XraySource::Raster);
        assert_eq!(loaded.pixels, image);
        assert!(loaded.hints.is_none());
    }

    #[test]
    fn corrupt_file_is_an_invalid_image() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is a text file, not a radiograph").unwrap();
        let err = load_xray(file.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, ImageError::InvalidImage(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_xray(dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(err, ImageError::Io { .. }));
    }

    #[test]
    fn oversized_file_is_rejected_before_reading() {
        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(MAX_INPUT_BYTES as u64 + 1).unwrap();
        assert_eq!(
            load_xray(file.path().to_path_buf()).unwrap_err(),
            ImageError::TooLarge {
                size: MAX_INPUT_BYTES + 1,
                limit: MAX_INPUT_BYTES,
            }
        );
    }

    #[test]
    fn truncated_dicom_is_invalid() {
        let mut bytes = vec![0u8; 140];
        bytes[128..132].copy_from_slice(b"DICM");
        let mut file = tempfile::Builder::new().suffix(".dcm").tempfile().unwrap();
        file.write_all(&bytes).unwrap();
        assert!(matches!(
            load_xray(file.path().to_path_buf()),
            Err(ImageError::InvalidImage(_))
        ));
    }

    #[test]
    fn tiny_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        assert!(matches!(
            load_xray(file.path().to_path_buf()),
            Err(ImageError::InvalidImage(_))
        ));
    }

    #[test]
    fn dicom_magic_is_detected_at_offset_128() {
        let mut bytes = vec![0u8; 132];
        assert!(!is_dicom(&bytes));
        bytes[128..132].copy_from_slice(b"DICM");
        assert!(is_dicom(&bytes));
        assert!(!is_dicom(b"DICM"));
    }

    #[test]
    fn person_names_drop_component_separators() {
        assert_eq!(person_name("Doe^Jane").as_deref(), Some("Doe Jane"));
        assert_eq!(person_name("Smith^John^^Dr^").as_deref(), Some("Smith John Dr"));
        assert_eq!(person_name("^^"), None);
    }

    #[test]
    fn only_year_ages_are_used() {
        assert_eq!(age_in_years("034Y"), Some(34));
        assert_eq!(age_in_years("006M"), None);
        assert_eq!(age_in_years("000Y"), None);
        assert_eq!(age_in_years("garbage"), None);
    }
}
