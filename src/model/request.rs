use super::focus::FocusSelection;
use super::patient::PatientRecord;
use super::xray::EncodedImage;
use thiserror::Error;

/// Why the analysis action is not available yet. Shown as guidance, not as
/// a failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("Patient name is missing")]
    MissingPatientName,

    #[error("No X-ray image has been uploaded")]
    MissingImage,
}

/// Everything sent to the model for one analysis. Only constructible when
/// a named patient and an image are both present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    record: PatientRecord,
    focus: FocusSelection,
    image: EncodedImage,
}

impl AnalysisRequest {
    pub fn new(
        record: Option<&PatientRecord>,
        focus: &FocusSelection,
        image: Option<&EncodedImage>,
    ) -> Result<Self, InputError> {
        let (record, image) = Self::complete(record, image)?;
        Ok(Self {
            record: record.clone(),
            focus: focus.clone(),
            image: image.clone(),
        })
    }

    /// The completeness guard alone, without building a request.
    pub fn check(
        record: Option<&PatientRecord>,
        image: Option<&EncodedImage>,
    ) -> Result<(), InputError> {
        Self::complete(record, image).map(|_| ())
    }

    fn complete<'a>(
        record: Option<&'a PatientRecord>,
        image: Option<&'a EncodedImage>,
    ) -> Result<(&'a PatientRecord, &'a EncodedImage), InputError> {
        let record = record
            .filter(|record| record.has_name())
            .ok_or(InputError::MissingPatientName)?;
        let image = image.ok_or(InputError::MissingImage)?;
        Ok((record, image))
    }

    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    pub fn focus(&self) -> &FocusSelection {
        &self.focus
    }

    pub fn image(&self) -> &EncodedImage {
        &self.image
    }
}
