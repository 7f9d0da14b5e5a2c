pub mod focus;
pub mod form;
pub mod loader;
pub mod patient;
pub mod request;
pub mod xray;

pub use focus::{FocusArea, FocusSelection};
pub use form::{FormError, PatientForm};
pub use patient::{Gender, MedicalCondition, PatientRecord, SmokingStatus};
pub use request::{AnalysisRequest, InputError};
pub use xray::{DicomPatientHints, EncodedImage, EnhancedXray, LoadedXray, XraySource};
