use crate::analysis::AnalysisError;
use crate::image_pipeline::ImageError;
use crate::model::{
    EnhancedXray, FocusArea, Gender, LoadedXray, MedicalCondition, SmokingStatus,
};

#[derive(Debug, Clone)]
pub enum Message {
    ApiKeyChanged(String),

    NameChanged(String),
    AgeChanged(String),
    GenderSelected(Gender),
    ConditionToggled(MedicalCondition, bool),
    ComplaintsChanged(String),
    TreatmentsChanged(String),
    SmokingSelected(SmokingStatus),
    LastVisitChanged(String),
    SavePatient,

    PickImage,
    ImageLoaded(Option<Result<LoadedXray, ImageError>>),
    DenoiseChanged(u8),
    ContrastChanged(f32),
    ApplyEnhancement,
    ResetEnhancement,
    EnhancementFinished(u64, Result<EnhancedXray, ImageError>),

    FocusToggled(FocusArea, bool),
    GenerateAnalysis,
    AnalysisFinished(u64, Result<String, AnalysisError>),

    DismissError,
}
