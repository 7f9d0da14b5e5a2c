pub mod analysis_panel;
pub mod image_viewer;
pub mod patient_panel;

pub use analysis_panel::{analysis_panel, AnalysisState};
pub use image_viewer::{image_panel, EnhancementControls};
pub use patient_panel::{configuration_section, patient_panel};
