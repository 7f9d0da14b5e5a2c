use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: &'static [Gender] = &[Gender::Male, Gender::Female, Gender::Other];

    /// Maps the DICOM `PatientSex` code.
    pub fn from_dicom_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            "O" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MedicalCondition {
    Diabetes,
    Hypertension,
    HeartDisease,
    None,
}

impl MedicalCondition {
    pub const ALL: &'static [MedicalCondition] = &[
        MedicalCondition::Diabetes,
        MedicalCondition::Hypertension,
        MedicalCondition::HeartDisease,
        MedicalCondition::None,
    ];
}

impl fmt::Display for MedicalCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MedicalCondition::Diabetes => "Diabetes",
            MedicalCondition::Hypertension => "Hypertension",
            MedicalCondition::HeartDisease => "Heart Disease",
            MedicalCondition::None => "None",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmokingStatus {
    #[default]
    NonSmoker,
    FormerSmoker,
    CurrentSmoker,
}

impl SmokingStatus {
    pub const ALL: &'static [SmokingStatus] = &[
        SmokingStatus::NonSmoker,
        SmokingStatus::FormerSmoker,
        SmokingStatus::CurrentSmoker,
    ];
}

impl fmt::Display for SmokingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SmokingStatus::NonSmoker => "Non-smoker",
            SmokingStatus::FormerSmoker => "Former smoker",
            SmokingStatus::CurrentSmoker => "Current smoker",
        })
    }
}

/// Snapshot of the patient form taken when the user saves it. Never edited
/// in place: a new record replaces the old one on every save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub medical_history: BTreeSet<MedicalCondition>,
    pub complaints: String,
    pub previous_treatments: String,
    pub smoking: SmokingStatus,
    pub last_visit: NaiveDate,
}

impl PatientRecord {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}
