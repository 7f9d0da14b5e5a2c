use super::patient::{Gender, MedicalCondition, PatientRecord, SmokingStatus, MAX_AGE, MIN_AGE};
use super::xray::DicomPatientHints;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Age must be a whole number between 1 and 120, got `{0}`")]
    InvalidAge(String),

    #[error("Last dental visit must be a date like 2024-05-31, got `{0}`")]
    InvalidDate(String),
}

/// Editable state of the patient form while the user is typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: Gender,
    pub medical_history: BTreeSet<MedicalCondition>,
    pub complaints: String,
    pub previous_treatments: String,
    pub smoking: SmokingStatus,
    pub last_visit: String,
}

impl PatientForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            age: MIN_AGE.to_string(),
            gender: Gender::default(),
            medical_history: BTreeSet::new(),
            complaints: String::new(),
            previous_treatments: String::new(),
            smoking: SmokingStatus::default(),
            last_visit: today.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn set_condition(&mut self, condition: MedicalCondition, selected: bool) {
        if selected {
            self.medical_history.insert(condition);
        } else {
            self.medical_history.remove(&condition);
        }
    }

    /// Builds a fresh record from the current field values.
    pub fn submit(&self) -> Result<PatientRecord, FormError> {
        let age = self
            .age
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .ok_or_else(|| FormError::InvalidAge(self.age.clone()))?;

        let last_visit = NaiveDate::parse_from_str(self.last_visit.trim(), DATE_FORMAT)
            .map_err(|_| FormError::InvalidDate(self.last_visit.clone()))?;

        Ok(PatientRecord {
            name: self.name.trim().to_string(),
            age,
            gender: self.gender,
            medical_history: self.medical_history.clone(),
            complaints: self.complaints.trim().to_string(),
            previous_treatments: self.previous_treatments.trim().to_string(),
            smoking: self.smoking,
            last_visit,
        })
    }

    /// Fills fields the user has not touched from a DICOM header.
    /// Returns true when anything changed.
    pub fn prefill_from(&mut self, hints: &DicomPatientHints) -> bool {
        let mut changed = false;
        if self.name.trim().is_empty() {
            if let Some(name) = &hints.name {
                self.name = name.clone();
                changed = true;
            }
        }
        if self.age.trim() == MIN_AGE.to_string() || self.age.trim().is_empty() {
            if let Some(age) = hints.age {
                self.age = age.to_string();
                changed = true;
            }
        }
        if let Some(gender) = hints.gender {
            if self.gender != gender && self.gender == Gender::default() {
                self.gender = gender;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn filled_form() -> PatientForm {
        let mut form = PatientForm::new(today());
        form.name = "  Jane Doe ".into();
        form.age = "34".into();
        form.gender = Gender::Female;
        form.set_condition(MedicalCondition::Hypertension, true);
        form.set_condition(MedicalCondition::Diabetes, true);
        form.complaints = "pain".into();
        form.previous_treatments = "none".into();
        form
    }

    #[test]
    fn new_form_defaults_to_today() {
        let form = PatientForm::new(today());
        assert_eq!(form.last_visit, "2024-03-15");
        assert_eq!(form.age, "1");
    }

    #[test]
    fn submit_builds_trimmed_record() {
        let record = filled_form().submit().unwrap();
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.age, 34);
        assert_eq!(record.last_visit, today());
        let history: Vec<_> = record.medical_history.iter().copied().collect();
        assert_eq!(
            history,
            vec![MedicalCondition::Diabetes, MedicalCondition::Hypertension]
        );
    }

    #[test]
    fn submit_rejects_out_of_range_age() {
        for raw in ["0", "121", "-3", "thirty", ""] {
            let mut form = filled_form();
            form.age = raw.into();
            assert_eq!(form.submit(), Err(FormError::InvalidAge(raw.into())));
        }
    }

    #[test]
    fn submit_rejects_malformed_date() {
        let mut form = filled_form();
        form.last_visit = "15/03/2024".into();
        assert!(matches!(form.submit(), Err(FormError::InvalidDate(_))));
    }

    #[test]
    fn saving_twice_rebuilds_the_record() {
        let mut form = filled_form();
        let first = form.submit().unwrap();
        form.set_condition(MedicalCondition::Hypertension, false);
        let second = form.submit().unwrap();
        assert_ne!(first, second);
        assert_eq!(first.medical_history.len(), 2);
        assert_eq!(second.medical_history.len(), 1);
    }

    #[test]
    fn prefill_only_touches_empty_fields() {
        let hints = DicomPatientHints {
            name: Some("John Smith".into()),
            age: Some(52),
            gender: Some(Gender::Other),
        };

        let mut blank = PatientForm::new(today());
        assert!(blank.prefill_from(&hints));
        assert_eq!(blank.name, "John Smith");
        assert_eq!(blank.age, "52");
        assert_eq!(blank.gender, Gender::Other);

        let mut edited = filled_form();
        assert!(!edited.prefill_from(&hints));
        assert_eq!(edited.name, "  Jane Doe ");
        assert_eq!(edited.age, "34");
        assert_eq!(edited.gender, Gender::Female);
    }
}
