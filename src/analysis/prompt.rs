use crate::model::{FocusSelection, PatientRecord};
use crate::utils::{join_labels, or_placeholder};

const NOT_PROVIDED: &str = "Not provided";
const NO_HISTORY: &str = "None reported";
const NO_FOCUS: &str = "General assessment";

/// Renders the analysis prompt. Pure formatting: identical inputs give
/// identical text.
pub fn build_prompt(record: &PatientRecord, focus: &FocusSelection) -> String {
    let history = if record.medical_history.is_empty() {
        NO_HISTORY.to_string()
    } else {
        join_labels(&record.medical_history)
    };
    let focus_areas = if focus.is_empty() {
        NO_FOCUS.to_string()
    } else {
        join_labels(focus.areas())
    };

    format!(
        "Please analyze this dental X-ray image with the following context:

Patient Information:
- Name: {name}
- Age: {age}
- Gender: {gender}
- Medical History: {history}
- Current Complaints: {complaints}
- Previous Treatments: {treatments}
- Smoking Status: {smoking}
- Last Dental Visit: {last_visit}

Focus Areas: {focus_areas}

Please provide a detailed analysis including:
1. Identified abnormalities or concerns
2. Potential diagnosis considerations
3. Recommended additional examinations if needed
4. Treatment suggestions
5. Risk factors based on patient history

Format the response in a clear, structured manner.
",
        name = record.name,
        age = record.age,
        gender = record.gender,
        complaints = or_placeholder(&record.complaints, NOT_PROVIDED),
        treatments = or_placeholder(&record.previous_treatments, NOT_PROVIDED),
        smoking = record.smoking,
        last_visit = record.last_visit.format("%Y-%m-%d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FocusArea, Gender, MedicalCondition, SmokingStatus};
    use chrono::NaiveDate;

    fn jane() -> PatientRecord {
        PatientRecord {
            name: "Jane Doe".into(),
            age: 34,
            gender: Gender::Female,
            medical_history: [MedicalCondition::Diabetes].into_iter().collect(),
            complaints: "pain".into(),
            previous_treatments: "none".into(),
            smoking: SmokingStatus::NonSmoker,
            last_visit: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        }
    }

    #[test]
    fn jane_doe_scenario() {
        let focus: FocusSelection = [FocusArea::CavityDetection].into_iter().collect();
        let prompt = build_prompt(&jane(), &focus);
        for expected in ["Jane Doe", "34", "Diabetes", "Cavity Detection"] {
            assert!(prompt.contains(expected), "missing {expected}");
        }
        assert!(prompt.contains("- Gender: Female"));
        assert!(prompt.contains("- Smoking Status: Non-smoker"));
        assert!(prompt.contains("- Last Dental Visit: 2024-02-01"));
    }

    #[test]
    fn lists_are_comma_joined() {
        let mut record = jane();
        record.medical_history = [MedicalCondition::HeartDisease, MedicalCondition::Diabetes]
            .into_iter()
            .collect();
        let focus: FocusSelection = [FocusArea::WisdomTeeth, FocusArea::BoneDensity]
            .into_iter()
            .collect();
        let prompt = build_prompt(&record, &focus);
        assert!(prompt.contains("- Medical History: Diabetes, Heart Disease"));
        assert!(prompt.contains("Focus Areas: Wisdom Teeth, Bone Density"));
    }

    #[test]
    fn requests_all_five_sections() {
        let prompt = build_prompt(&jane(), &FocusSelection::default());
        for section in [
            "1. Identified abnormalities",
            "2. Potential diagnosis considerations",
            "3. Recommended additional examinations",
            "4. Treatment suggestions",
            "5. Risk factors",
        ] {
            assert!(prompt.contains(section), "missing {section}");
        }
    }

    #[test]
    fn empty_fields_use_placeholders() {
        let mut record = jane();
        record.medical_history.clear();
        record.complaints.clear();
        let prompt = build_prompt(&record, &FocusSelection::default());
        assert!(prompt.contains("- Medical History: None reported"));
        assert!(prompt.contains("- Current Complaints: Not provided"));
        assert!(prompt.contains("Focus Areas: General assessment"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let focus: FocusSelection = FocusArea::ALL.iter().copied().collect();
        assert_eq!(build_prompt(&jane(), &focus), build_prompt(&jane(), &focus));
    }
}
