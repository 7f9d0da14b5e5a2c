use crate::components::{checklist, segmented_toggle};
use crate::message::Message;
use crate::model::{FormError, Gender, MedicalCondition, PatientForm, PatientRecord, SmokingStatus};
use iced::widget::text::Wrapping;
use iced::widget::{button, column, horizontal_rule, pick_list, text, text_input, Column};
use iced::{Color, Element, Length};

const ERROR_COLOR: Color = Color {
    r: 0.93,
    g: 0.36,
    b: 0.36,
    a: 1.0,
};

pub fn configuration_section<'a>(api_key: &'a str, credential_missing: bool) -> Column<'a, Message> {
    let mut section = column![
        text("Configuration").size(22),
        text_input("Your API Key", api_key)
            .on_input(Message::ApiKeyChanged)
            .secure(true),
    ]
    .spacing(8);

    if credential_missing {
        section = section.push(
            text("⚠️ Please provide an API key.")
                .color(ERROR_COLOR)
                .wrapping(Wrapping::Word),
        );
    }
    section
}

pub fn patient_panel<'a>(
    form: &'a PatientForm,
    form_error: Option<&'a FormError>,
    saved: Option<&'a PatientRecord>,
) -> Element<'a, Message> {
    let mut panel = column![
        text("Patient Information").size(22),
        labelled(
            "Patient Name",
            text_input("Full name", &form.name).on_input(Message::NameChanged),
        ),
        labelled(
            "Age",
            text_input("1-120", &form.age)
                .on_input(Message::AgeChanged)
                .width(Length::Fixed(120.0)),
        ),
        labelled(
            "Gender",
            segmented_toggle(Gender::ALL, form.gender, Message::GenderSelected),
        ),
        labelled(
            "Medical History",
            checklist(
                MedicalCondition::ALL,
                |condition| form.medical_history.contains(&condition),
                Message::ConditionToggled,
            ),
        ),
        labelled(
            "Current Dental Complaints",
            text_input("Describe symptoms", &form.complaints).on_input(Message::ComplaintsChanged),
        ),
        labelled(
            "Previous Dental Treatments",
            text_input("Fillings, extractions, …", &form.previous_treatments)
                .on_input(Message::TreatmentsChanged),
        ),
        labelled(
            "Smoking Status",
            pick_list(
                SmokingStatus::ALL,
                Some(form.smoking),
                Message::SmokingSelected
            ),
        ),
        labelled(
            "Last Dental Visit",
            text_input("YYYY-MM-DD", &form.last_visit).on_input(Message::LastVisitChanged),
        ),
        button("Save Patient Information")
            .on_press(Message::SavePatient)
            .width(Length::Fill),
    ]
    .spacing(12);

    if let Some(error) = form_error {
        panel = panel.push(
            text(error.to_string())
                .color(ERROR_COLOR)
                .wrapping(Wrapping::Word),
        );
    } else if let Some(record) = saved {
        panel = panel.push(text(format!("Saved: {} ({})", record.name, record.age)).size(14));
    }

    column![horizontal_rule(1), panel].spacing(12).into()
}

fn labelled<'a>(
    label: &'a str,
    field: impl Into<Element<'a, Message>>,
) -> Column<'a, Message> {
    column![text(label).size(14), field.into()].spacing(4)
}
