use crate::analysis::with_disclaimer;
use crate::components::checklist;
use crate::message::Message;
use crate::model::{FocusArea, FocusSelection, InputError};
use iced::widget::text::Wrapping;
use iced::widget::{button, column, container, scrollable, text};
use iced::{Background, Element, Length, Theme};

pub const INCOMPLETE_INPUT_NOTICE: &str =
    "Please upload an X-ray image and complete patient information to proceed with analysis.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Running,
    Done(String),
}

pub fn analysis_panel<'a>(
    gate: Result<(), InputError>,
    focus: &'a FocusSelection,
    state: &'a AnalysisState,
    enhancing: bool,
) -> Element<'a, Message> {
    if gate.is_err() {
        return column![text(INCOMPLETE_INPUT_NOTICE).wrapping(Wrapping::Word)].into();
    }

    let running = matches!(state, AnalysisState::Running);
    let label = if running {
        "Analyzing X-ray…"
    } else if enhancing {
        "Waiting for enhancement…"
    } else {
        "Generate Analysis"
    };
    let generate = button(label)
        .width(Length::Fill)
        .on_press_maybe((!running && !enhancing).then_some(Message::GenerateAnalysis));

    let mut panel = column![
        text("Analysis & Results").size(22),
        text("Select Analysis Focus Areas").size(16),
        checklist(
            FocusArea::ALL,
            |area| focus.contains(area),
            Message::FocusToggled
        ),
        generate,
    ]
    .spacing(12);

    if let AnalysisState::Done(result) = state {
        panel = panel
            .push(text("Analysis Results").size(18))
            .push(scrollable(result_box(with_disclaimer(result))).height(Length::Fill));
    }

    panel.into()
}

fn result_box<'a>(shown: String) -> Element<'a, Message> {
    container(text(shown).wrapping(Wrapping::Word))
        .padding(12)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let palette = theme.extended_palette();
            iced::widget::container::Style {
                background: Some(Background::Color(palette.background.weak.color)),
                border: iced::border::Border {
                    color: palette.danger.base.color,
                    width: 1.0,
                    radius: iced::border::Radius::new(5.0),
                },
                ..Default::default()
            }
        })
        .into()
}
