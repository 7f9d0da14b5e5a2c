use crate::message::Message;
use iced::widget::text::Wrapping;
use iced::widget::{button, container, text, Container, Row};
use iced::{Alignment, Background, Color, Element, Length, Shadow, Theme};
use std::fmt::Display;

/// A pill-shaped single-choice control, one segment per option.
pub fn segmented_toggle<T>(
    options: &[T],
    current: T,
    on_select: fn(T) -> Message,
) -> Container<'static, Message>
where
    T: Copy + PartialEq + Display + 'static,
{
    let last = options.len().saturating_sub(1);
    let segments: Vec<Element<'static, Message>> = options
        .iter()
        .enumerate()
        .map(|(index, &option)| {
            let position = match index {
                0 => SegmentPosition::Left,
                i if i == last => SegmentPosition::Right,
                _ => SegmentPosition::Middle,
            };
            segmented_toggle_option(option, option == current, position, on_select(option))
                .width(Length::FillPortion(1))
                .into()
        })
        .collect();

    container(Row::with_children(segments).spacing(0))
        .padding(3)
        .width(Length::Fill)
        .style(segmented_container_style)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentPosition {
    Left,
    Middle,
    Right,
}

fn segmented_toggle_option<T: Display>(
    label: T,
    is_active: bool,
    position: SegmentPosition,
    on_press: Message,
) -> iced::widget::Button<'static, Message> {
    let content = container(text(label.to_string()).size(14).wrapping(Wrapping::None))
        .width(Length::Fill)
        .height(Length::Fixed(30.0))
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .padding([6, 10]);

    button(content)
        .padding(0)
        .on_press(on_press)
        .style(move |theme, status| segmented_button_style(theme, status, is_active, position))
}

fn segmented_container_style(theme: &Theme) -> iced::widget::container::Style {
    let palette = theme.extended_palette();

    iced::widget::container::Style {
        background: Some(Background::Color(palette.background.strong.color)),
        border: iced::border::Border {
            color: palette.background.strong.color.scale_alpha(0.6),
            width: 1.0,
            radius: iced::border::Radius::new(999.0),
        },
        ..Default::default()
    }
}

fn segmented_button_style(
    theme: &Theme,
    status: iced::widget::button::Status,
    is_active: bool,
    position: SegmentPosition,
) -> iced::widget::button::Style {
    let palette = theme.extended_palette();

    let idle = if is_active {
        palette.primary.strong.color
    } else {
        palette.background.strong.color.scale_alpha(0.4)
    };

    let background_color = match status {
        iced::widget::button::Status::Hovered if is_active => palette.primary.base.color,
        iced::widget::button::Status::Hovered => palette.background.base.color.scale_alpha(0.8),
        iced::widget::button::Status::Pressed if is_active => {
            palette.primary.base.color.scale_alpha(0.9)
        }
        iced::widget::button::Status::Pressed => palette.background.base.color.scale_alpha(0.9),
        iced::widget::button::Status::Disabled => idle.scale_alpha(0.5),
        iced::widget::button::Status::Active => idle,
    };

    let text_color = if is_active {
        palette.primary.strong.text
    } else {
        palette.background.base.text
    };

    let (outer, inner) = (999.0, 10.0);
    let radius = match position {
        SegmentPosition::Left => iced::border::Radius {
            top_left: outer,
            top_right: inner,
            bottom_right: inner,
            bottom_left: outer,
        },
        SegmentPosition::Middle => iced::border::Radius::new(inner),
        SegmentPosition::Right => iced::border::Radius {
            top_left: inner,
            top_right: outer,
            bottom_right: outer,
            bottom_left: inner,
        },
    };

    iced::widget::button::Style {
        background: Some(Background::Color(background_color)),
        text_color,
        border: iced::border::Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius,
        },
        shadow: Shadow::default(),
    }
}
