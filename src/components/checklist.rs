use crate::message::Message;
use iced::widget::{checkbox, Column};
use std::fmt::Display;

/// One checkbox per option; `is_selected` decides the ticked state.
pub fn checklist<'a, T>(
    options: &[T],
    is_selected: impl Fn(T) -> bool,
    on_toggle: fn(T, bool) -> Message,
) -> Column<'a, Message>
where
    T: Copy + Display + 'static,
{
    options.iter().fold(Column::new().spacing(6), |column, &option| {
        column.push(
            checkbox(option.to_string(), is_selected(option))
                .on_toggle(move |checked| on_toggle(option, checked)),
        )
    })
}
