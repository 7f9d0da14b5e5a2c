use std::fmt::Display;

const MAX_CAPTION_LEN: usize = 60;

/// Comma-separated labels, in iteration order.
pub fn join_labels<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

pub fn format_dimensions(width: u32, height: u32) -> String {
    format!("{width} × {height} px")
}

/// Keeps the tail of long captions such as file paths, where the file name
/// matters most.
pub fn truncate_caption(caption: &str) -> String {
    let count = caption.chars().count();
    if count <= MAX_CAPTION_LEN {
        return caption.to_string();
    }
    let tail: String = caption.chars().skip(count - (MAX_CAPTION_LEN - 1)).collect();
    format!("…{tail}")
}
