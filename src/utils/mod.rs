pub mod formatting;

pub use formatting::{format_dimensions, join_labels, or_placeholder, truncate_caption};
