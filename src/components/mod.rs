pub mod checklist;
pub mod segmented_toggle;

pub use checklist::checklist;
pub use segmented_toggle::segmented_toggle;
