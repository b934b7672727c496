//! Reusable widgets for the leadchat TUI.

pub mod composer;
pub mod slot_picker;
pub mod status_bar;
pub mod transcript;

pub use composer::Composer;
pub use slot_picker::SlotPicker;
pub use status_bar::{KeyHint, StatusBar};
pub use transcript::Transcript;
