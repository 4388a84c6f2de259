//! Screen-Space GUI Widgets
//!
//! Procedurally rendered building blocks shared by the screens. Widgets
//! take the current [`Layout`](crate::context::Layout) so their geometry
//! scales with the window; hit testing uses the same geometry as drawing.
//!
//! - [`Menu`] - titled list with keyboard and mouse selection
//! - [`OptionList`] - label/value rows for settings dialogs
//! - [`Spinner`] - loading indicator
//! - [`ProgressBar`] - fraction bar

pub mod menu;
pub mod option_list;
pub mod progress_bar;
pub mod spinner;

pub use menu::{Menu, MenuItem};
pub use option_list::{OptionList, OptionRow, RowHit};
pub use progress_bar::{ProgressBar, ProgressBarStyle};
pub use spinner::Spinner;
