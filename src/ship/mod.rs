//! First-person ship walk-around

pub mod deck;
pub mod panorama;
pub mod renderer;

pub use deck::{ShipDeck, Walker};
pub use renderer::{ShipwalkRenderer, ViewCommand};
