//! Card layout for the all-memories view.

pub mod scatter;
pub mod selection;

pub use scatter::{card_top, CardPlacement, ScatterLayout, ScatterPosition};
pub use selection::CardSelection;
