//! Grouped bar chart rendering.
//!
//! `layout` computes pure bar/tick/axis geometry; `chart` feeds it to a
//! plotters backend and exports the image.

pub mod chart;
pub mod layout;

pub use chart::render_plot;
pub use layout::{BarGeometry, ChartLayout};
