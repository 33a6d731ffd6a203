//! Plot configuration: typed records and the defaults-merging resolver.
//!
//! The metadata file is parsed into a generic YAML value first, merged
//! key-wise (plot section wins over `defaults`), then deserialized into a
//! fully typed [`PlotSettings`] so that a missing or mistyped key fails at
//! construction instead of at first use.

pub mod plot;
pub mod resolver;

pub use plot::{Color, ImageFormat, LegendLocation, PlotConfig, PlotSettings};
pub use resolver::resolve;
