//! scientometry-plot-gen: Batch grouped-bar-chart generation
//!
//! Reads a YAML metadata file describing a set of named plots (a `defaults`
//! section plus one section per plot), loads one CSV data file per plot, and
//! renders grouped vertical bar charts to PNG or SVG files.

pub mod cli;
pub mod config;
pub mod data;
pub mod render;
