//! Thin binary entry point; all logic lives in the library crate.

use anyhow::Result;

fn main() -> Result<()> {
    scientometry_plot_gen::cli::run()
}
