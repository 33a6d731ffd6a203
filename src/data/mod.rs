//! CSV dataset loading.

pub mod loader;

pub use loader::{load_dataset, DataError, Dataset};
