//! Bar chart geometry, independent of any drawing backend.

use crate::data::Dataset;

/// One bar: horizontal extent in x-axis units plus the raw data value.
/// Values are not clamped here; the drawing layer truncates anything above
/// the configured axis maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub category: usize,
    pub dataset: usize,
    pub x0: f64,
    pub x1: f64,
    pub value: f64,
}

/// Full geometry of a grouped bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub bars: Vec<BarGeometry>,
    /// Tick position and label, one per category, centered under the group.
    pub ticks: Vec<(f64, String)>,
    /// Display range of the category axis, padded so the outermost groups
    /// are not clipped.
    pub x_range: (f64, f64),
    pub group_width: f64,
}

/// Lay out one bar per (category, dataset) pair.
///
/// Category `c` starts its group at `c`; dataset `i` within the group spans
/// `[c + i*bar_width, c + (i+1)*bar_width]`.
pub fn compute(bar_width: f64, data: &Dataset) -> ChartLayout {
    let dataset_count = data.dataset_count();
    let category_count = data.category_count();
    let group_width = dataset_count as f64 * bar_width;

    let mut bars = Vec::with_capacity(category_count * dataset_count);
    for (category, row) in data.values.iter().enumerate() {
        for (dataset, &value) in row.iter().enumerate() {
            let x0 = category as f64 + dataset as f64 * bar_width;
            bars.push(BarGeometry { category, dataset, x0, x1: x0 + bar_width, value });
        }
    }

    let ticks = data
        .category_labels
        .iter()
        .enumerate()
        .map(|(c, label)| (c as f64 + group_width / 2.0, label.clone()))
        .collect();

    let x_max = (category_count.saturating_sub(1)) as f64 + group_width + group_width / 2.0;

    ChartLayout { bars, ticks, x_range: (-group_width / 2.0, x_max), group_width }
}
