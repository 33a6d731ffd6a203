//! Typed plot configuration records.

use anyhow::bail;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Figure sizes in the metadata file are centimetres; rendering backends
/// want dots, so sizes go through dots-per-inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Output image format. Closed set: plotters ships a raster (bitmap) and a
/// vector (SVG) backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Legend placement keywords, matching the conventional matplotlib names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LegendLocation {
    #[serde(rename = "best")]
    Best,
    #[serde(rename = "upper right")]
    UpperRight,
    #[serde(rename = "upper left")]
    UpperLeft,
    #[serde(rename = "lower left")]
    LowerLeft,
    #[serde(rename = "lower right")]
    LowerRight,
    #[serde(rename = "center left")]
    CenterLeft,
    #[serde(rename = "center right")]
    CenterRight,
    #[serde(rename = "lower center")]
    LowerCenter,
    #[serde(rename = "upper center")]
    UpperCenter,
    #[serde(rename = "center")]
    Center,
}

/// An RGB bar color, written in YAML as `#rrggbb`, `#rgb`, a matplotlib
/// single-letter code, or a common color name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex, s);
        }
        match s.to_ascii_lowercase().as_str() {
            "b" | "blue" => Ok(Color::new(0, 0, 255)),
            "g" | "green" => Ok(Color::new(0, 128, 0)),
            "r" | "red" => Ok(Color::new(255, 0, 0)),
            "c" | "cyan" => Ok(Color::new(0, 255, 255)),
            "m" | "magenta" => Ok(Color::new(255, 0, 255)),
            "y" | "yellow" => Ok(Color::new(255, 255, 0)),
            "k" | "black" => Ok(Color::new(0, 0, 0)),
            "w" | "white" => Ok(Color::new(255, 255, 255)),
            "orange" => Ok(Color::new(255, 165, 0)),
            "purple" => Ok(Color::new(128, 0, 128)),
            "brown" => Ok(Color::new(165, 42, 42)),
            "pink" => Ok(Color::new(255, 192, 203)),
            "gray" | "grey" => Ok(Color::new(128, 128, 128)),
            other => bail!("unknown color name '{other}'"),
        }
    }
}

fn parse_hex(hex: &str, original: &str) -> anyhow::Result<Color> {
    // Length is in bytes; multibyte input must be rejected up front so the
    // digit slicing below stays on char boundaries.
    if !hex.is_ascii() {
        bail!("malformed hex color '{original}' (expected #rrggbb or #rgb)");
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16)?;
            let g = u8::from_str_radix(&hex[2..4], 16)?;
            let b = u8::from_str_radix(&hex[4..6], 16)?;
            Ok(Color::new(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16)?;
            let g = u8::from_str_radix(&hex[1..2], 16)?;
            let b = u8::from_str_radix(&hex[2..3], 16)?;
            Ok(Color::new(r * 17, g * 17, b * 17))
        }
        _ => bail!("malformed hex color '{original}' (expected #rrggbb or #rgb)"),
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: anyhow::Error| serde::de::Error::custom(e.to_string()))
    }
}

/// The merged per-plot settings. Every field is required; deserialization of
/// an incomplete merge fails with serde's `missing field` diagnostic.
///
/// Field names match the metadata file keys.
#[derive(Debug, Clone, Deserialize)]
pub struct PlotSettings {
    pub suptitle: String,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    /// Upper bound of the value axis. Always taken from the metadata, never
    /// auto-computed from the data.
    pub ymax: f64,
    pub barcolors: Vec<Color>,
    /// Width of a single bar, in x-axis units.
    pub barwidth: f64,
    pub legend: Vec<String>,
    pub legend_location: LegendLocation,
    pub format: ImageFormat,
    /// Output density in dots per inch.
    pub resolution: u32,
    /// Figure width and height in centimetres.
    pub figsize: [f64; 2],
    pub suptitle_fontsize: f64,
    pub title_fontsize: f64,
    /// Vertical offset of the plot title, as a fraction of the axis height
    /// (1.0 sits directly on top of the axes).
    pub title_y: f64,
    pub ticklabel_fontsize: f64,
    pub axislabel_fontsize: f64,
    pub legend_fontsize: f64,
}

/// A resolved plot: merged settings plus the file names derived from the
/// plot name. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub name: String,
    /// Output image file, always `plot-<name>.<format>`.
    pub plot_file: String,
    /// Companion data file, always `<name>.csv`.
    pub data_file: String,
    pub settings: PlotSettings,
}

impl PlotConfig {
    pub fn new(name: &str, settings: PlotSettings) -> Self {
        PlotConfig {
            name: name.to_string(),
            plot_file: format!("plot-{}.{}", name, settings.format),
            data_file: format!("{name}.csv"),
            settings,
        }
    }

    /// Backend canvas size in pixels, from the physical size and resolution.
    pub fn pixel_size(&self) -> (u32, u32) {
        let [w_cm, h_cm] = self.settings.figsize;
        let dpi = f64::from(self.settings.resolution);
        let w = (w_cm / CM_PER_INCH * dpi).round().max(1.0) as u32;
        let h = (h_cm / CM_PER_INCH * dpi).round().max(1.0) as u32;
        (w, h)
    }
}

/// Fixture shared by unit tests across modules.
#[cfg(test)]
pub(crate) fn sample_settings() -> PlotSettings {
    PlotSettings {
        suptitle: "Suptitle".into(),
        title: "Title".into(),
        xlabel: "Year".into(),
        ylabel: "Publications".into(),
        ymax: 50.0,
        barcolors: vec![Color::new(255, 0, 0), Color::new(0, 0, 255)],
        barwidth: 0.3,
        legend: vec!["A".into(), "B".into()],
        legend_location: LegendLocation::UpperLeft,
        format: ImageFormat::Png,
        resolution: 100,
        figsize: [16.0, 10.0],
        suptitle_fontsize: 14.0,
        title_fontsize: 12.0,
        title_y: 1.03,
        ticklabel_fontsize: 9.0,
        axislabel_fontsize: 11.0,
        legend_fontsize: 9.0,
    }
}
