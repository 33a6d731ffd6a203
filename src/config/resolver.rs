//! Metadata file loading and defaults merging.

use crate::config::plot::{PlotConfig, PlotSettings};
use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Load the metadata file and produce one merged [`PlotConfig`] per selected
/// plot, in document order.
///
/// An empty `requested` slice selects every non-`defaults` section. A
/// requested name with no matching section is a fatal lookup error rather
/// than a silent skip.
pub fn resolve(metadata_file: &Path, requested: &[String]) -> Result<Vec<PlotConfig>> {
    let content = fs::read_to_string(metadata_file)
        .with_context(|| format!("Failed reading metadata file: {}", metadata_file.display()))?;

    let doc: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Invalid YAML syntax: {}", metadata_file.display()))?;

    let sections = doc.as_mapping().with_context(|| {
        format!("{}: metadata must be a mapping of plot sections", metadata_file.display())
    })?;

    let defaults = sections
        .get("defaults")
        .with_context(|| format!("{}: missing required 'defaults' section", metadata_file.display()))?
        .as_mapping()
        .with_context(|| format!("{}: 'defaults' must be a mapping", metadata_file.display()))?;

    for name in requested {
        if name == "defaults" || sections.get(name.as_str()).is_none() {
            bail!("plot '{}' is not defined in {}", name, metadata_file.display());
        }
    }

    let mut configs = Vec::new();
    for (key, section) in sections {
        let Some(name) = key.as_str() else {
            bail!("{}: plot names must be strings", metadata_file.display());
        };
        if name == "defaults" {
            continue;
        }
        if !requested.is_empty() && !requested.iter().any(|r| r == name) {
            continue;
        }

        let overrides = match section {
            // A bare `name:` section renders with defaults only.
            Value::Null => Mapping::new(),
            Value::Mapping(m) => m.clone(),
            _ => bail!("plot '{name}': section must be a mapping of settings"),
        };

        let merged = merge_sections(defaults, overrides);
        let settings: PlotSettings =
            serde_yaml::from_value(Value::Mapping(merged)).with_context(|| {
                format!(
                    "plot '{name}': invalid or incomplete configuration in {}",
                    metadata_file.display()
                )
            })?;

        configs.push(PlotConfig::new(name, settings));
    }

    Ok(configs)
}

/// Shallow key-wise merge: start from `defaults`, overwrite with the plot's
/// own keys. Later writes always win, so there is no ordering ambiguity.
fn merge_sections(defaults: &Mapping, overrides: Mapping) -> Mapping {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key, value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::plot::ImageFormat;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const METADATA: &str = "\
defaults:
  suptitle: Scientometric analysis
  title: All documents
  xlabel: Year
  ylabel: Publications
  ymax: 50
  barcolors: [\"#4f81bd\", \"#c0504d\"]
  barwidth: 0.3
  legend: [Scopus, Web of Science]
  legend_location: upper left
  format: png
  resolution: 300
  figsize: [16, 10]
  suptitle_fontsize: 14
  title_fontsize: 12
  title_y: 1.02
  ticklabel_fontsize: 9
  axislabel_fontsize: 11
  legend_fontsize: 9
citations:
  title: Citations per year
  ymax: 120
  format: svg
publications: ~
";

    fn write_metadata(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("plot-metadata.yaml");
        fs::write(&path, content).expect("write metadata");
        (tmp, path)
    }

    #[test]
    fn merge_overrides_win_and_defaults_survive() {
        let defaults: Mapping = serde_yaml::from_str("a: 1\nb: 2\n").expect("defaults");
        let overrides: Mapping = serde_yaml::from_str("b: 3\nc: 4\n").expect("overrides");
        let merged = merge_sections(&defaults, overrides);
        let expected: Mapping = serde_yaml::from_str("a: 1\nb: 3\nc: 4\n").expect("expected");
        assert_eq!(merged, expected);
    }

    #[test]
    fn empty_selection_resolves_all_plots_in_order() {
        let (_tmp, path) = write_metadata(METADATA);
        let configs = resolve(&path, &[]).expect("resolve");
        let names: Vec<&str> = configs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["citations", "publications"]);
    }

    #[test]
    fn plot_keys_override_defaults_and_untouched_keys_remain() {
        let (_tmp, path) = write_metadata(METADATA);
        let configs = resolve(&path, &["citations".to_string()]).expect("resolve");
        assert_eq!(configs.len(), 1);
        let citations = &configs[0];
        assert_eq!(citations.settings.title, "Citations per year");
        assert_eq!(citations.settings.ymax, 120.0);
        assert_eq!(citations.settings.format, ImageFormat::Svg);
        // Default-only keys preserved unchanged.
        assert_eq!(citations.settings.suptitle, "Scientometric analysis");
        assert_eq!(citations.settings.barwidth, 0.3);
    }

    #[test]
    fn null_section_uses_defaults_only() {
        let (_tmp, path) = write_metadata(METADATA);
        let configs = resolve(&path, &["publications".to_string()]).expect("resolve");
        assert_eq!(configs[0].settings.title, "All documents");
        assert_eq!(configs[0].settings.ymax, 50.0);
    }

    #[test]
    fn derived_file_names_track_format() {
        let (_tmp, path) = write_metadata(METADATA);
        let configs = resolve(&path, &[]).expect("resolve");
        assert_eq!(configs[0].plot_file, "plot-citations.svg");
        assert_eq!(configs[0].data_file, "citations.csv");
        assert_eq!(configs[1].plot_file, "plot-publications.png");
    }

    #[test]
    fn unknown_requested_plot_is_a_lookup_error() {
        let (_tmp, path) = write_metadata(METADATA);
        let err = resolve(&path, &["nope".to_string()]).expect_err("lookup error");
        assert!(err.to_string().contains("'nope'"), "got: {err}");
    }

    #[test]
    fn requesting_the_defaults_section_is_rejected() {
        let (_tmp, path) = write_metadata(METADATA);
        assert!(resolve(&path, &["defaults".to_string()]).is_err());
    }

    #[test]
    fn missing_metadata_file_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        assert!(resolve(&tmp.path().join("absent.yaml"), &[]).is_err());
    }

    #[test]
    fn missing_defaults_section_is_fatal() {
        let (_tmp, path) = write_metadata("citations:\n  ymax: 10\n");
        let err = resolve(&path, &[]).expect_err("config error");
        assert!(err.to_string().contains("defaults"), "got: {err}");
    }

    #[test]
    fn missing_required_key_names_plot_and_field() {
        let without_ymax = METADATA.replace("  ymax: 50\n", "");
        let (_tmp, path) = write_metadata(&without_ymax);
        let err = resolve(&path, &["publications".to_string()]).expect_err("config error");
        let chain = format!("{err:#}");
        assert!(chain.contains("'publications'"), "got: {chain}");
        assert!(chain.contains("ymax"), "got: {chain}");
    }

    #[test]
    fn non_mapping_document_is_fatal() {
        let (_tmp, path) = write_metadata("- just\n- a\n- list\n");
        assert!(resolve(&path, &[]).is_err());
    }
}
