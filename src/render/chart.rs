//! Draws a grouped bar chart with plotters and exports it.

use crate::config::plot::{ImageFormat, LegendLocation, PlotConfig};
use crate::data::Dataset;
use crate::render::layout::{self, ChartLayout};
use anyhow::{bail, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

/// Process-wide font family, applied to every text element.
const FONT_FAMILY: FontFamily<'static> = FontFamily::SansSerif;

/// Render `data` according to `cfg` and write the image to
/// `cfg.plot_file`, overwriting any existing file. Every invocation builds a
/// fresh figure context; nothing carries over between plots.
pub fn render_plot(cfg: &PlotConfig, data: &Dataset) -> Result<()> {
    check_consistency(cfg, data)?;

    let geometry = layout::compute(cfg.settings.barwidth, data);
    let size = cfg.pixel_size();

    match cfg.settings.format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(&cfg.plot_file, size).into_drawing_area();
            draw_chart(&root, cfg, &geometry)?;
            root.present().with_context(|| format!("failed writing {}", cfg.plot_file))?;
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(&cfg.plot_file, size).into_drawing_area();
            draw_chart(&root, cfg, &geometry)?;
            root.present().with_context(|| format!("failed writing {}", cfg.plot_file))?;
        }
    }

    tracing::debug!(plot = %cfg.name, file = %cfg.plot_file, "rendered");
    Ok(())
}

/// The legend/bar-color arrays are positional, indexed by dataset order; a
/// length mismatch against the CSV column count is fatal.
fn check_consistency(cfg: &PlotConfig, data: &Dataset) -> Result<()> {
    let datasets = data.dataset_count();
    let s = &cfg.settings;
    if s.barcolors.len() != datasets {
        bail!(
            "plot '{}': {} bar colors configured but {} has {} datasets",
            cfg.name,
            s.barcolors.len(),
            cfg.data_file,
            datasets
        );
    }
    if s.legend.len() != datasets {
        bail!(
            "plot '{}': {} legend labels configured but {} has {} datasets",
            cfg.name,
            s.legend.len(),
            cfg.data_file,
            datasets
        );
    }
    Ok(())
}

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, cfg: &PlotConfig, geometry: &ChartLayout) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let s = &cfg.settings;
    root.fill(&WHITE)?;

    let (_, height) = root.dim_in_pixel();

    // Top strips for the figure title and the plot title; title_y > 1 grows
    // the plot-title strip, pushing the axes down by the configured fraction.
    let suptitle_band = (s.suptitle_fontsize * 1.8).ceil() as i32;
    let title_offset = ((s.title_y - 1.0).max(0.0) * f64::from(height)).round() as i32;
    let title_band = (s.title_fontsize * 1.6).ceil() as i32 + title_offset;

    let (suptitle_area, rest) = root.split_vertically(suptitle_band);
    let (title_area, chart_area) = rest.split_vertically(title_band);

    draw_centered(
        &suptitle_area,
        &s.suptitle,
        FontDesc::new(FONT_FAMILY, s.suptitle_fontsize, FontStyle::Bold),
    )?;
    draw_centered(
        &title_area,
        &s.title,
        FontDesc::new(FONT_FAMILY, s.title_fontsize, FontStyle::Normal),
    )?;

    let x_label_band = (s.ticklabel_fontsize * 2.0 + s.axislabel_fontsize * 2.0).ceil() as i32;
    let y_label_band = (s.ticklabel_fontsize * 3.0 + s.axislabel_fontsize * 2.0).ceil() as i32;

    let mut chart = ChartBuilder::on(&chart_area)
        .margin(10)
        .x_label_area_size(x_label_band)
        .y_label_area_size(y_label_band)
        .build_cartesian_2d(geometry.x_range.0..geometry.x_range.1, 0.0..s.ymax)?;

    // Category tick labels are drawn by hand below, centered under each bar
    // group; the built-in x labels are blanked but the grid is kept.
    chart
        .configure_mesh()
        .x_desc(s.xlabel.clone())
        .y_desc(s.ylabel.clone())
        .axis_desc_style(FontDesc::new(FONT_FAMILY, s.axislabel_fontsize, FontStyle::Normal).color(&BLACK))
        .label_style(FontDesc::new(FONT_FAMILY, s.ticklabel_fontsize, FontStyle::Normal).color(&BLACK))
        .x_label_formatter(&|_| String::new())
        .draw()?;

    for (i, color) in s.barcolors.iter().enumerate() {
        let fill = RGBColor(color.r, color.g, color.b);
        let bars = geometry.bars.iter().filter(|b| b.dataset == i).map(|b| {
            // Values beyond the axis maximum are truncated at draw time, not
            // rejected and never fed back into the axis range.
            let top = b.value.clamp(0.0, s.ymax);
            Rectangle::new([(b.x0, 0.0), (b.x1, top)], fill.filled())
        });
        chart
            .draw_series(bars)?
            .label(s.legend[i].as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 12, y + 4)], fill.filled()));
    }

    let tick_style = FontDesc::new(FONT_FAMILY, s.ticklabel_fontsize, FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    chart.draw_series(geometry.ticks.iter().map(|(x, label)| {
        EmptyElement::at((*x, 0.0)) + Text::new(label.clone(), (0, 6), tick_style.clone())
    }))?;

    chart
        .configure_series_labels()
        .position(legend_position(s.legend_location))
        .label_font(FontDesc::new(FONT_FAMILY, s.legend_fontsize, FontStyle::Normal).color(&BLACK))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_centered<DB>(area: &DrawingArea<DB, Shift>, text: &str, font: FontDesc<'static>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (w, h) = area.dim_in_pixel();
    let style = font.color(&BLACK).pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(text.to_string(), (w as i32 / 2, h as i32 / 2), style))?;
    Ok(())
}

fn legend_position(location: LegendLocation) -> SeriesLabelPosition {
    match location {
        // plotters has no automatic placement; fall back to the top-right
        // corner for 'best'.
        LegendLocation::Best | LegendLocation::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLocation::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLocation::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLocation::LowerRight => SeriesLabelPosition::LowerRight,
        LegendLocation::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendLocation::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendLocation::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendLocation::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendLocation::Center => SeriesLabelPosition::MiddleMiddle,
    }
}
