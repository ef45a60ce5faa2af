//! Chart rendering for the distribution tool
//!
//! File output goes through plotters (SVG or bitmap backend, chosen by the
//! output extension); without an output file the curve is drawn in the
//! terminal with textplots and the reference lines are listed textually.

use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use textplots::{Chart as TermChart, Plot as TermPlot, Shape as TermShape};
use tracing::debug;

use crate::distribution::{DistributionStats, SampleDistribution};
use crate::error::TraceError;

/// Supported output image formats.
pub const OUTPUT_FORMATS: &[&str] = &["svg", "png"];

const CHART_SIZE: (u32, u32) = (1584, 902);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

/// Validate the output extension. Called before any input is read so an
/// unsupported format fails fast.
pub fn check_output_format(path: &Path) -> std::result::Result<ImageFormat, TraceError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("svg") => Ok(ImageFormat::Svg),
        Some("png") => Ok(ImageFormat::Png),
        _ => Err(TraceError::UnsupportedFormat {
            supported: OUTPUT_FORMATS.join(", "),
        }),
    }
}

/// Inputs of one chart rendering.
pub struct PlotSpec<'a> {
    pub fun_name: &'a str,
    pub input_name: &'a str,
    /// Upper bound on the number of curve points.
    pub points: usize,
    /// Optional x-axis bounds given as cumulative probabilities.
    pub min_cdf: Option<f64>,
    pub max_cdf: Option<f64>,
}

/// A labeled vertical reference line.
pub struct ReferenceLine {
    pub label: String,
    pub x: f64,
}

/// Reference lines at every computed statistic plus the sample extremes
/// and any user-supplied CDF bounds.
pub fn reference_lines(
    dist: &SampleDistribution,
    stats: &DistributionStats,
    spec: &PlotSpec<'_>,
) -> Vec<ReferenceLine> {
    let mut lines: Vec<ReferenceLine> = [
        ("Q1 - 1.5 x IQR", stats.lower_fence),
        ("Q1", stats.q1),
        ("median", stats.median),
        ("Q3", stats.q3),
        ("Q3 + 1.5 x IQR", stats.upper_fence),
        ("mean", stats.mean),
        ("min", dist.sample_min() as f64),
        ("max", dist.sample_max() as f64),
    ]
    .into_iter()
    .map(|(label, x)| ReferenceLine {
        label: label.to_string(),
        x,
    })
    .collect();
    if let Some(q) = spec.min_cdf {
        lines.push(ReferenceLine {
            label: "min-cdf".to_string(),
            x: dist.ppf(q),
        });
    }
    if let Some(q) = spec.max_cdf {
        lines.push(ReferenceLine {
            label: "max-cdf".to_string(),
            x: dist.ppf(q),
        });
    }
    lines
}

/// X-axis range: `[max(min, lower fence), min(max, max(mean, upper fence))]`
/// by default, each bound overridable through the inverse CDF. Falls back
/// to a unit margin around the sample when the range would be empty.
pub fn plot_range(
    dist: &SampleDistribution,
    stats: &DistributionStats,
    spec: &PlotSpec<'_>,
) -> (f64, f64) {
    let mut from = (dist.sample_min() as f64).max(stats.lower_fence);
    let mut to = (dist.sample_max() as f64).min(stats.mean.max(stats.upper_fence));
    if let Some(q) = spec.min_cdf {
        from = dist.ppf(q);
    }
    if let Some(q) = spec.max_cdf {
        to = dist.ppf(q);
    }
    if to <= from {
        from = dist.sample_min() as f64 - 1.0;
        to = dist.sample_max() as f64 + 1.0;
    }
    (from, to)
}

/// Sample the density curve over the full sample support.
pub fn pdf_curve(
    dist: &SampleDistribution,
    sample_len: usize,
    max_points: usize,
) -> Vec<(f64, f64)> {
    let from = dist.sample_min() as f64;
    let to = dist.sample_max() as f64 + 1.0;
    let count = max_points.min(sample_len).max(2);
    (0..count)
        .map(|i| {
            let x = from + (to - from) * i as f64 / (count - 1) as f64;
            (x, dist.pdf(x))
        })
        .collect()
}

/// Print the labeled statistics block.
pub fn print_statistics(fun_name: &str, stats: &DistributionStats) {
    println!("Statistics of \"{fun_name}\":");
    for (label, value) in [
        ("Q1 - 1.5 x IQR", stats.lower_fence),
        ("Q1", stats.q1),
        ("median", stats.median),
        ("Q3", stats.q3),
        ("Q3 + 1.5 x IQR", stats.upper_fence),
    ] {
        println!("{:<16} {value:.3} ns", format!("{label}:"));
    }
    println!(
        "{:<16} {:.3} ns ± {:.3} ns",
        "mean ± std:", stats.mean, stats.std
    );
}

/// Write the chart to `path` with the backend matching `format`.
pub fn render_to_file(
    path: &Path,
    format: ImageFormat,
    dist: &SampleDistribution,
    stats: &DistributionStats,
    sample_len: usize,
    spec: &PlotSpec<'_>,
) -> Result<()> {
    debug!(path = %path.display(), ?format, "rendering chart");
    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
            draw_chart(&root, dist, stats, sample_len, spec)?;
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
            draw_chart(&root, dist, stats, sample_len, spec)?;
        }
    }
    Ok(())
}

fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    dist: &SampleDistribution,
    stats: &DistributionStats,
    sample_len: usize,
    spec: &PlotSpec<'_>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (from, to) = plot_range(dist, stats, spec);
    let curve = pdf_curve(dist, sample_len, spec.points);
    let y_max = curve
        .iter()
        .map(|&(_, y)| y)
        .fold(0.0f64, f64::max)
        .max(1e-9)
        * 1.05;

    let caption = format!(
        "Probability distribution of \"{}\" execution time ({})",
        spec.fun_name, spec.input_name
    );
    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(from..to, 0.0..y_max)?;
    chart
        .configure_mesh()
        .x_desc("[ns]")
        .y_desc("probability density")
        .draw()?;

    chart.draw_series(LineSeries::new(curve.into_iter(), &BLUE))?;

    // dashed reference lines with their CDF value along the top edge and
    // the statistic label along the bottom edge
    for line in reference_lines(dist, stats, spec) {
        if !(from..=to).contains(&line.x) {
            continue;
        }
        chart.draw_series(DashedLineSeries::new(
            [(line.x, 0.0), (line.x, y_max)],
            4,
            3,
            BLACK.mix(0.6).stroke_width(1),
        ))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.2}", dist.cdf(line.x)),
            (line.x, y_max * 0.98),
            ("sans-serif", 13).into_font(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            line.label.clone(),
            (line.x, y_max * 0.04),
            ("sans-serif", 13).into_font(),
        )))?;
    }

    root.present()?;
    Ok(())
}

/// Terminal fallback: density curve plus a textual reference-line table.
pub fn render_terminal(
    dist: &SampleDistribution,
    stats: &DistributionStats,
    sample_len: usize,
    spec: &PlotSpec<'_>,
) {
    let (from, to) = plot_range(dist, stats, spec);
    // terminal cells are coarse, keep the curve small
    let curve = pdf_curve(dist, sample_len, spec.points.min(512));
    let points: Vec<(f32, f32)> = curve
        .into_iter()
        .map(|(x, y)| (x as f32, y as f32))
        .collect();

    println!();
    TermChart::new(180, 60, from as f32, to as f32)
        .lineplot(&TermShape::Lines(&points))
        .nice();

    println!("reference lines:");
    for line in reference_lines(dist, stats, spec) {
        println!(
            "{:<16} {:>12.3} ns  cdf {:.2}",
            format!("{}:", line.label),
            line.x,
            dist.cdf(line.x)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec<'a>() -> PlotSpec<'a> {
        PlotSpec {
            fun_name: "child_fn",
            input_name: "trace.txt",
            points: 16384,
            min_cdf: None,
            max_cdf: None,
        }
    }

    #[test]
    fn test_output_format_allow_list() {
        assert_eq!(
            check_output_format(Path::new("out.svg")).unwrap(),
            ImageFormat::Svg
        );
        assert_eq!(
            check_output_format(Path::new("dir/out.png")).unwrap(),
            ImageFormat::Png
        );
        for bad in ["out.pdf", "out.eps", "out.jpeg", "out"] {
            let err = check_output_format(Path::new(bad)).unwrap_err();
            assert!(err.to_string().contains("svg, png"), "{bad}");
        }
    }

    #[test]
    fn test_plot_range_defaults_to_fence_clipped_support() {
        let dist = SampleDistribution::from_sample(&[10, 11, 12, 13, 14, 100]).unwrap();
        let stats = DistributionStats::from_distribution(&dist);
        let (from, to) = plot_range(&dist, &stats, &spec());
        assert!(from >= 10.0);
        assert!(to <= 100.0);
        assert!(from < to);
    }

    #[test]
    fn test_plot_range_cdf_overrides() {
        let dist = SampleDistribution::from_sample(&[10, 11, 12, 13, 14, 15]).unwrap();
        let stats = DistributionStats::from_distribution(&dist);
        let mut s = spec();
        s.min_cdf = Some(0.25);
        s.max_cdf = Some(0.75);
        let (from, to) = plot_range(&dist, &stats, &s);
        assert!((dist.cdf(from) - 0.25).abs() < 1e-9);
        assert!((dist.cdf(to) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_plot_range_degenerate_sample_gets_margin() {
        let dist = SampleDistribution::from_sample(&[42]).unwrap();
        let stats = DistributionStats::from_distribution(&dist);
        let (from, to) = plot_range(&dist, &stats, &spec());
        assert_eq!((from, to), (41.0, 43.0));
    }

    #[test]
    fn test_pdf_curve_is_capped_by_sample_length() {
        let dist = SampleDistribution::from_sample(&[5, 6, 7, 8]).unwrap();
        let curve = pdf_curve(&dist, 4, 16384);
        assert_eq!(curve.len(), 4);
        let curve = pdf_curve(&dist, 4, 3);
        assert_eq!(curve.len(), 3);
    }

    #[test]
    fn test_reference_lines_include_cdf_bounds_when_given() {
        let dist = SampleDistribution::from_sample(&[1, 2, 3, 4, 5]).unwrap();
        let stats = DistributionStats::from_distribution(&dist);
        assert_eq!(reference_lines(&dist, &stats, &spec()).len(), 8);
        let mut s = spec();
        s.min_cdf = Some(0.1);
        s.max_cdf = Some(0.9);
        assert_eq!(reference_lines(&dist, &stats, &s).len(), 10);
    }
}
