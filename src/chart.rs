//! SVG charts of both pipelines.

use crate::config::OutputConfig;
use crate::report::band_label;
use crate::series::Period;
use crate::stats::{Bin, DistributionSummary};
use anyhow::{Context, Result};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::{ops::Range, path::Path};

/// Everything the regression chart draws.
pub struct FitChart<'a> {
    pub base: Period,
    pub degree: usize,
    pub points: &'a [(f64, f64)],
    pub curve: &'a [(f64, f64)],
    pub equation: &'a str,
    pub r_squared: f64,
}

/// Everything the distribution chart draws.
pub struct DistributionChart<'a> {
    pub summary: &'a DistributionSummary,
    pub bins: &'a [Bin],
    pub curve: &'a [(f64, f64)],
}

const FONT: &str = "sans-serif";
const TERMS_PER_LINE: usize = 4;

// Colors of the bound lines, cycled by band.
const BAND_COLORS: [RGBColor; 4] = [
    RGBColor(255, 165, 0),
    RGBColor(128, 0, 128),
    RGBColor(165, 42, 42),
    RGBColor(0, 128, 128),
];

/// Scatter of the observations, the fitted curve, and an equation block.
pub fn render_fit_chart<P: AsRef<Path>>(
    chart: &FitChart,
    out: &OutputConfig,
    file: P,
) -> Result<()> {
    let file = file.as_ref();
    let root = SVGBackend::new(file, (out.width, out.height)).into_drawing_area();
    root.fill(&WHITE).context("failed to fill background")?;

    let x_range = padded_range(chart.points.iter().map(|&(x, _)| x), 0.0);
    let y_range = padded_range(
        chart
            .points
            .iter()
            .chain(chart.curve.iter())
            .map(|&(_, y)| y),
        0.05,
    );

    let mut ctx = ChartBuilder::on(&root)
        .caption("Polynomial Curve Fit", (FONT, 26))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .context("failed to build chart")?;

    ctx.configure_mesh()
        .x_desc(format!(
            "Months Since Start ({}-{})",
            chart.base.year,
            month_abbrev(chart.base.month)
        ))
        .y_desc("Temperature Anomaly (°C)")
        .light_line_style(BLACK.mix(0.05))
        .draw()
        .context("failed to draw mesh")?;

    ctx.draw_series(
        chart
            .points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 2, BLUE.filled())),
    )
    .context("failed to draw observations")?
    .label("Original Data")
    .legend(|(x, y)| Circle::new((x, y), 3, BLUE.filled()));

    ctx.draw_series(LineSeries::new(
        chart.curve.iter().copied(),
        RED.stroke_width(2),
    ))
    .context("failed to draw fitted curve")?
    .label(format!("Polynomial Fit (Degree {})", chart.degree))
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    // Equation block in the upper left corner of the plotting area.
    let terms: Vec<_> = chart.equation.split(" + ").collect();
    let mut lines = vec!["Equation:".to_string()];
    lines.extend(terms.chunks(TERMS_PER_LINE).map(|chunk| chunk.join(" + ")));
    lines.push(format!("R² = {:.4}", chart.r_squared));

    let x_text = x_range.start + 0.01 * (x_range.end - x_range.start);
    let y_step = (y_range.end - y_range.start) / 28.0;
    let style = TextStyle::from((FONT, 11).into_font()).color(&BLACK);
    ctx.draw_series(lines.iter().enumerate().map(|(i_line, line)| {
        Text::new(
            line.clone(),
            (x_text, y_range.end - y_step * (i_line as f64 + 0.5)),
            style.clone(),
        )
    }))
    .context("failed to draw equation")?;

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .context("failed to draw legend")?;

    root.present()
        .with_context(|| format!("failed to write {file:?}"))?;
    Ok(())
}

/// Density histogram with the fitted Gaussian and empirical-rule bounds.
pub fn render_distribution_chart<P: AsRef<Path>>(
    chart: &DistributionChart,
    out: &OutputConfig,
    file: P,
) -> Result<()> {
    let file = file.as_ref();
    let summary = chart.summary;
    let root = SVGBackend::new(file, (out.width, out.height)).into_drawing_area();
    root.fill(&WHITE).context("failed to fill background")?;

    let x_range = padded_range(
        chart
            .curve
            .iter()
            .map(|&(x, _)| x)
            .chain(chart.bins.iter().flat_map(|bin| [bin.lower, bin.upper])),
        0.0,
    );
    let y_max = chart
        .curve
        .iter()
        .map(|&(_, y)| y)
        .chain(chart.bins.iter().map(|bin| bin.density))
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { 1.25 * y_max } else { 1.0 };

    let mut ctx = ChartBuilder::on(&root)
        .caption(
            "Distribution with Empirical Rule and Standard Deviation Boundaries",
            (FONT, 22),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..y_max)
        .context("failed to build chart")?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc("Monthly Temperature Anomaly")
        .y_desc("Density")
        .draw()
        .context("failed to draw mesh")?;

    ctx.draw_series(chart.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.lower, 0.0), (bin.upper, bin.density)],
            BLUE.mix(0.6).filled(),
        )
    }))
    .context("failed to draw histogram")?
    .label("Observed Data")
    .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], BLUE.mix(0.6).filled()));
    ctx.draw_series(chart.bins.iter().map(|bin| {
        Rectangle::new([(bin.lower, 0.0), (bin.upper, bin.density)], BLACK)
    }))
    .context("failed to draw histogram edges")?;

    ctx.draw_series(LineSeries::new(
        chart.curve.iter().copied(),
        RED.stroke_width(2),
    ))
    .context("failed to draw density curve")?
    .label("Normal Distribution (Empirical Rule)")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    draw_vline(&mut ctx, summary.mean, y_max, GREEN, "Mean (μ)".to_string())?;
    for (i_band, band) in summary.bands.iter().enumerate() {
        let color = BAND_COLORS[i_band % BAND_COLORS.len()];
        let label = band_label(band.k);
        draw_vline(&mut ctx, band.lower, y_max, color, label.replace('±', "-"))?;
        draw_vline(&mut ctx, band.upper, y_max, color, label.replace('±', "+"))?;
    }

    let style = TextStyle::from((FONT, 14).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    ctx.draw_series(summary.bands.iter().enumerate().map(|(i_band, band)| {
        Text::new(
            format!(
                "{:.2}% within {}",
                100.0 * band.fraction,
                band_label(band.k)
            ),
            (summary.mean, y_max * (0.95 - 0.06 * i_band as f64)),
            style.clone(),
        )
    }))
    .context("failed to draw annotations")?;

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .context("failed to draw legend")?;

    root.present()
        .with_context(|| format!("failed to write {file:?}"))?;
    Ok(())
}

fn draw_vline(
    ctx: &mut ChartContext<'_, SVGBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x: f64,
    y_max: f64,
    color: RGBColor,
    label: String,
) -> Result<()> {
    let style = color.stroke_width(2);
    ctx.draw_series(DashedLineSeries::new([(x, 0.0), (x, y_max)], 6, 4, style))
        .with_context(|| format!("failed to draw line at {x}"))?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    Ok(())
}

/// Range covering all values, widened by `pad` of its width on each side.
fn padded_range<I: Iterator<Item = f64>>(vals: I, pad: f64) -> Range<f64> {
    let (min, max) = vals.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), val| {
        (lo.min(val), hi.max(val))
    });
    if !(min.is_finite() && max.is_finite()) {
        return 0.0..1.0;
    }
    if max <= min {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = pad * (max - min);
    (min - pad)..(max + pad)
}

fn month_abbrev(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???")
}
