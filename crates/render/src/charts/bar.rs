//! Bar chart figure.

use super::{format_tick, nice_ticks, Axes};
use crate::figure::{Anchor, Baseline, Figure, Stroke, TextStyle};
use deckgen_core::BarSeries;

pub const WIDTH: f64 = 8.0;
pub const HEIGHT: f64 = 4.5;

const BAR_COLOR: &str = "#4A90E2";
const BAR_OPACITY: f64 = 0.8;
/// Bar width in category units.
const BAR_WIDTH: f64 = 0.8;
const MARGIN: f64 = 0.05;
const TITLE_SIZE: f64 = 14.0;
const TICK_SIZE: f64 = 10.0;
const TICK_LENGTH: f64 = 3.5;
const MAX_Y_TICKS: usize = 8;

/// Draw `series` as vertical bars under `title`.
pub fn bar_chart(title: &str, series: &BarSeries, font_family: &str) -> Figure {
    let mut figure = Figure::new(WIDTH, HEIGHT).with_font_family(font_family);

    let (x_min, x_max) = x_limits(series.len());
    let (y_min, y_max) = y_limits(&series.values);
    let axes = Axes::new(&figure)
        .with_x_range(x_min, x_max)
        .with_y_range(y_min, y_max);

    let bar_width = BAR_WIDTH * axes.x_scale();
    let baseline = axes.y(0.0);
    for (i, value) in series.values.iter().enumerate() {
        let top = axes.y(*value);
        let x = axes.x(i as f64) - bar_width / 2.0;
        figure.rect(
            x,
            top.min(baseline),
            bar_width,
            (top - baseline).abs(),
            BAR_COLOR,
            BAR_OPACITY,
        );
    }

    let grid = Stroke::new("#b0b0b0", 0.8).opacity(0.5).dashed(2.96, 1.28);
    let tick = Stroke::new("#000000", 0.8);
    let tick_style = TextStyle::new(TICK_SIZE)
        .anchor(Anchor::End)
        .baseline(Baseline::Center);
    for value in nice_ticks(y_min, y_max, MAX_Y_TICKS) {
        let y = axes.y(value);
        figure.line(axes.left, y, axes.right, y, &grid);
        figure.line(axes.left - TICK_LENGTH, y, axes.left, y, &tick);
        figure.text(
            axes.left - TICK_LENGTH - 3.5,
            y,
            &format_tick(value),
            &tick_style,
        );
    }

    let label_style = TextStyle::new(TICK_SIZE)
        .anchor(Anchor::Middle)
        .baseline(Baseline::Top);
    for (i, label) in series.labels.iter().enumerate() {
        let x = axes.x(i as f64);
        figure.line(x, axes.bottom, x, axes.bottom + TICK_LENGTH, &tick);
        figure.text(x, axes.bottom + TICK_LENGTH + 3.5, label, &label_style);
    }

    // Spines.
    figure.line(axes.left, axes.top, axes.left, axes.bottom, &tick);
    figure.line(axes.right, axes.top, axes.right, axes.bottom, &tick);
    figure.line(axes.left, axes.top, axes.right, axes.top, &tick);
    figure.line(axes.left, axes.bottom, axes.right, axes.bottom, &tick);

    figure.text(
        (axes.left + axes.right) / 2.0,
        axes.top - 6.0,
        title,
        &TextStyle::new(TITLE_SIZE).anchor(Anchor::Middle),
    );

    figure
}

fn x_limits(count: usize) -> (f64, f64) {
    if count == 0 {
        return (0.0, 1.0);
    }
    let min = -BAR_WIDTH / 2.0;
    let max = (count - 1) as f64 + BAR_WIDTH / 2.0;
    let pad = (max - min) * MARGIN;
    (min - pad, max + pad)
}

/// Value range including zero, padded on each side.
fn y_limits(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(0.0, f64::min);
    let max = values.iter().copied().fold(0.0, f64::max);
    if max - min <= f64::EPSILON {
        return (0.0, 1.0);
    }
    let pad = (max - min) * MARGIN;
    (if min < 0.0 { min - pad } else { 0.0 }, max + pad)
}
