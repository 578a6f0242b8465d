//! Chart figures for the visual slide kinds.
//!
//! Each chart draws onto a [`Figure`] in data coordinates mapped through
//! an [`Axes`] box; rasterization happens separately.

pub mod bar;
pub mod network;
pub mod timeline;

use crate::figure::{Figure, TextStyle};

pub use bar::bar_chart;
pub use network::network_graph;
pub use timeline::timeline;

/// Size of placeholder messages.
const PLACEHOLDER_SIZE: f64 = 14.0;

/// Plot area inside a figure, with the data ranges it maps to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Axes {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Axes {
    /// The default plot area of a figure.
    pub fn new(figure: &Figure) -> Self {
        let (w, h) = (figure.width(), figure.height());
        Self {
            left: 0.125 * w,
            right: 0.9 * w,
            top: 0.12 * h,
            bottom: 0.89 * h,
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
        }
    }

    pub fn with_x_range(mut self, min: f64, max: f64) -> Self {
        self.x_range = (min, max);
        self
    }

    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = (min, max);
        self
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Figure x for a data x.
    pub fn x(&self, value: f64) -> f64 {
        let (min, max) = self.x_range;
        self.left + (value - min) / span(min, max) * self.width()
    }

    /// Figure y for a data y; larger values are higher up.
    pub fn y(&self, value: f64) -> f64 {
        let (min, max) = self.y_range;
        self.bottom - (value - min) / span(min, max) * self.height()
    }

    /// Figure points per data unit along x.
    pub fn x_scale(&self) -> f64 {
        let (min, max) = self.x_range;
        self.width() / span(min, max)
    }
}

fn span(min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        1.0
    } else {
        span
    }
}

/// Draw `message` centered in the figure.
pub(crate) fn placeholder(figure: &mut Figure, message: &str) {
    let (x, y) = (figure.width() / 2.0, figure.height() / 2.0);
    figure.text(x, y, message, &TextStyle::centered(PLACEHOLDER_SIZE));
}

/// Evenly spaced "nice" tick values covering `min..=max`.
///
/// Steps are 1, 2, 2.5 or 5 times a power of ten, aiming for at most
/// `max_ticks` ticks.
pub(crate) fn nice_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min || max_ticks < 2 {
        return vec![min];
    }

    let raw_step = (max - min) / (max_ticks - 1) as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Format a tick value without trailing zeros.
pub(crate) fn format_tick(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_mapping() {
        let figure = Figure::new(8.0, 4.5);
        let axes = Axes::new(&figure).with_x_range(0.0, 10.0).with_y_range(0.0, 100.0);
        assert_eq!(axes.x(0.0), axes.left);
        assert!((axes.x(10.0) - axes.right).abs() < 1e-9);
        assert_eq!(axes.y(0.0), axes.bottom);
        assert!((axes.y(100.0) - axes.top).abs() < 1e-9);
        assert!(axes.y(75.0) < axes.y(25.0));
    }

    #[test]
    fn test_degenerate_range() {
        let figure = Figure::new(1.0, 1.0);
        let axes = Axes::new(&figure).with_x_range(3.0, 3.0);
        assert!(axes.x(3.0).is_finite());
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 100.0, 6), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(nice_ticks(0.0, 10.5, 6), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        let ticks = nice_ticks(-52.5, 105.0, 7);
        assert!(ticks.contains(&0.0));
        assert!(ticks.iter().all(|t| (-52.5..=105.0).contains(t)));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(20.0), "20");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(-0.0), "0");
        assert_eq!(format_tick(0.1 + 0.2), "0.3");
    }
}
