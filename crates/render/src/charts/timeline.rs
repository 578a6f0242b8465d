//! Timeline figure.

use super::{placeholder, Axes};
use crate::figure::{Anchor, Baseline, Figure, Stroke, TextStyle};
use deckgen_core::normalize::truncate_label;
use deckgen_core::TimelineEvent;

pub const WIDTH: f64 = 8.0;
pub const HEIGHT: f64 = 3.0;

const LINE_COLOR: &str = "#FF7043";
const LINE_WIDTH: f64 = 3.0;
/// Marker diameter in points.
const MARKER_SIZE: f64 = 10.0;
const DATE_SIZE: f64 = 10.0;
const LABEL_SIZE: f64 = 12.0;
/// Labels longer than this many characters are shortened.
const LABEL_LIMIT: usize = 10;
const MARGIN: f64 = 0.05;

/// Draw `events` left to right in input order.
pub fn timeline(events: &[TimelineEvent], font_family: &str) -> Figure {
    let mut figure = Figure::new(WIDTH, HEIGHT).with_font_family(font_family);
    if events.is_empty() {
        placeholder(&mut figure, "No Timeline Data");
        return figure;
    }

    let last = (events.len() - 1) as f64;
    let (x_min, x_max) = if events.len() == 1 {
        (-1.0, 1.0)
    } else {
        (-last * MARGIN, last * (1.0 + MARGIN))
    };
    let axes = Axes::new(&figure)
        .with_x_range(x_min, x_max)
        .with_y_range(0.5, 1.5);

    let y = axes.y(1.0);
    figure.line(axes.x(0.0), y, axes.x(last), y, &Stroke::new(LINE_COLOR, LINE_WIDTH));

    let date_style = TextStyle::new(DATE_SIZE).color("gray").anchor(Anchor::Middle);
    let label_style = TextStyle::new(LABEL_SIZE)
        .bold(true)
        .anchor(Anchor::Middle)
        .baseline(Baseline::Top);
    for (i, event) in events.iter().enumerate() {
        let x = axes.x(i as f64);
        figure.circle(x, y, MARKER_SIZE / 2.0, LINE_COLOR, None);
        figure.text(x, axes.y(1.15), &event.date, &date_style);
        figure.text(
            x,
            axes.y(0.85),
            &truncate_label(&event.label, LABEL_LIMIT),
            &label_style,
        );
    }

    figure
}
