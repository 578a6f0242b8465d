//! A minimal SVG canvas for chart drawing.
//!
//! Coordinates are typographic points (1/72 inch) with the origin at the
//! top-left, so a figure's size in inches maps directly to its raster size
//! at a given DPI.

use deckgen_core::normalize::strip_xml_invalid;
use quick_xml::escape::escape;
use std::fmt::Write;

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// The anchor is the alphabetic baseline.
    Alphabetic,
    /// The anchor is the vertical center of the text.
    Center,
    /// The anchor is the top of the text.
    Top,
}

impl Baseline {
    fn as_svg(self) -> Option<&'static str> {
        match self {
            Baseline::Alphabetic => None,
            Baseline::Center => Some("central"),
            Baseline::Top => Some("hanging"),
        }
    }
}

/// Text appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: &'static str,
    pub bold: bool,
    pub anchor: Anchor,
    pub baseline: Baseline,
}

impl TextStyle {
    /// Black, regular text anchored at its start on the baseline.
    pub fn new(size: f64) -> Self {
        Self {
            size,
            color: "#000000",
            bold: false,
            anchor: Anchor::Start,
            baseline: Baseline::Alphabetic,
        }
    }

    /// Text centered both ways on its anchor.
    pub fn centered(size: f64) -> Self {
        Self::new(size).anchor(Anchor::Middle).baseline(Baseline::Center)
    }

    pub fn color(mut self, color: &'static str) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Line appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
    /// Dash and gap lengths.
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn new(color: &'static str, width: f64) -> Self {
        Self {
            color,
            width,
            opacity: 1.0,
            dash: None,
        }
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn dashed(mut self, dash: f64, gap: f64) -> Self {
        self.dash = Some((dash, gap));
        self
    }
}

/// An SVG drawing of a fixed size.
#[derive(Debug, Clone)]
pub struct Figure {
    width: f64,
    height: f64,
    font_family: String,
    body: String,
}

impl Figure {
    /// Create an empty figure `width` x `height` inches.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width * 72.0,
            height: height * 72.0,
            font_family: crate::fonts::FALLBACK_FAMILY.to_string(),
            body: String::new(),
        }
    }

    /// Set the font family used for all text.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Width in points.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height in points.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// An empty figure with the same size and font.
    pub fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            font_family: self.font_family.clone(),
            body: String::new(),
        }
    }

    /// Append everything drawn on `other`.
    pub fn append(&mut self, other: Figure) {
        self.body.push_str(&other.body);
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &Stroke) {
        let _ = write!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            stroke_attributes(stroke)
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, stroke: Option<&Stroke>) {
        let _ = write!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"{}/>"#,
            num(cx),
            num(cy),
            num(r),
            fill,
            stroke.map(stroke_attributes).unwrap_or_default()
        );
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str, opacity: f64) {
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
            num(x),
            num(y),
            num(width),
            num(height),
            fill
        );
        if opacity < 1.0 {
            let _ = write!(self.body, r#" fill-opacity="{}""#, num(opacity));
        }
        self.body.push_str("/>");
    }

    pub fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="{}""#,
            num(x),
            num(y),
            escape(&strip_xml_invalid(&self.font_family)),
            num(style.size),
            style.color,
            style.anchor.as_svg()
        );
        if let Some(baseline) = style.baseline.as_svg() {
            let _ = write!(self.body, r#" dominant-baseline="{}""#, baseline);
        }
        if style.bold {
            self.body.push_str(r#" font-weight="bold""#);
        }
        let _ = write!(self.body, ">{}</text>", escape(&strip_xml_invalid(text)));
    }

    /// The complete SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(self.width),
            h = num(self.height)
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

fn stroke_attributes(stroke: &Stroke) -> String {
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{}""#,
        stroke.color,
        num(stroke.width)
    );
    if stroke.opacity < 1.0 {
        let _ = write!(attrs, r#" stroke-opacity="{}""#, num(stroke.opacity));
    }
    if let Some((dash, gap)) = stroke.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{} {}""#, num(dash), num(gap));
    }
    attrs
}

/// Format a coordinate with at most two decimals.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // Avoid "-0".
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_size_in_points() {
        let figure = Figure::new(8.0, 4.5);
        assert_eq!(figure.width(), 576.0);
        assert_eq!(figure.height(), 324.0);
        assert!(figure
            .to_svg()
            .starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="576" height="324" viewBox="0 0 576 324">"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut figure = Figure::new(1.0, 1.0).with_font_family("IPAexGothic");
        figure.text(10.0, 20.0, "R&D <2024>", &TextStyle::centered(11.0).bold(true));
        let svg = figure.to_svg();
        assert!(svg.contains(">R&amp;D &lt;2024&gt;</text>"));
        assert!(svg.contains(r#"font-family="IPAexGothic""#));
        assert!(svg.contains(r#"dominant-baseline="central""#));
        assert!(svg.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn test_text_drops_control_characters() {
        let mut figure = Figure::new(1.0, 1.0);
        figure.text(0.0, 0.0, "bad\u{7}label", &TextStyle::new(11.0));
        let svg = figure.to_svg();
        assert!(svg.contains(">badlabel</text>"));
        assert!(!svg.contains('\u{7}'));
    }

    #[test]
    fn test_dashed_translucent_line() {
        let mut figure = Figure::new(1.0, 1.0);
        figure.line(0.0, 1.0, 10.0, 1.0, &Stroke::new("#b0b0b0", 0.8).opacity(0.5).dashed(3.7, 1.6));
        let svg = figure.to_svg();
        assert!(svg.contains(r#"stroke-dasharray="3.7 1.6""#));
        assert!(svg.contains(r#"stroke-opacity="0.5""#));
    }

    #[test]
    fn test_append_merges_drawings() {
        let mut figure = Figure::new(2.0, 1.0);
        let mut scratch = figure.blank_like();
        assert!(scratch.is_empty());
        scratch.circle(5.0, 5.0, 2.0, "#E8F5E9", None);
        figure.append(scratch);
        assert!(figure.to_svg().contains("<circle"));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(1.23456), "1.23");
        assert_eq!(num(-0.001), "0");
    }
}
