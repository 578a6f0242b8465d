//! Domain types for representing a slide outline.

use crate::graph::Graph;
use crate::normalize::{self, value_to_string};
use crate::{Error, Result};
use serde_json::Value;

/// Title used when a slide has none.
pub const DEFAULT_TITLE: &str = "No Title";

/// A parsed slide outline, in presentation order.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    /// Slide descriptors in input order.
    pub slides: Vec<SlideDescriptor>,
}

impl Deck {
    /// Parse a deck from JSON text.
    ///
    /// The top-level value must be a list of slide objects.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Build a deck from an already-decoded JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let entries = value.as_array().ok_or_else(|| {
            Error::InvalidDeck(format!(
                "expected a list of slides at the top level, found {}",
                json_kind(value)
            ))
        })?;

        let slides = entries.iter().map(SlideDescriptor::from_value).collect();
        Ok(Self { slides })
    }

    /// Number of slides in the deck.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// The declared kind of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    /// A list of bullet points.
    BulletPoints,
    /// A bar chart of labelled values.
    BarChart,
    /// A concept map of nodes and edges.
    NetworkGraph,
    /// A horizontal timeline of dated events.
    Timeline,
    /// Anything else; renders as a title-only slide.
    Unknown,
}

impl SlideKind {
    /// Map a `type` string to a slide kind.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "bullet_points" => Self::BulletPoints,
            "bar_chart" => Self::BarChart,
            "network_graph" => Self::NetworkGraph,
            "timeline" => Self::Timeline,
            _ => Self::Unknown,
        }
    }
}

/// One slide of the outline: a title, a kind and kind-specific content.
#[derive(Debug, Clone)]
pub struct SlideDescriptor {
    /// Slide title (defaults to "No Title").
    pub title: String,

    /// Declared slide kind.
    pub kind: SlideKind,

    /// Raw content, normalized lazily by [`SlideDescriptor::body`].
    pub content: Value,
}

impl SlideDescriptor {
    /// Create a descriptor from parts.
    pub fn new(title: impl Into<String>, kind: SlideKind, content: Value) -> Self {
        Self {
            title: title.into(),
            kind,
            content,
        }
    }

    /// Read a descriptor from one entry of the top-level list.
    ///
    /// Never fails: entries that are not objects, or whose `type` is
    /// missing or unrecognized, become title-only slides so that every
    /// entry still yields exactly one page.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            log::warn!("Slide entry is {}, not an object; rendering title only", json_kind(value));
            return Self::new(DEFAULT_TITLE, SlideKind::Unknown, Value::Null);
        };

        let title = match map.get("title") {
            None | Some(Value::Null) => DEFAULT_TITLE.to_string(),
            Some(title) => value_to_string(title),
        };

        let kind = match map.get("type") {
            Some(Value::String(name)) => SlideKind::from_type_name(name),
            _ => SlideKind::Unknown,
        };
        if kind == SlideKind::Unknown {
            log::debug!("Slide '{}' has unrecognized type {:?}", title, map.get("type"));
        }

        let content = map.get("content").cloned().unwrap_or(Value::Null);

        Self {
            title,
            kind,
            content,
        }
    }

    /// Normalize the content for this slide's kind.
    ///
    /// Only bar charts can fail here: their labels and values must pair up.
    pub fn body(&self) -> Result<SlideBody> {
        let body = match self.kind {
            SlideKind::BulletPoints => SlideBody::BulletPoints(
                self.content
                    .get("points")
                    .and_then(Value::as_array)
                    .map(|points| points.iter().map(value_to_string).collect())
                    .unwrap_or_default(),
            ),
            SlideKind::BarChart => SlideBody::BarChart(BarSeries::from_content(&self.content)?),
            SlideKind::NetworkGraph => {
                let nodes = normalize::normalize_nodes(self.field("nodes"));
                let edges = normalize::normalize_edges(self.field("edges"));
                SlideBody::NetworkGraph(Graph::from_parts(nodes, edges))
            }
            SlideKind::Timeline => SlideBody::Timeline(normalize::normalize_events(&self.content)),
            SlideKind::Unknown => SlideBody::Empty,
        };
        Ok(body)
    }

    fn field(&self, key: &str) -> &Value {
        self.content.get(key).unwrap_or(&Value::Null)
    }
}

/// Normalized, render-ready content of a slide.
#[derive(Debug, Clone)]
pub enum SlideBody {
    /// Bullet point texts, without the bullet glyph.
    BulletPoints(Vec<String>),
    /// A bar chart series.
    BarChart(BarSeries),
    /// A concept map graph.
    NetworkGraph(Graph),
    /// Timeline events in input order.
    Timeline(Vec<TimelineEvent>),
    /// No body; the slide shows only its title.
    Empty,
}

/// Labels and values of a bar chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    /// Category labels along the x-axis.
    pub labels: Vec<String>,
    /// Bar heights, one per label.
    pub values: Vec<f64>,
}

impl BarSeries {
    /// Read `labels` and `values` from bar chart content.
    ///
    /// Missing keys give empty lists. Values must be numbers (or numeric
    /// strings) and the two lists must have the same length.
    pub fn from_content(content: &Value) -> Result<Self> {
        let labels: Vec<String> = list_field(content, "labels")
            .iter()
            .map(value_to_string)
            .collect();
        let values = list_field(content, "values")
            .iter()
            .map(|value| {
                let number = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                number.filter(|n| n.is_finite()).ok_or_else(|| {
                    Error::RenderError(format!("bar chart value {} is not a number", value))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if labels.len() != values.len() {
            return Err(Error::RenderError(format!(
                "bar chart has {} labels but {} values",
                labels.len(),
                values.len()
            )));
        }

        Ok(Self { labels, values })
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no bars.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A single timeline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    /// Date text shown above the point.
    pub date: String,
    /// Label text shown below the point.
    pub label: String,
}

impl TimelineEvent {
    /// Create a new event.
    pub fn new(date: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            label: label.into(),
        }
    }
}

fn list_field<'a>(content: &'a Value, key: &str) -> &'a [Value] {
    content
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deck_preserves_order_and_count() {
        let deck = Deck::from_json(
            r#"[
                {"title": "One", "type": "bullet_points", "content": {"points": ["a"]}},
                {"title": "Two", "type": "timeline", "content": {"events": []}},
                {"title": "Three", "type": "mystery"}
            ]"#,
        )
        .unwrap();

        let titles: Vec<&str> = deck.slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert_eq!(deck.slides[2].kind, SlideKind::Unknown);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Deck::from_json(r#"[{"title": "x""#).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_top_level_must_be_list() {
        let err = Deck::from_json(r#"{"title": "x"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidDeck(_)));
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_descriptor_defaults() {
        let slide = SlideDescriptor::from_value(&json!({"type": "bullet_points"}));
        assert_eq!(slide.title, DEFAULT_TITLE);
        assert_eq!(slide.kind, SlideKind::BulletPoints);
        assert!(matches!(slide.body().unwrap(), SlideBody::BulletPoints(p) if p.is_empty()));

        let slide = SlideDescriptor::from_value(&json!("just text"));
        assert_eq!(slide.title, DEFAULT_TITLE);
        assert_eq!(slide.kind, SlideKind::Unknown);

        let slide = SlideDescriptor::from_value(&json!({"title": 2024, "type": 3}));
        assert_eq!(slide.title, "2024");
        assert_eq!(slide.kind, SlideKind::Unknown);
    }

    #[test]
    fn test_unknown_kind_has_empty_body() {
        let slide = SlideDescriptor::from_value(&json!({"title": "X", "type": "pie_chart", "content": {"a": 1}}));
        assert!(matches!(slide.body().unwrap(), SlideBody::Empty));
    }

    #[test]
    fn test_bullet_points_stringified() {
        let slide = SlideDescriptor::from_value(&json!({
            "type": "bullet_points",
            "content": {"points": ["first", 2, true]}
        }));
        match slide.body().unwrap() {
            SlideBody::BulletPoints(points) => assert_eq!(points, vec!["first", "2", "true"]),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_bar_series() {
        let series = BarSeries::from_content(&json!({
            "labels": ["Q1", "Q2", "Q3"],
            "values": [10, 12.5, "7"]
        }))
        .unwrap();
        assert_eq!(series.labels, vec!["Q1", "Q2", "Q3"]);
        assert_eq!(series.values, vec![10.0, 12.5, 7.0]);
    }

    #[test]
    fn test_bar_series_missing_keys_is_empty() {
        let series = BarSeries::from_content(&json!({})).unwrap();
        assert!(series.is_empty());
        let series = BarSeries::from_content(&Value::Null).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_bar_series_length_mismatch() {
        let err = BarSeries::from_content(&json!({"labels": ["a", "b"], "values": [1]})).unwrap_err();
        assert!(matches!(err, Error::RenderError(_)));
    }

    #[test]
    fn test_bar_series_non_numeric() {
        let err = BarSeries::from_content(&json!({"labels": ["a"], "values": ["lots"]})).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn test_network_graph_body() {
        let slide = SlideDescriptor::from_value(&json!({
            "type": "network_graph",
            "content": {"nodes": ["A", ["B"], {"x": "C"}, {}, [], 5], "edges": [["A", "B"], {"s": "A", "t": "C"}, ["X"]]}
        }));
        match slide.body().unwrap() {
            SlideBody::NetworkGraph(graph) => {
                assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["A", "B", "C"]);
                assert_eq!(graph.edge_count(), 2);
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_timeline_body_from_list_content() {
        let slide = SlideDescriptor::from_value(&json!({
            "type": "timeline",
            "content": [{"year": 1990, "event": "Founded"}]
        }));
        match slide.body().unwrap() {
            SlideBody::Timeline(events) => {
                assert_eq!(events, vec![TimelineEvent::new("1990", "Founded")]);
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }
}
