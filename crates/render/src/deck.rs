//! Whole-deck generation.

use crate::slides::render_slide;
use deckgen_core::{Deck, Result, SpringLayout};
use deckgen_pptx::PptxDocument;

/// Rendering parameters shared by every slide of a build.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Raster resolution of chart pictures.
    pub dpi: f64,
    /// Layout used for concept maps.
    pub layout: SpringLayout,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 150.0,
            layout: SpringLayout::default(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_layout(mut self, layout: SpringLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Builds a PPTX deck from a parsed outline.
///
/// Every descriptor yields exactly one slide, in input order. Any slide
/// failure aborts the build and no output is produced.
#[derive(Debug, Clone, Default)]
pub struct DeckBuilder {
    options: RenderOptions,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render every slide into an in-memory document.
    pub fn build_document(&self, deck: &Deck) -> Result<PptxDocument> {
        let mut document = PptxDocument::new();
        if let Some(first) = deck.slides.first() {
            document = document.with_title(first.title.clone());
        }

        for (index, slide) in deck.slides.iter().enumerate() {
            log::debug!(
                "Rendering slide {} of {}: '{}' ({:?})",
                index + 1,
                deck.len(),
                slide.title,
                slide.kind
            );
            render_slide(document.add_slide(), slide, &self.options)?;
        }

        Ok(document)
    }

    /// Render `deck` and serialize it to PPTX bytes.
    pub fn build(&self, deck: &Deck) -> Result<Vec<u8>> {
        let bytes = self.build_document(deck)?.to_bytes()?;
        log::debug!("Built {} slides into {} bytes", deck.len(), bytes.len());
        Ok(bytes)
    }
}

/// Parse a JSON outline and build it with default options.
pub fn generate(json: &str) -> Result<Vec<u8>> {
    let deck = Deck::from_json(json)?;
    DeckBuilder::new().build(&deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_core::Error;
    use deckgen_pptx::{inches, DeckSummary, PptxInspector};
    use serde_json::json;
    use std::io::Cursor;

    fn build(value: serde_json::Value) -> Result<DeckSummary> {
        let deck = Deck::from_value(&value)?;
        let builder = DeckBuilder::new().with_options(RenderOptions::default().with_dpi(50.0));
        let bytes = builder.build(&deck)?;
        PptxInspector::new().inspect(Cursor::new(bytes))
    }

    #[test]
    fn test_one_slide_per_descriptor() {
        let summary = build(json!([
            {"title": "Agenda", "type": "bullet_points", "content": {"points": ["Intro", "Plan"]}},
            {"title": "Sales", "type": "bar_chart", "content": {"labels": ["Q1", "Q2"], "values": [10, 20]}},
            {"title": "Map", "type": "network_graph", "content": {"nodes": ["A"], "edges": [["A", "B"]]}},
            {"title": "History", "type": "timeline", "content": {"events": [{"year": 1990, "event": "Start"}]}}
        ]))
        .unwrap();

        assert_eq!(summary.slide_count(), 4);
        assert_eq!(summary.slides[0].texts, vec!["Agenda", "\u{2022} Intro", "\u{2022} Plan"]);
        assert!(summary.slides[0].pictures.is_empty());
        for slide in &summary.slides[1..] {
            assert_eq!(slide.pictures.len(), 1);
        }
    }

    #[test]
    fn test_unknown_type_is_title_only() {
        let summary = build(json!([
            {"title": "Hello", "type": "bullet_points", "content": {"points": ["x"]}},
            {"title": "Odd", "type": "pie_chart", "content": {}}
        ]))
        .unwrap();

        assert_eq!(summary.slide_count(), 2);
        let second = &summary.slides[1];
        assert_eq!(second.texts, vec!["Odd"]);
        assert_eq!(second.text_boxes, 1);
        assert!(second.pictures.is_empty());
    }

    #[test]
    fn test_missing_title_and_empty_bullets() {
        let summary = build(json!([{"type": "bullet_points", "content": {"points": []}}])).unwrap();
        assert_eq!(summary.slides[0].texts, vec!["No Title"]);
        assert_eq!(summary.slides[0].text_boxes, 2);
    }

    #[test]
    fn test_chart_placement() {
        let summary = build(json!([
            {"title": "Sales", "type": "bar_chart", "content": {"labels": ["A"], "values": [1]}},
            {"title": "History", "type": "timeline", "content": {"events": []}}
        ]))
        .unwrap();

        let (x, y, width, height) = summary.slides[0].pictures[0];
        assert_eq!((x, y, width), (inches(1.0), inches(1.5), inches(8.0)));
        assert!(height > 0);

        let (x, y, width, _) = summary.slides[1].pictures[0];
        assert_eq!((x, y, width), (inches(1.0), inches(2.5), inches(8.0)));
    }

    #[test]
    fn test_empty_graph_still_renders() {
        let summary = build(json!([
            {"title": "Empty", "type": "network_graph", "content": {}}
        ]))
        .unwrap();
        assert_eq!(summary.slides[0].pictures.len(), 1);
    }

    #[test]
    fn test_layout_failure_does_not_abort() {
        let deck = Deck::from_value(&json!([
            {"title": "Big", "type": "network_graph", "content": {"nodes": ["A", "B", "C"]}},
            {"title": "After", "type": "bullet_points", "content": {"points": ["still here"]}}
        ]))
        .unwrap();
        let options = RenderOptions::default()
            .with_dpi(50.0)
            .with_layout(SpringLayout::default().with_max_nodes(2));
        let bytes = DeckBuilder::new().with_options(options).build(&deck).unwrap();
        let summary = PptxInspector::new().inspect(Cursor::new(bytes)).unwrap();

        assert_eq!(summary.slide_count(), 2);
        assert_eq!(summary.slides[0].pictures.len(), 1);
        assert_eq!(summary.slides[1].texts, vec!["After", "\u{2022} still here"]);
    }

    #[test]
    fn test_control_characters_do_not_abort() {
        let summary = build(json!([
            {"title": "Map\u{7}", "type": "network_graph", "content": {"nodes": ["ok", "bad\u{7}"]}},
            {"title": "After", "type": "bullet_points", "content": {"points": ["bell\u{7}"]}}
        ]))
        .unwrap();

        assert_eq!(summary.slide_count(), 2);
        assert_eq!(summary.slides[0].texts, vec!["Map"]);
        assert_eq!(summary.slides[0].pictures.len(), 1);
        assert_eq!(summary.slides[1].texts, vec!["After", "\u{2022} bell"]);
    }

    #[test]
    fn test_bar_mismatch_aborts_build() {
        let err = build(json!([
            {"title": "Bad", "type": "bar_chart", "content": {"labels": ["A", "B"], "values": [1]}}
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::RenderError(_)));
    }

    #[test]
    fn test_generate_rejects_malformed_json() {
        let err = generate(r#"[{"title": "x""#).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_generate_empty_deck() {
        let bytes = generate("[]").unwrap();
        let summary = PptxInspector::new().inspect(Cursor::new(bytes)).unwrap();
        assert_eq!(summary.slide_count(), 0);
    }
}
