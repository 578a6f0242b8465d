//! Lay out one slide descriptor on a page.

use crate::charts;
use crate::deck::RenderOptions;
use crate::figure::Figure;
use crate::fonts;
use crate::raster::{rasterize, RasterImage};
use deckgen_core::{Result, SlideBody, SlideDescriptor};
use deckgen_pptx::{inches, Frame, Paragraph, SlidePage};

const TITLE_SIZE: f64 = 28.0;
const BULLET_SIZE: f64 = 18.0;
const BULLET_SPACING: f64 = 10.0;
const BULLET: &str = "\u{2022}";

/// Left edge and width of chart pictures, in inches.
const CHART_LEFT: f64 = 1.0;
const CHART_WIDTH: f64 = 8.0;
const CHART_TOP: f64 = 1.5;
const TIMELINE_TOP: f64 = 2.5;

/// Render `slide` onto `page`: the title box, then the body for its kind.
///
/// Unknown kinds get the title only.
pub fn render_slide(page: &mut SlidePage, slide: &SlideDescriptor, options: &RenderOptions) -> Result<()> {
    page.add_text_box(
        Frame::from_inches(0.5, 0.2, 9.0, 1.0),
        vec![Paragraph::new(&slide.title, TITLE_SIZE).bold(true)],
        false,
    );

    let family = fonts::registry().family();
    match slide.body()? {
        SlideBody::BulletPoints(points) => {
            let paragraphs = points
                .iter()
                .map(|point| {
                    Paragraph::new(format!("{} {}", BULLET, point), BULLET_SIZE)
                        .space_after(BULLET_SPACING)
                })
                .collect();
            page.add_text_box(Frame::from_inches(0.5, 1.5, 9.0, 5.0), paragraphs, true);
        }
        SlideBody::BarChart(series) => {
            let figure = charts::bar_chart(&slide.title, &series, family);
            place_chart(page, &figure, CHART_TOP, options)?;
        }
        SlideBody::NetworkGraph(graph) => {
            let figure = charts::network_graph(&graph, &options.layout, family);
            let image = rasterize_concept_map(&figure, family, options)?;
            place_image(page, image, CHART_TOP)?;
        }
        SlideBody::Timeline(events) => {
            let figure = charts::timeline(&events, family);
            place_chart(page, &figure, TIMELINE_TOP, options)?;
        }
        SlideBody::Empty => {}
    }

    Ok(())
}

fn place_chart(page: &mut SlidePage, figure: &Figure, top: f64, options: &RenderOptions) -> Result<()> {
    let image = rasterize(figure, options.dpi)?;
    place_image(page, image, top)
}

/// Rasterize a concept map, replacing it with a "Graph Error" figure if it
/// cannot be drawn.
fn rasterize_concept_map(figure: &Figure, family: &str, options: &RenderOptions) -> Result<RasterImage> {
    match rasterize(figure, options.dpi) {
        Ok(image) => Ok(image),
        Err(e) => {
            log::warn!("Concept map could not be rasterized: {}", e);
            rasterize(&charts::network::error_figure(&e, family), options.dpi)
        }
    }
}

fn place_image(page: &mut SlidePage, image: RasterImage, top: f64) -> Result<()> {
    let pixel_size = (image.width, image.height);
    let frame = page.add_picture(
        inches(CHART_LEFT),
        inches(top),
        inches(CHART_WIDTH),
        image.png,
        pixel_size,
    )?;
    log::trace!(
        "Placed {}x{} px chart at {}x{} EMU",
        pixel_size.0,
        pixel_size.1,
        frame.width,
        frame.height
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_core::{Error, SlideKind};
    use serde_json::json;

    fn render(slide: SlideDescriptor) -> Result<SlidePage> {
        let mut page = SlidePage::new();
        render_slide(&mut page, &slide, &RenderOptions::default().with_dpi(36.0))?;
        Ok(page)
    }

    #[test]
    fn test_bullets_are_text_only() {
        let page = render(SlideDescriptor::new(
            "Agenda",
            SlideKind::BulletPoints,
            json!({"points": ["Intro", "Plan"]}),
        ))
        .unwrap();
        assert_eq!(page.shape_count(), 2);
        assert!(page.images().is_empty());
        let xml = page.to_xml().unwrap();
        assert!(xml.contains("<a:t>\u{2022} Intro</a:t>"));
        assert!(xml.contains(r#"<a:spcPts val="1000"/>"#));
    }

    #[test]
    fn test_unknown_kind_is_title_only() {
        let page = render(SlideDescriptor::new("Mystery", SlideKind::Unknown, json!({}))).unwrap();
        assert_eq!(page.shape_count(), 1);
    }

    #[test]
    fn test_chart_kinds_embed_one_picture() {
        let slides = [
            SlideDescriptor::new(
                "Sales",
                SlideKind::BarChart,
                json!({"labels": ["A", "B"], "values": [1, 2]}),
            ),
            SlideDescriptor::new(
                "Map",
                SlideKind::NetworkGraph,
                json!({"nodes": ["A", "B"], "edges": [["A", "B"]]}),
            ),
            SlideDescriptor::new("History", SlideKind::Timeline, json!({"events": []})),
        ];
        for slide in slides {
            let page = render(slide).unwrap();
            assert_eq!(page.shape_count(), 2);
            assert_eq!(page.images().len(), 1);
        }
    }

    #[test]
    fn test_concept_map_falls_back_when_rasterizing_fails() {
        // A zero-sized canvas is rejected by the SVG parser.
        let broken = Figure::new(0.0, 0.0);
        let options = RenderOptions::default().with_dpi(36.0);
        assert!(rasterize(&broken, options.dpi).is_err());

        let image = rasterize_concept_map(&broken, "sans-serif", &options).unwrap();
        assert!(image.width > 0 && image.height > 0);
    }

    #[test]
    fn test_control_character_node_label_renders() {
        let page = render(SlideDescriptor::new(
            "Map",
            SlideKind::NetworkGraph,
            json!({"nodes": ["ok", "bad\u{7}"]}),
        ))
        .unwrap();
        assert_eq!(page.images().len(), 1);
    }

    #[test]
    fn test_bar_mismatch_fails() {
        let err = render(SlideDescriptor::new(
            "Broken",
            SlideKind::BarChart,
            json!({"labels": ["A", "B"], "values": [1]}),
        ))
        .unwrap_err();
        assert!(matches!(err, Error::RenderError(_)));
    }
}
