//! Concept map (network graph) figure.

use super::{placeholder, Axes};
use crate::figure::{Anchor, Figure, Stroke, TextStyle};
use deckgen_core::{Graph, LayoutError, SpringLayout};
use std::fmt::Display;

pub const WIDTH: f64 = 8.0;
pub const HEIGHT: f64 = 5.0;

/// Node marker size: the square of its diameter in points.
const NODE_SIZE: f64 = 2000.0;
const NODE_FILL: &str = "#E8F5E9";
const NODE_OUTLINE: &str = "#2E7D32";
const EDGE_COLOR: &str = "#90A4AE";
const EDGE_WIDTH: f64 = 2.0;
const LABEL_SIZE: f64 = 11.0;
const CAPTION: &str = "Concept Map";
const CAPTION_SIZE: f64 = 14.0;

/// Draw `graph` with a spring layout.
///
/// Layout failures never escape: the figure shows a "Graph Error" message
/// in place of the drawing.
pub fn network_graph(graph: &Graph, layout: &SpringLayout, font_family: &str) -> Figure {
    let mut figure = Figure::new(WIDTH, HEIGHT).with_font_family(font_family);

    if graph.is_empty() {
        placeholder(&mut figure, "No Data for Graph");
    } else {
        // Draw onto a scratch copy so a failure leaves nothing half-drawn.
        let mut scratch = figure.blank_like();
        match draw_graph(&mut scratch, graph, layout) {
            Ok(()) => figure.append(scratch),
            Err(e) => {
                log::warn!("Concept map layout failed: {}", e);
                return error_figure(&e, font_family);
            }
        }
    }

    caption(&mut figure);
    figure
}

/// A concept map figure that only reports `error`.
pub fn error_figure(error: &impl Display, font_family: &str) -> Figure {
    let mut figure = Figure::new(WIDTH, HEIGHT).with_font_family(font_family);
    placeholder(&mut figure, &format!("Graph Error: {}", error));
    caption(&mut figure);
    figure
}

fn caption(figure: &mut Figure) {
    let axes = Axes::new(figure);
    figure.text(
        axes.left,
        axes.top - 6.0,
        CAPTION,
        &TextStyle::new(CAPTION_SIZE).color("gray").anchor(Anchor::Start),
    );
}

fn draw_graph(figure: &mut Figure, graph: &Graph, layout: &SpringLayout) -> Result<(), LayoutError> {
    let layout = layout.compute(graph)?;
    let radius = node_radius();

    // Inset the plot area so nodes on the rim are not clipped.
    let mut axes = Axes::new(figure)
        .with_x_range(-1.0, 1.0)
        .with_y_range(-1.0, 1.0);
    axes.left += radius;
    axes.right -= radius;
    axes.top += radius;
    axes.bottom -= radius;

    let point = |index: usize| {
        layout
            .position(index)
            .map(|(x, y)| (axes.x(x), axes.y(y)))
            .ok_or(LayoutError::NonFinite)
    };

    let edge = Stroke::new(EDGE_COLOR, EDGE_WIDTH);
    for (a, b) in graph.edges() {
        if a == b {
            continue;
        }
        let (x1, y1) = point(a)?;
        let (x2, y2) = point(b)?;
        figure.line(x1, y1, x2, y2, &edge);
    }

    let outline = Stroke::new(NODE_OUTLINE, 1.0);
    let label = TextStyle::centered(LABEL_SIZE);
    for (index, name) in graph.nodes().enumerate() {
        let (x, y) = point(index)?;
        figure.circle(x, y, radius, NODE_FILL, Some(&outline));
        figure.text(x, y, name, &label);
    }

    Ok(())
}

/// Circle radius for the configured marker size.
fn node_radius() -> f64 {
    NODE_SIZE.sqrt() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut graph = Graph::new();
        graph.add_edge("AI", "ML");
        graph.add_edge("ML", "DL");
        graph.add_edge("DL", "AI");
        graph
    }

    #[test]
    fn test_empty_graph_placeholder() {
        let figure = network_graph(&Graph::new(), &SpringLayout::default(), "sans-serif");
        let svg = figure.to_svg();
        assert!(svg.contains(">No Data for Graph</text>"));
        assert!(svg.contains(">Concept Map</text>"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_nodes_edges_and_labels() {
        let figure = network_graph(&triangle(), &SpringLayout::default(), "sans-serif");
        let svg = figure.to_svg();
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("<line").count(), 3);
        assert!(svg.contains(">ML</text>"));
        assert!(svg.contains(r##"fill="#E8F5E9" stroke="#2E7D32""##));
        assert!(svg.contains(r#"fill="gray""#));
    }

    #[test]
    fn test_edges_drawn_before_nodes() {
        let svg = network_graph(&triangle(), &SpringLayout::default(), "sans-serif").to_svg();
        let last_line = svg.rfind("<line").unwrap();
        let first_circle = svg.find("<circle").unwrap();
        assert!(last_line < first_circle);
    }

    #[test]
    fn test_layout_failure_becomes_message() {
        let layout = SpringLayout::default().with_max_nodes(2);
        let svg = network_graph(&triangle(), &layout, "sans-serif").to_svg();
        assert!(svg.contains(">Graph Error: graph has 3 nodes, layout limit is 2</text>"));
        assert!(!svg.contains("<circle"));
        assert!(svg.contains(">Concept Map</text>"));
    }

    #[test]
    fn test_error_figure() {
        let svg = error_figure(&"boom", "sans-serif").to_svg();
        assert!(svg.contains(">Graph Error: boom</text>"));
        assert!(svg.contains(">Concept Map</text>"));
    }

    #[test]
    fn test_control_character_label_dropped() {
        let graph = Graph::from_parts(vec!["ok".to_string(), "bad\u{7}".to_string()], Vec::new());
        let svg = network_graph(&graph, &SpringLayout::default(), "sans-serif").to_svg();
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(">bad</text>"));
    }

    #[test]
    fn test_self_loop_not_drawn() {
        let mut graph = Graph::new();
        graph.add_edge("A", "A");
        let svg = network_graph(&graph, &SpringLayout::default(), "sans-serif").to_svg();
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(!svg.contains("<line"));
    }

    #[test]
    fn test_node_radius() {
        assert!((node_radius() - 22.36).abs() < 0.01);
    }

    #[test]
    fn test_deterministic_output() {
        let first = network_graph(&triangle(), &SpringLayout::default(), "sans-serif").to_svg();
        let second = network_graph(&triangle(), &SpringLayout::default(), "sans-serif").to_svg();
        assert_eq!(first, second);
    }
}
