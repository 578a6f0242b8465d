//! Chart rendering and slide layout for JSON-to-slides generation.
//!
//! Charts are drawn as SVG [`Figure`]s, rasterized with resvg and placed
//! on PPTX pages alongside plain text boxes.

pub mod charts;
pub mod deck;
pub mod figure;
pub mod fonts;
pub mod raster;
pub mod slides;

pub use deck::{generate, DeckBuilder, RenderOptions};
pub use figure::Figure;
pub use fonts::FontRegistry;
pub use raster::{rasterize, RasterImage};
pub use slides::render_slide;
