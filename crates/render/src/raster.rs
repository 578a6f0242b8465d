//! Rasterize figures to PNG.

use crate::figure::Figure;
use crate::fonts;
use deckgen_core::{Error, Result};
use resvg::usvg;
use tiny_skia::{Color, Pixmap, Transform};

/// Padding kept around the drawn content, in points (0.1 inch).
const TIGHT_PADDING: f32 = 7.2;

/// A PNG image and its pixel size.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Render `figure` at `dpi`, cropped to its drawn content plus a small
/// margin, on a white background.
///
/// The pixel buffer is released before returning; only the encoded PNG is
/// kept.
pub fn rasterize(figure: &Figure, dpi: f64) -> Result<RasterImage> {
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err(Error::RasterError(format!(
            "resolution must be a positive number of dots per inch, got {}",
            dpi
        )));
    }

    let svg = figure.to_svg();
    let options = fonts::registry().usvg_options();
    let tree = usvg::Tree::from_str(&svg, &options)
        .map_err(|e| Error::RasterError(format!("failed to parse chart SVG: {}", e)))?;

    let (x, y, width, height) = tight_bounds(&tree);
    let scale = (dpi / 72.0) as f32;

    let pixel_width = (width * scale).ceil();
    let pixel_height = (height * scale).ceil();
    if pixel_width < 1.0 || pixel_height < 1.0 {
        return Err(Error::RasterError(
            "chart collapsed below one pixel; try a higher resolution".to_string(),
        ));
    }
    if pixel_width > u32::MAX as f32 || pixel_height > u32::MAX as f32 {
        return Err(Error::RasterError(
            "chart exceeds supported image size; try a lower resolution".to_string(),
        ));
    }
    let (pixel_width, pixel_height) = (pixel_width as u32, pixel_height as u32);

    let mut pixmap = Pixmap::new(pixel_width, pixel_height).ok_or_else(|| {
        Error::RasterError(format!(
            "failed to allocate {}x{} surface",
            pixel_width, pixel_height
        ))
    })?;
    pixmap.fill(Color::WHITE);

    let transform = Transform::from_row(scale, 0.0, 0.0, scale, -x * scale, -y * scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let png = pixmap
        .encode_png()
        .map_err(|e| Error::RasterError(format!("failed to encode PNG: {}", e)))?;
    drop(pixmap);

    log::trace!(
        "Rasterized {}x{} pt figure to {}x{} px",
        figure.width(),
        figure.height(),
        pixel_width,
        pixel_height
    );

    Ok(RasterImage {
        png,
        width: pixel_width,
        height: pixel_height,
    })
}

/// Content bounds plus padding. Content drawn past the canvas edge is kept;
/// falls back to the whole canvas when nothing visible was drawn.
fn tight_bounds(tree: &usvg::Tree) -> (f32, f32, f32, f32) {
    let canvas = tree.size();
    let bounds = tree.root().abs_stroke_bounding_box();
    if bounds.width() < 1.0 || bounds.height() < 1.0 {
        return (0.0, 0.0, canvas.width(), canvas.height());
    }

    (
        bounds.left() - TIGHT_PADDING,
        bounds.top() - TIGHT_PADDING,
        bounds.width() + 2.0 * TIGHT_PADDING,
        bounds.height() + 2.0 * TIGHT_PADDING,
    )
}
