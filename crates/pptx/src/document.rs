//! In-memory presentation model for building a PPTX file.

use deckgen_core::normalize::strip_xml_invalid;
use deckgen_core::{Error, Result};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Convert inches to EMUs.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Position and size of a shape, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a frame from measurements in inches.
    pub fn from_inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(inches(x), inches(y), inches(width), inches(height))
    }
}

/// A single-run paragraph of a text box.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    /// Font size in points.
    pub size: f64,
    pub bold: bool,
    /// Space after the paragraph in points.
    pub space_after: Option<f64>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, size: f64) -> Self {
        Self {
            text: text.into(),
            size,
            bold: false,
            space_after: None,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn space_after(mut self, points: f64) -> Self {
        self.space_after = Some(points);
        self
    }
}

#[derive(Debug, Clone)]
enum Shape {
    TextBox {
        frame: Frame,
        paragraphs: Vec<Paragraph>,
        word_wrap: bool,
    },
    Picture {
        frame: Frame,
        /// Index into the slide's image list.
        image: usize,
    },
}

/// One slide page: text boxes and pictures in z-order.
#[derive(Debug, Clone, Default)]
pub struct SlidePage {
    shapes: Vec<Shape>,
    images: Vec<Vec<u8>>,
}

impl SlidePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text box with the given paragraphs.
    ///
    /// An empty paragraph list still produces a (blank) text box.
    pub fn add_text_box(&mut self, frame: Frame, paragraphs: Vec<Paragraph>, word_wrap: bool) {
        self.shapes.push(Shape::TextBox {
            frame,
            paragraphs,
            word_wrap,
        });
    }

    /// Add a PNG picture at `(x, y)` scaled to `width`.
    ///
    /// `pixel_size` is the image's `(width, height)` in pixels; the frame
    /// height follows from that aspect ratio. Returns the frame the picture
    /// was placed in.
    pub fn add_picture(
        &mut self,
        x: i64,
        y: i64,
        width: i64,
        png: Vec<u8>,
        pixel_size: (u32, u32),
    ) -> Result<Frame> {
        let (px_width, px_height) = pixel_size;
        if px_width == 0 || px_height == 0 {
            return Err(Error::RenderError(format!(
                "picture has zero size ({}x{} px)",
                px_width, px_height
            )));
        }
        let height = (width as f64 * px_height as f64 / px_width as f64).round() as i64;
        let frame = Frame::new(x, y, width, height);

        self.images.push(png);
        self.shapes.push(Shape::Picture {
            frame,
            image: self.images.len() - 1,
        });
        Ok(frame)
    }

    /// Number of shapes on the slide.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// PNG images referenced by this slide, in relationship order.
    pub fn images(&self) -> &[Vec<u8>] {
        &self.images
    }

    /// Generate the slide part XML.
    ///
    /// Relationship `rId1` is the slide layout; images follow from `rId2`.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str(GROUP_SHAPE_PROPERTIES);

        for (index, shape) in self.shapes.iter().enumerate() {
            // Group shape uses id 1.
            let shape_id = index + 2;
            match shape {
                Shape::TextBox {
                    frame,
                    paragraphs,
                    word_wrap,
                } => write_text_box(&mut xml, shape_id, frame, paragraphs, *word_wrap)?,
                Shape::Picture { frame, image } => {
                    write_picture(&mut xml, shape_id, frame, &format!("rId{}", image + 2))?
                }
            }
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

/// A presentation under construction.
#[derive(Debug, Clone)]
pub struct PptxDocument {
    slides: Vec<SlidePage>,
    /// Slide width in EMUs.
    width: i64,
    /// Slide height in EMUs.
    height: i64,
    title: Option<String>,
}

impl Default for PptxDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PptxDocument {
    /// Create an empty 10" x 7.5" presentation.
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            width: inches(10.0),
            height: inches(7.5),
            title: None,
        }
    }

    /// Set the document title stored in the package metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a blank slide and return it for drawing.
    pub fn add_slide(&mut self) -> &mut SlidePage {
        self.slides.push(SlidePage::new());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[SlidePage] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Serialize the presentation to PPTX bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::package::write_package(self)
    }
}

const GROUP_SHAPE_PROPERTIES: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
);

fn write_xfrm(xml: &mut String, frame: &Frame) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.width, frame.height
    )
    .map_err(|e| Error::XmlError(e.to_string()))
}

fn write_text_box(
    xml: &mut String,
    shape_id: usize,
    frame: &Frame,
    paragraphs: &[Paragraph],
    word_wrap: bool,
) -> Result<()> {
    xml.push_str("<p:sp><p:nvSpPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
        shape_id,
        shape_id - 1
    )
    .map_err(|e| Error::XmlError(e.to_string()))?;
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

    xml.push_str("<p:spPr>");
    write_xfrm(xml, frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
    xml.push_str("</p:spPr>");

    xml.push_str("<p:txBody>");
    if word_wrap {
        xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"><a:spAutoFit/></a:bodyPr>"#);
    } else {
        xml.push_str(r#"<a:bodyPr wrap="none" rtlCol="0"><a:spAutoFit/></a:bodyPr>"#);
    }
    xml.push_str("<a:lstStyle/>");

    if paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    for paragraph in paragraphs {
        xml.push_str("<a:p>");
        if let Some(space) = paragraph.space_after {
            write!(
                xml,
                r#"<a:pPr><a:spcAft><a:spcPts val="{}"/></a:spcAft></a:pPr>"#,
                (space * 100.0).round() as i64
            )
            .map_err(|e| Error::XmlError(e.to_string()))?;
        }
        xml.push_str("<a:r>");
        write!(
            xml,
            r#"<a:rPr lang="en-US" sz="{}"{} dirty="0"/>"#,
            (paragraph.size * 100.0).round() as i64,
            if paragraph.bold { r#" b="1""# } else { "" }
        )
        .map_err(|e| Error::XmlError(e.to_string()))?;
        write!(xml, "<a:t>{}</a:t>", escape(&strip_xml_invalid(&paragraph.text)))
            .map_err(|e| Error::XmlError(e.to_string()))?;
        xml.push_str("</a:r></a:p>");
    }

    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn write_picture(xml: &mut String, shape_id: usize, frame: &Frame, rel_id: &str) -> Result<()> {
    xml.push_str("<p:pic><p:nvPicPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="Picture {}"/>"#,
        shape_id,
        shape_id - 1
    )
    .map_err(|e| Error::XmlError(e.to_string()))?;
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);

    xml.push_str("<p:blipFill>");
    write!(xml, r#"<a:blip r:embed="{}"/>"#, rel_id).map_err(|e| Error::XmlError(e.to_string()))?;
    xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill>");

    xml.push_str("<p:spPr>");
    write_xfrm(xml, frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr></p:pic>");
    Ok(())
}
