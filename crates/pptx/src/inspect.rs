//! Read-back inspection of a PPTX file.
//!
//! Walks the package the same way an office suite would: the slide list in
//! `presentation.xml`, its relationships, then each slide part. Reports
//! what ended up on each page.

use deckgen_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// What a PPTX file contains, slide by slide.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeckSummary {
    /// Slides in presentation order.
    pub slides: Vec<SlideSummary>,
}

impl DeckSummary {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// Contents of a single slide.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SlideSummary {
    /// 1-based position in the presentation.
    pub number: usize,

    /// Part name inside the package, e.g. `ppt/slides/slide1.xml`.
    pub part: String,

    /// Non-empty paragraph texts, top-to-bottom.
    pub texts: Vec<String>,

    /// Number of text boxes, including empty ones.
    pub text_boxes: usize,

    /// Picture frames in EMUs as `(x, y, width, height)`.
    pub pictures: Vec<(i64, i64, i64, i64)>,
}

/// Inspector for PPTX (Office Open XML) files.
pub struct PptxInspector;

impl PptxInspector {
    pub fn new() -> Self {
        Self
    }

    /// Summarize a PPTX file from a reader.
    pub fn inspect<R: Read + Seek>(&self, reader: R) -> Result<DeckSummary> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("not a PPTX package: {}", e)))?;

        let slide_ids = slide_id_list(&read_part(&mut archive, PRESENTATION_PART)?)?;
        let targets = slide_targets(&read_part(&mut archive, PRESENTATION_RELS)?)?;

        let mut summary = DeckSummary::default();
        for (index, rel_id) in slide_ids.iter().enumerate() {
            let part = targets.get(rel_id).ok_or_else(|| {
                Error::XmlError(format!("slide relationship '{}' has no target", rel_id))
            })?;
            let content = read_part(&mut archive, part)?;
            let mut slide = inspect_slide(&content, index + 1)?;
            slide.part = part.clone();
            summary.slides.push(slide);
        }

        Ok(summary)
    }
}

impl Default for PptxInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Relationship ids of `p:sldId` entries, in presentation order.
fn slide_id_list(presentation: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(presentation);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"sldId" =>
            {
                // The relationship id is the namespaced `r:id`; the bare
                // `id` attribute is the numeric slide id.
                let rel_id = e.attributes().flatten().find_map(|attr| {
                    let prefixed = attr.key.prefix().is_some();
                    (prefixed && attr.key.local_name().as_ref() == b"id")
                        .then(|| String::from_utf8_lossy(&attr.value).into_owned())
                });
                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("malformed presentation part: {}", e)));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Map slide relationship ids to part names.
fn slide_targets(rels: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(rels);
    reader.trim_text(true);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let is_slide = attribute(e, b"Type").is_some_and(|t| t.ends_with("/slide"));
                if let (true, Some(id), Some(target)) =
                    (is_slide, attribute(e, b"Id"), attribute(e, b"Target"))
                {
                    let part = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    targets.insert(id, part);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("malformed presentation relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(targets)
}

/// Collect text and pictures from one slide part.
fn inspect_slide(xml: &str, number: usize) -> Result<SlideSummary> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut current: Option<ShapeInfo> = None;
    let mut shapes: Vec<ShapeInfo> = Vec::new();
    let mut in_text = false;
    let mut paragraph = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"sp" => current = Some(ShapeInfo::default()),
                b"pic" => {
                    current = Some(ShapeInfo {
                        is_picture: true,
                        ..Default::default()
                    })
                }
                b"cNvSpPr" => mark_text_box(e, current.as_mut()),
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"off" => {
                    if let Some(shape) = current.as_mut() {
                        shape.frame.0 = numeric_attribute(e, b"x");
                        shape.frame.1 = numeric_attribute(e, b"y");
                    }
                }
                b"ext" => {
                    if let Some(shape) = current.as_mut() {
                        shape.frame.2 = numeric_attribute(e, b"cx");
                        shape.frame.3 = numeric_attribute(e, b"cy");
                    }
                }
                b"cNvSpPr" => mark_text_box(e, current.as_mut()),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                paragraph.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(shape) = current.as_mut() {
                        if !paragraph.trim().is_empty() {
                            shape.texts.push(std::mem::take(&mut paragraph));
                        }
                    }
                    paragraph.clear();
                }
                b"sp" | b"pic" => shapes.extend(current.take()),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("malformed slide {}: {}", number, e)));
            }
            _ => {}
        }
    }

    // Top-to-bottom, then left-to-right.
    shapes.sort_by_key(|shape| (shape.frame.1, shape.frame.0));

    let mut slide = SlideSummary {
        number,
        ..Default::default()
    };
    for shape in shapes {
        if shape.is_picture {
            slide.pictures.push(shape.frame);
        } else {
            if shape.is_text_box {
                slide.text_boxes += 1;
            }
            slide.texts.extend(shape.texts);
        }
    }

    Ok(slide)
}

/// Read a whole part of the package as text.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| Error::ZipError(format!("missing part '{}': {}", name, e)))?;

    let mut content = String::with_capacity(part.size() as usize);
    part.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("unreadable part '{}': {}", name, e)))?;

    Ok(content)
}

/// A shape collected while scanning slide XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    texts: Vec<String>,
    is_picture: bool,
    is_text_box: bool,
    /// `(x, y, width, height)` in EMUs.
    frame: (i64, i64, i64, i64),
}

fn mark_text_box(e: &BytesStart, shape: Option<&mut ShapeInfo>) {
    if let Some(shape) = shape {
        shape.is_text_box = attribute(e, b"txBox").as_deref() == Some("1");
    }
}

fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn numeric_attribute(e: &BytesStart, key: &[u8]) -> i64 {
    attribute(e, key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
