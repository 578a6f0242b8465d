//! Process-wide font registry used by every chart.
//!
//! The registry is built once, on the first call to [`init`] or
//! [`registry`], and is read-only afterwards. A bundled font file (for
//! CJK labels) is loaded when present; without it labels fall back to the
//! generic sans-serif family.

use resvg::usvg::{self, fontdb};
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Where the bundled label font is looked up by default.
pub const DEFAULT_FONT_PATH: &str = "fonts/ipaexg.ttf";

/// Family used when no bundled font is available.
pub const FALLBACK_FAMILY: &str = "sans-serif";

static REGISTRY: OnceLock<FontRegistry> = OnceLock::new();

/// Fonts available to the chart renderer.
#[derive(Debug)]
pub struct FontRegistry {
    database: Arc<fontdb::Database>,
    family: String,
    bundled: bool,
}

impl FontRegistry {
    /// Load system fonts plus the font file at `path`, if it exists.
    pub fn load(path: &Path) -> Self {
        let mut database = fontdb::Database::new();
        database.load_system_fonts();

        let bundled_family = if path.is_file() {
            match bundled_family(path) {
                Ok(Some(family)) => {
                    if let Err(e) = database.load_font_file(path) {
                        log::warn!("Failed to load font {}: {}", path.display(), e);
                        None
                    } else {
                        Some(family)
                    }
                }
                Ok(None) => {
                    log::warn!("Font file {} contains no usable faces", path.display());
                    None
                }
                Err(e) => {
                    log::warn!("Failed to read font {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            log::warn!(
                "Font {} not found; chart labels use the default {} family and non-Latin text may not render",
                path.display(),
                FALLBACK_FAMILY
            );
            None
        };

        match bundled_family {
            Some(family) => {
                log::debug!("Using bundled font family '{}'", family);
                database.set_sans_serif_family(family.clone());
                Self {
                    database: Arc::new(database),
                    family,
                    bundled: true,
                }
            }
            None => Self {
                database: Arc::new(database),
                family: FALLBACK_FAMILY.to_string(),
                bundled: false,
            },
        }
    }

    /// Family name charts should request for their text.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Whether the bundled font file was found and loaded.
    pub fn is_bundled(&self) -> bool {
        self.bundled
    }

    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.database.len()
    }

    /// SVG parsing options that resolve text against this registry.
    pub fn usvg_options(&self) -> usvg::Options<'static> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.database);
        options.font_family = self.family.clone();
        options
    }
}

/// Initialize the process-wide registry from `path`.
///
/// Only the first call (or the first [`registry`] call) has any effect;
/// later calls return the registry that already exists.
pub fn init(path: impl AsRef<Path>) -> &'static FontRegistry {
    REGISTRY.get_or_init(|| FontRegistry::load(path.as_ref()))
}

/// The process-wide registry, initialized from [`DEFAULT_FONT_PATH`] if
/// nothing called [`init`] first.
pub fn registry() -> &'static FontRegistry {
    init(DEFAULT_FONT_PATH)
}

/// Family name of the first face in a font file.
fn bundled_family(path: &Path) -> std::io::Result<Option<String>> {
    let mut faces = fontdb::Database::new();
    faces.load_font_file(path)?;
    let family = faces
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
    Ok(family)
}
