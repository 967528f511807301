//! Text shaping with cosmic-text.
//!
//! [`CosmicText`] is both the [`TextMeasure`] the tooltip sizes itself
//! with and the glyph source for [`crate::skia::PixmapSurface`], so the
//! measured and drawn text always wrap the same way.

use std::cell::RefCell;
use std::path::Path;

use cosmic_text::{Align, Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent};
use tipview_ui::{Font, FontFamily, Size, TextAlignment, TextMeasure};

/// Font database plus glyph cache.
pub struct CosmicText {
    font_system: RefCell<FontSystem>,
    swash_cache: RefCell<SwashCache>,
}

impl std::fmt::Debug for CosmicText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicText")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl Default for CosmicText {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicText {
    /// Create an engine with the system fonts loaded.
    pub fn new() -> Self {
        Self {
            font_system: RefCell::new(FontSystem::new()),
            swash_cache: RefCell::new(SwashCache::new()),
        }
    }

    /// Add a font file to the database.
    pub fn load_font_file(&self, path: &Path) -> std::io::Result<()> {
        let data = std::fs::read(path)?;
        self.font_system.borrow_mut().db_mut().load_font_data(data);
        log::debug!("Loaded font {:?}", path);
        Ok(())
    }

    /// Number of font faces available for shaping.
    pub fn face_count(&self) -> usize {
        self.font_system.borrow().db().len()
    }

    /// Shape `text`, wrapping at `width` when given.
    fn shape(
        &self,
        text: &str,
        font: &Font,
        width: Option<f32>,
        alignment: Option<TextAlignment>,
    ) -> Buffer {
        let mut font_system = self.font_system.borrow_mut();
        let metrics = Metrics::new(font.size, font.line_height_px());
        let attrs = Attrs::new().family(family(&font.family));

        let mut buffer = Buffer::new(&mut font_system, metrics);
        buffer.set_size(&mut font_system, width, None);
        buffer.set_text(
            &mut font_system,
            text,
            &attrs,
            Shaping::Advanced,
            alignment.map(align),
        );
        buffer.shape_until_scroll(&mut font_system, false);
        buffer
    }

    /// Rasterize `text` laid out at `width`, calling `pixel(x, y, coverage)`
    /// for every covered pixel relative to the top-left of the text block.
    pub fn rasterize<F>(
        &self,
        text: &str,
        font: &Font,
        width: f32,
        alignment: TextAlignment,
        mut pixel: F,
    ) where
        F: FnMut(i32, i32, u8),
    {
        let buffer = self.shape(text, font, Some(width), Some(alignment));
        let mut font_system = self.font_system.borrow_mut();
        let mut swash_cache = self.swash_cache.borrow_mut();

        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((0.0, 0.0), 1.0);
                let Some(image) = swash_cache
                    .get_image(&mut font_system, physical.cache_key)
                    .as_ref()
                else {
                    continue;
                };

                let left = physical.x + image.placement.left;
                let top = run.line_y as i32 + physical.y - image.placement.top;
                let width = image.placement.width as usize;
                let height = image.placement.height as usize;
                let stride = match image.content {
                    SwashContent::Mask => 1,
                    SwashContent::SubpixelMask => 3,
                    SwashContent::Color => 4,
                };

                for y in 0..height {
                    for x in 0..width {
                        let index = (y * width + x) * stride;
                        let coverage = match image.content {
                            SwashContent::Color => image.data.get(index + 3),
                            _ => image.data.get(index),
                        };
                        let coverage = coverage.copied().unwrap_or(0);
                        if coverage > 0 {
                            pixel(left + x as i32, top + y as i32, coverage);
                        }
                    }
                }
            }
        }
    }
}

impl TextMeasure for CosmicText {
    fn measure(&self, text: &str, font: &Font, max_width: f32) -> Size {
        let buffer = self.shape(text, font, Some(max_width), None);

        let mut width: f32 = 0.0;
        let mut lines = 0usize;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            lines += 1;
        }

        // Empty text still occupies one line
        Size::new(width, lines.max(1) as f32 * font.line_height_px())
    }
}

fn family(family: &FontFamily) -> Family<'_> {
    match family {
        FontFamily::SansSerif => Family::SansSerif,
        FontFamily::Serif => Family::Serif,
        FontFamily::Monospace => Family::Monospace,
        FontFamily::Named(name) => Family::Name(name),
    }
}

fn align(alignment: TextAlignment) -> Align {
    match alignment {
        TextAlignment::Left => Align::Left,
        TextAlignment::Center => Align::Center,
        TextAlignment::Right => Align::Right,
        TextAlignment::Justified => Align::Justified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> Font {
        Font::new(14.0)
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let engine = CosmicText::new();
        let size = engine.measure("", &font(), 200.0);
        assert_eq!(size.width, 0.0);
        assert!((size.height - font().line_height_px()).abs() < 0.01);
    }

    #[test]
    fn test_wrapping_respects_max_width() {
        let engine = CosmicText::new();
        if engine.face_count() == 0 {
            // Nothing to shape with on a font-less machine.
            return;
        }
        let text = "a tooltip long enough to need several lines";
        let single = engine.measure(text, &font(), 10_000.0);
        let wrapped = engine.measure(text, &font(), 80.0);
        assert!(wrapped.height > single.height);
        assert!(wrapped.width <= single.width);
    }

    #[test]
    fn test_missing_font_file() {
        let engine = CosmicText::new();
        assert!(engine
            .load_font_file(Path::new("/nonexistent/font.ttf"))
            .is_err());
    }

    #[test]
    fn test_family_mapping() {
        assert_eq!(family(&FontFamily::Monospace), Family::Monospace);
        assert_eq!(
            family(&FontFamily::Named("Inter".to_string())),
            Family::Name("Inter")
        );
        assert_eq!(align(TextAlignment::Justified), Align::Justified);
    }
}
