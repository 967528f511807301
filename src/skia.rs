//! tiny-skia rendering surface.

use std::path::Path;

use thiserror::Error;
use tiny_skia::{
    FillRule, FilterQuality, Paint, Path as SkiaPath, PathBuilder, Pixmap, PixmapPaint, Rect,
    Stroke, Transform,
};
use tipview_ui::{
    BubbleOutline, Color, Font, PathSegment, Rectangle, Surface, TextAlignment, VisualState,
};

use crate::text::CosmicText;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Allocate a pixmap covering `size`, rounded up to whole pixels.
pub fn pixmap_for(width: f32, height: f32) -> Result<Pixmap, RenderError> {
    let width = width.max(0.0).ceil() as u32;
    let height = height.max(0.0).ceil() as u32;
    Pixmap::new(width, height).ok_or(RenderError::Allocation { width, height })
}

pub fn save_png(pixmap: &Pixmap, path: &Path) -> Result<(), RenderError> {
    let data = pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    std::fs::write(path, data)?;
    log::debug!("Wrote {:?}", path);
    Ok(())
}

/// Convert an outline to a tiny-skia path. Arcs become their cubic
/// approximation, preceded by a line to the arc's first tangent point.
pub fn to_skia_path(outline: &BubbleOutline) -> Option<SkiaPath> {
    let mut builder = PathBuilder::new();
    for segment in outline.segments() {
        match segment {
            PathSegment::MoveTo(p) => builder.move_to(p.x, p.y),
            PathSegment::LineTo(p) => builder.line_to(p.x, p.y),
            PathSegment::Arc(arc) => {
                builder.line_to(arc.start.x, arc.start.y);
                builder.cubic_to(
                    arc.control1.x,
                    arc.control1.y,
                    arc.control2.x,
                    arc.control2.y,
                    arc.end.x,
                    arc.end.y,
                );
            }
            PathSegment::Close => builder.close(),
        }
    }
    builder.finish()
}

fn paint(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Draw the tooltip layer `layer` into `target` with the given visual
/// state: scaled around the frame's center and faded by its alpha.
pub fn composite(target: &mut Pixmap, layer: &Pixmap, origin: (f32, f32), visual: &VisualState) {
    let frame = visual.frame;
    let scale = visual.scale;
    let (cx, cy) = (frame.width / 2.0, frame.height / 2.0);
    let transform = Transform::from_row(
        scale,
        0.0,
        0.0,
        scale,
        origin.0 + frame.x + cx - scale * cx,
        origin.1 + frame.y + cy - scale * cy,
    );
    let paint = PixmapPaint {
        opacity: visual.alpha,
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, layer.as_ref(), &paint, transform, None);
}

/// [`Surface`] drawing into a tiny-skia pixmap.
pub struct PixmapSurface<'a> {
    pixmap: &'a mut Pixmap,
    text: &'a CosmicText,
}

impl<'a> PixmapSurface<'a> {
    pub fn new(pixmap: &'a mut Pixmap, text: &'a CosmicText) -> Self {
        Self { pixmap, text }
    }

    pub fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    /// Fill a plain rectangle. Empty rectangles are skipped.
    pub fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        if let Some(rect) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
            self.pixmap
                .fill_rect(rect, &paint(color), Transform::identity(), None);
        }
    }
}

impl Surface for PixmapSurface<'_> {
    fn fill_path(&mut self, path: &BubbleOutline, color: Color) {
        if let Some(path) = to_skia_path(path) {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn stroke_path(&mut self, path: &BubbleOutline, color: Color, width: f32) {
        if let Some(path) = to_skia_path(path) {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
        }
    }

    fn draw_text(
        &mut self,
        rect: Rectangle,
        text: &str,
        font: &Font,
        color: Color,
        alignment: TextAlignment,
    ) {
        let pixmap = &mut *self.pixmap;
        self.text
            .rasterize(text, font, rect.width, alignment, |x, y, coverage| {
                let covered = color.with_alpha_scaled(f32::from(coverage) / 255.0);
                if let Some(cell) =
                    Rect::from_xywh(rect.x + x as f32, rect.y + y as f32, 1.0, 1.0)
                {
                    pixmap.fill_rect(cell, &paint(covered), Transform::identity(), None);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tipview_ui::{Point, Preferences, Side, build_outline, bubble_frame};

    fn outline() -> BubbleOutline {
        let prefs = Preferences::default();
        let content = tipview_ui::Size::new(40.0, 30.0);
        let bubble = bubble_frame(Side::Top, content, &prefs);
        build_outline(Side::Top, &bubble, 4.0, 8.0, 4.0, Point::new(20.0, 2.0))
    }

    #[test]
    fn test_outline_converts_to_path() {
        let path = to_skia_path(&outline()).unwrap();
        let bounds = path.bounds();
        assert!((bounds.top() - 2.0).abs() < 0.01);
        assert!((bounds.left() - 2.0).abs() < 0.01);
        assert!((bounds.right() - 38.0).abs() < 0.01);
        assert!((bounds.bottom() - 28.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_outline_has_no_path() {
        assert!(to_skia_path(&BubbleOutline::default()).is_none());
    }

    #[test]
    fn test_fill_paints_bubble_body() {
        let text = CosmicText::new();
        let mut pixmap = pixmap_for(40.0, 30.0).unwrap();
        PixmapSurface::new(&mut pixmap, &text).fill_path(&outline(), Color::BLUE);

        let center = pixmap.pixel(20, 16).unwrap();
        assert_eq!(center.blue(), 255);
        assert_eq!(center.alpha(), 255);
        // Corner outside the rounded body stays clear.
        assert_eq!(pixmap.pixel(0, 29).unwrap().alpha(), 0);
    }

    #[test]
    fn test_composite_places_layer_at_frame() {
        let mut layer = pixmap_for(10.0, 10.0).unwrap();
        layer.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        let mut target = pixmap_for(50.0, 50.0).unwrap();

        let visual = VisualState::identity(Rectangle::new(20.0, 30.0, 10.0, 10.0));
        composite(&mut target, &layer, (0.0, 0.0), &visual);

        assert_eq!(target.pixel(25, 35).unwrap().red(), 255);
        assert_eq!(target.pixel(5, 5).unwrap().alpha(), 0);
    }

    #[test]
    fn test_zero_sized_pixmap_is_an_error() {
        assert!(matches!(
            pixmap_for(0.0, 10.0),
            Err(RenderError::Allocation { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_save_png() {
        let pixmap = pixmap_for(4.0, 4.0).unwrap();
        let path = std::env::temp_dir().join("tipview_skia_test.png");
        save_png(&pixmap, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        let _ = std::fs::remove_file(&path);
    }
}
