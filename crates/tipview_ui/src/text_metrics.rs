//! Text measurement.
//!
//! Tooltips size themselves from a [`TextMeasure`] implementation. Hosts
//! with a real text stack plug theirs in; [`TextMetrics`] estimates
//! dimensions from average character widths and is good enough for layout
//! tests and headless use.

use crate::layout::Size;
use crate::preferences::Font;

/// Measures the bounding box of text laid out at a maximum width.
///
/// Implementations must be deterministic for fixed inputs.
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &Font, max_width: f32) -> Size;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str, font: &Font, max_width: f32) -> Size {
        (**self).measure(text, font, max_width)
    }
}

/// Character-width based estimate.
#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    /// Average character width as a ratio of font size
    pub char_width_ratio: f32,
}

impl TextMetrics {
    /// Create metrics with a custom width ratio.
    pub fn custom(char_width_ratio: f32) -> Self {
        Self { char_width_ratio }
    }

    fn char_width(&self, font: &Font) -> f32 {
        font.size * self.char_width_ratio
    }

    /// Estimate the width of a single unwrapped line.
    pub fn line_width(&self, text: &str, font: &Font) -> f32 {
        text.chars().count() as f32 * self.char_width(font)
    }

    /// Number of visual lines `line` occupies when wrapped at `max_width`.
    ///
    /// Words are kept whole where they fit; a word wider than the limit
    /// is broken at character boundaries.
    fn wrapped_lines(&self, line: &str, font: &Font, max_width: f32) -> (usize, f32) {
        let cw = self.char_width(font);
        let max_chars = if cw > 0.0 {
            ((max_width / cw).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        let mut lines = 1;
        let mut current = 0usize;
        let mut widest = 0usize;

        for word in line.split_whitespace() {
            let mut len = word.chars().count();
            let needed = if current == 0 { len } else { current + 1 + len };
            if needed <= max_chars {
                current = needed;
                continue;
            }
            if current > 0 {
                widest = widest.max(current);
                lines += 1;
            }
            while len > max_chars {
                widest = max_chars;
                lines += 1;
                len -= max_chars;
            }
            current = len;
        }
        widest = widest.max(current);

        (lines, widest as f32 * cw)
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width_ratio: crate::constants::CHAR_WIDTH_FACTOR,
        }
    }
}

impl TextMeasure for TextMetrics {
    fn measure(&self, text: &str, font: &Font, max_width: f32) -> Size {
        let mut width: f32 = 0.0;
        let mut line_count = 0;

        for line in text.lines() {
            let (lines, w) = self.wrapped_lines(line, font, max_width);
            line_count += lines;
            width = width.max(w);
        }

        // Empty text still occupies one line
        let line_count = line_count.max(1);
        Size::new(width, line_count as f32 * font.line_height_px())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> Font {
        Font {
            size: 10.0,
            line_height: 1.5,
            ..Font::default()
        }
    }

    fn metrics() -> TextMetrics {
        TextMetrics::custom(0.5)
    }

    #[test]
    fn test_line_width() {
        // 5 chars * 10.0 * 0.5 = 25.0
        assert!((metrics().line_width("hello", &font()) - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_single_line() {
        let size = metrics().measure("Hi", &font(), 200.0);
        assert_eq!(size, Size::new(10.0, 15.0));
    }

    #[test]
    fn test_multiline_measure() {
        let size = metrics().measure("hello\nworld!", &font(), 200.0);
        assert!((size.width - 30.0).abs() < 0.01);
        assert!((size.height - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_wraps_at_word_boundaries() {
        // 5 chars per line at width 25.
        let size = metrics().measure("aa bb cc", &font(), 25.0);
        // "aa bb" / "cc"
        assert!((size.width - 25.0).abs() < 0.01);
        assert!((size.height - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_breaks_long_words() {
        let size = metrics().measure("abcdefghijkl", &font(), 25.0);
        // "abcde" / "fghij" / "kl"
        assert!((size.width - 25.0).abs() < 0.01);
        assert!((size.height - 45.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_text() {
        let size = metrics().measure("", &font(), 200.0);
        assert_eq!(size.width, 0.0);
        assert!((size.height - 15.0).abs() < 0.01);
    }
}
