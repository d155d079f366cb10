//! Scrollbar with a stable thumb.
//!
//! ratatui's built-in Scrollbar rounds both thumb ends separately, so the
//! thumb grows and shrinks while scrolling. This one computes the thumb
//! length once and only moves it.

use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

const THUMB_SYMBOL: &str = "█";
const TRACK_SYMBOL: &str = "│";

#[derive(Debug, Clone)]
pub struct Scrollbar {
    total_lines: usize,
    viewport_height: usize,
    /// 0 = top.
    scroll_offset: usize,
    style: Style,
}

impl Scrollbar {
    pub fn new(total_lines: usize, viewport_height: usize, scroll_offset: usize) -> Self {
        Self {
            total_lines,
            viewport_height,
            scroll_offset,
            style: Style::default(),
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Only shown when the content does not fit.
    pub fn should_display(&self) -> bool {
        self.total_lines > self.viewport_height
    }

    /// Track rows covered by the thumb for a track of `track_len` rows.
    ///
    /// The thumb reaches the last row exactly at maximum scroll.
    pub fn thumb_range(&self, track_len: usize) -> Option<Range<usize>> {
        let max_scroll = self.total_lines.saturating_sub(self.viewport_height);
        if !self.should_display() || track_len == 0 || max_scroll == 0 {
            return None;
        }

        let viewport_len = self.viewport_height.min(track_len);
        // round(track_len * viewport_len / (total_lines - 1 + viewport_len))
        let denom = self
            .total_lines
            .saturating_sub(1)
            .saturating_add(viewport_len) as u64;
        let thumb_len = if denom > 0 {
            let numerator = track_len as u64 * viewport_len as u64;
            (((numerator + denom / 2) / denom) as usize).clamp(1, track_len)
        } else {
            track_len
        };

        let offset = self.scroll_offset.min(max_scroll) as u64;
        let available = track_len.saturating_sub(thumb_len) as u64;
        let start = (offset * available / max_scroll as u64) as usize;
        Some(start..start + thumb_len)
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(thumb) = self.thumb_range(area.height as usize) else {
            return;
        };

        let x = area.x + area.width.saturating_sub(1);
        for (row, y) in (area.y..area.y + area.height).enumerate() {
            let symbol = if thumb.contains(&row) {
                THUMB_SYMBOL
            } else {
                TRACK_SYMBOL
            };
            buf.set_string(x, y, symbol, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_when_content_fits() {
        assert!(!Scrollbar::new(10, 20, 0).should_display());
        assert!(!Scrollbar::new(20, 20, 0).should_display());
        assert_eq!(Scrollbar::new(20, 20, 0).thumb_range(20), None);
    }

    #[test]
    fn test_thumb_length_is_stable() {
        let lengths: Vec<usize> = (0..=80)
            .map(|offset| Scrollbar::new(100, 20, offset).thumb_range(20).unwrap().len())
            .collect();
        assert!(lengths.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_thumb_reaches_ends() {
        let top = Scrollbar::new(100, 20, 0).thumb_range(20).unwrap();
        assert_eq!(top.start, 0);

        let bottom = Scrollbar::new(100, 20, 80).thumb_range(20).unwrap();
        assert_eq!(bottom.end, 20);
    }
}
