//! Chat area state: scroll position and cached layout.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Keep the newest message in view.
    FollowLatest,
    /// User scrolled manually; offset is the line index from the top.
    Anchored { offset: usize },
}

#[derive(Debug, Clone)]
pub struct ScrollState {
    pub mode: ScrollMode,
    /// Line count from the last layout pass.
    pub line_count: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::FollowLatest,
            line_count: 0,
        }
    }
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        self.mode == ScrollMode::FollowLatest
    }

    /// Offset of the first visible line for content of `total_lines`.
    pub fn offset_for(&self, total_lines: usize, viewport_height: usize) -> usize {
        let max_offset = total_lines.saturating_sub(viewport_height);
        match self.mode {
            ScrollMode::FollowLatest => max_offset,
            ScrollMode::Anchored { offset } => offset.min(max_offset),
        }
    }

    pub fn get_offset(&self, viewport_height: usize) -> usize {
        self.offset_for(self.line_count, viewport_height)
    }

    pub fn scroll_up(&mut self, lines: usize, viewport_height: usize) {
        let offset = self.get_offset(viewport_height).saturating_sub(lines);
        self.mode = ScrollMode::Anchored { offset };
    }

    /// Scrolls down; reaching the bottom resumes following.
    pub fn scroll_down(&mut self, lines: usize, viewport_height: usize) {
        if self.is_following() {
            return;
        }
        let max_offset = self.line_count.saturating_sub(viewport_height);
        let offset = (self.get_offset(viewport_height) + lines).min(max_offset);
        self.mode = if offset >= max_offset {
            ScrollMode::FollowLatest
        } else {
            ScrollMode::Anchored { offset }
        };
    }

    pub fn page_up(&mut self, viewport_height: usize) {
        self.scroll_up(viewport_height.max(1), viewport_height);
    }

    pub fn page_down(&mut self, viewport_height: usize) {
        self.scroll_down(viewport_height.max(1), viewport_height);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }

    pub fn reset(&mut self) {
        self.mode = ScrollMode::FollowLatest;
        self.line_count = 0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub scroll: ScrollState,
    pub viewport_height: usize,
    /// Width available to bubbles (without margins and scrollbar).
    pub content_width: usize,
    /// Set when message layout changed and line counts must be rebuilt.
    pub layout_dirty: bool,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            layout_dirty: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrolled(lines: usize) -> ScrollState {
        ScrollState {
            mode: ScrollMode::FollowLatest,
            line_count: lines,
        }
    }

    #[test]
    fn test_follow_shows_bottom() {
        let scroll = scrolled(100);
        assert_eq!(scroll.get_offset(20), 80);
        assert_eq!(scrolled(5).get_offset(20), 0);
    }

    #[test]
    fn test_scroll_up_anchors() {
        let mut scroll = scrolled(100);
        scroll.scroll_up(5, 20);
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 75 });
    }

    #[test]
    fn test_scroll_down_to_bottom_follows_again() {
        let mut scroll = scrolled(100);
        scroll.page_up(20);
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 60 });
        scroll.page_down(20);
        assert!(scroll.is_following());
    }

    #[test]
    fn test_anchored_offset_is_clamped() {
        let scroll = ScrollState {
            mode: ScrollMode::Anchored { offset: 500 },
            line_count: 100,
        };
        assert_eq!(scroll.get_offset(20), 80);
        assert_eq!(scroll.offset_for(30, 20), 10);
    }
}
