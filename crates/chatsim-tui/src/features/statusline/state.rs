//! Status line state.

/// Visible stand-in for a screen-reader live region.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    announcement: Option<String>,
    announced: usize,
}

impl StatusLine {
    pub fn announce(&mut self, text: impl Into<String>) {
        self.announcement = Some(text.into());
        self.announced += 1;
    }

    /// Latest announcement, if any since the last reset.
    pub fn announcement(&self) -> Option<&str> {
        self.announcement.as_deref()
    }

    /// Announcements made since the last reset.
    pub fn announced(&self) -> usize {
        self.announced
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_announcement_wins() {
        let mut status = StatusLine::default();
        status.announce("first");
        status.announce("second");
        assert_eq!(status.announcement(), Some("second"));
        assert_eq!(status.announced(), 2);

        status.reset();
        assert_eq!(status.announcement(), None);
        assert_eq!(status.announced(), 0);
    }
}
