//! Text utilities for TUI rendering.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string with ellipsis if it exceeds `max_width` columns.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        truncated.push(ch);
        width += ch_width;
    }
    truncated.push('…');
    truncated
}

/// Removes escape characters and expands tabs to four spaces.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    if s.contains('\x1b') || s.contains('\t') {
        Cow::Owned(s.replace('\x1b', "").replace('\t', "    "))
    } else {
        Cow::Borrowed(s)
    }
}

/// Wraps text at word boundaries so no line exceeds `width` columns.
///
/// Explicit newlines are kept. Words wider than a line are split by
/// character. Always returns at least one (possibly empty) line.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_word_bounds() {
            let word_width = word.width();
            let is_space = word.chars().all(char::is_whitespace);

            if line_width + word_width <= width {
                if !(is_space && line.is_empty() && !lines.is_empty()) {
                    line.push_str(word);
                    line_width += word_width;
                }
                continue;
            }

            if is_space {
                lines.push(std::mem::take(&mut line).trim_end().to_string());
                line_width = 0;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line).trim_end().to_string());
                line_width = 0;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if line_width + ch_width > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }

        lines.push(line.trim_end().to_string());
    }

    lines
}
