//! Colored status label for a posting.

use std::ops::Range;

use crate::types::STATUS_FOUND;

/// ARGB color, same layout as Android's `Color` ints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLUE: Color = Color(0xFF00_00FF);
    pub const RED: Color = Color(0xFFFF_0000);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Found,
    Lost,
}

impl StatusTone {
    /// Anything that isn't "found" (any casing) is shown as lost.
    pub fn classify(status: &str) -> Self {
        if status.eq_ignore_ascii_case(STATUS_FOUND) {
            StatusTone::Found
        } else {
            StatusTone::Lost
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusTone::Found => "Found",
            StatusTone::Lost => "Lost",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            StatusTone::Found => Color::BLUE,
            StatusTone::Lost => Color::RED,
        }
    }
}

/// Text with one foreground-color span over `span` (byte range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedText {
    pub text: String,
    pub color: Color,
    pub span: Range<usize>,
}

pub fn highlight_status(status: &str) -> HighlightedText {
    let tone = StatusTone::classify(status);
    let text = tone.label().to_string();
    let span = 0..text.len();
    HighlightedText {
        text,
        color: tone.color(),
        span,
    }
}
