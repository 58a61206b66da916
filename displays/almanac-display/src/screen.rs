//! Screen buffer types
//!
//! Provides a character-based screen buffer for text-mode displays.

use almanac_protocol::screen::{DISPLAY_COLS, DISPLAY_ROWS};
use heapless::String;

/// Number of character rows
pub const SCREEN_ROWS: usize = DISPLAY_ROWS as usize;

/// Number of character columns
pub const SCREEN_COLS: usize = DISPLAY_COLS as usize;

/// Screen buffer for text-mode displays
///
/// Writes that don't change a row leave the screen clean, so redundant
/// renders never reach the display module.
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    lines: [String<SCREEN_COLS>; SCREEN_ROWS],
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub const fn new() -> Self {
        const EMPTY: String<SCREEN_COLS> = String::new();
        Self {
            lines: [EMPTY; SCREEN_ROWS],
            dirty: true,
        }
    }

    /// Clear the entire screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.dirty = true;
    }

    /// Replace a row, truncated to the screen width
    ///
    /// Returns `true` if the row changed.
    pub fn set_line(&mut self, row: usize, text: &str) -> bool {
        let Some(line) = self.lines.get_mut(row) else {
            return false;
        };
        let end = text
            .char_indices()
            .nth(SCREEN_COLS)
            .map_or(text.len(), |(i, _)| i);
        let text = &text[..end];
        if line.as_str() == text {
            return false;
        }
        line.clear();
        let _ = line.push_str(text);
        self.dirty = true;
        true
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after sending)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}
