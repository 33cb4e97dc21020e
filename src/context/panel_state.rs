//! Cursor and scroll bookkeeping for one panel

use std::ops::Range;

/// Per-context cursor/scroll record.
///
/// Lives inside its context for the whole process; a reload of the backing
/// model only clamps it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    selected: usize,
    /// Index of the first visible row
    origin: usize,
}

/// The slice of a list that fits in the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub len: usize,
}

impl Window {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }
}

impl PanelState {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn has_valid_selection(&self, count: usize) -> bool {
        self.selected < count
    }

    /// Move the cursor to `index`, clamped into `[0, count)`
    pub fn select(&mut self, index: usize, count: usize) {
        self.selected = if count == 0 { 0 } else { index.min(count - 1) };
    }

    pub fn move_selection(&mut self, delta: isize, count: usize) {
        let target = if delta < 0 {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta.unsigned_abs())
        };
        self.select(target, count);
    }

    /// Pull the cursor and origin back inside a list that may have shrunk
    pub fn clamp(&mut self, count: usize) {
        self.select(self.selected, count);
        self.origin = self.origin.min(count.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Scroll so the cursor is visible in a viewport of `height` rows and
    /// return the window to render.
    pub fn scroll_window(&mut self, height: usize, count: usize) -> Window {
        if height == 0 || count == 0 {
            self.origin = 0;
            return Window::default();
        }

        let selected = self.selected.min(count - 1);
        if selected < self.origin {
            self.origin = selected;
        } else if selected >= self.origin + height {
            self.origin = selected + 1 - height;
        }
        // don't leave blank rows at the bottom after the list shrank
        self.origin = self.origin.min(count.saturating_sub(height));

        Window {
            start: self.origin,
            len: height.min(count - self.origin),
        }
    }
}

/// Clamp a requested `(start, length)` window to a list of `count` items.
pub fn clamp_window(count: usize, start: usize, length: usize) -> Range<usize> {
    let start = start.min(count);
    let end = start.saturating_add(length).min(count);
    start..end
}
