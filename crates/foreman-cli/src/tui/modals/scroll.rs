//! Scrollable list state shared by menus and pickers

/// Manages scroll state for a list of items
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset (first visible item)
    pub offset: usize,
    /// Number of items in the list
    pub total: usize,
    /// Visible height (items that fit on screen)
    pub visible_height: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ScrollState {
    pub fn new(total: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            total,
            visible_height: 10,
        }
    }

    /// Update the total item count, keeping the selection in range
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        if total == 0 {
            self.selected = 0;
            self.offset = 0;
            return;
        }
        if self.selected >= total {
            self.selected = total - 1;
        }
        self.ensure_visible();
    }

    /// Set the visible height (call during render)
    pub fn set_visible_height(&mut self, height: usize) {
        self.visible_height = height.max(1);
        self.ensure_visible();
    }

    pub fn next(&mut self) {
        if self.total == 0 {
            return;
        }
        if self.selected < self.total - 1 {
            self.selected += 1;
            self.ensure_visible();
        }
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_visible();
        }
    }

    pub fn ensure_visible(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.visible_height {
            self.offset = self.selected - self.visible_height + 1;
        }
    }

    /// Range of visible indices
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let end = (self.offset + self.visible_height).min(self.total);
        self.offset..end
    }

    pub fn items_above(&self) -> usize {
        self.offset
    }

    pub fn items_below(&self) -> usize {
        self.total.saturating_sub(self.offset + self.visible_height)
    }
}
