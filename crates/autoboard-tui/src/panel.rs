//! Leaderboard panel as a scrollable surface
//!
//! Terminal rows have no pixel size, so heights are expressed as
//! `rows * row_height_px`. The manager then scrolls in the same pixel units
//! the config speaks in, and the widget maps the fractional offset back to
//! the first visible row. An offset within the bottom tolerance of the end
//! counts as the last page, matching where the manager stops.

use std::cell::{Cell, RefCell};

use autoboard_core::{Difficulty, LeaderboardRow, ScrollSurface};
use ratatui::layout::{Position, Rect};

#[derive(Debug)]
pub struct BoardPanel {
    pub difficulty: Difficulty,
    rows: RefCell<Vec<LeaderboardRow>>,
    row_height_px: f64,
    bottom_tolerance_px: f64,
    /// Body rows visible at the last draw
    viewport_rows: Cell<u16>,
    offset_px: Cell<f64>,
    /// Screen area at the last draw, used for pointer hit-testing
    area: Cell<Rect>,
}

impl BoardPanel {
    pub fn new(difficulty: Difficulty, row_height_px: f64, bottom_tolerance_px: f64) -> Self {
        Self {
            difficulty,
            rows: RefCell::new(Vec::new()),
            row_height_px: row_height_px.max(1.0),
            bottom_tolerance_px: bottom_tolerance_px.max(0.0),
            viewport_rows: Cell::new(0),
            offset_px: Cell::new(0.0),
            area: Cell::new(Rect::default()),
        }
    }

    pub fn set_rows(&self, rows: Vec<LeaderboardRow>) {
        *self.rows.borrow_mut() = rows;
    }

    pub fn rows(&self) -> std::cell::Ref<'_, Vec<LeaderboardRow>> {
        self.rows.borrow()
    }

    pub fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    /// Record the layout of the latest draw
    pub fn set_layout(&self, area: Rect, viewport_rows: u16) {
        self.area.set(area);
        self.viewport_rows.set(viewport_rows);
    }

    pub fn area(&self) -> Rect {
        self.area.get()
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.get().contains(Position::new(column, row))
    }

    /// Index of the first row to draw
    pub fn first_visible_row(&self) -> usize {
        let max_first = self
            .row_count()
            .saturating_sub(self.viewport_rows.get() as usize);
        let offset = self.offset_px.get();
        let remaining = self.content_height() - self.viewport_height() - offset;
        if max_first > 0 && remaining <= self.bottom_tolerance_px {
            return max_first;
        }
        let first = (offset / self.row_height_px).floor();
        if first.is_finite() && first > 0.0 {
            (first as usize).min(max_first)
        } else {
            0
        }
    }
}

impl ScrollSurface for BoardPanel {
    fn content_height(&self) -> f64 {
        self.row_count() as f64 * self.row_height_px
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_rows.get() as f64 * self.row_height_px
    }

    fn scroll_offset(&self) -> f64 {
        self.offset_px.get()
    }

    fn set_scroll_offset(&self, offset: f64) {
        self.offset_px.set(offset.max(0.0));
    }
}
