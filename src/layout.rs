//! Grid layout for the dashboard cards.
//!
//! Cards fill a grid of equal cells, row-major, with a gap between cells and
//! around the edge. When the container is too narrow for the configured
//! column count, columns drop until each card is at least
//! [`MIN_CARD_WIDTH`] wide.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ ┌──────┐ ┌──────┐ ┌──────┐   │
//! │ │  0   │ │  1   │ │  2   │   │
//! │ └──────┘ └──────┘ └──────┘   │
//! │ ┌──────┐ ┌──────┐            │
//! │ │  3   │ │  4   │            │
//! │ └──────┘ └──────┘            │
//! └──────────────────────────────┘
//! ```

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Narrowest a card may get before columns are dropped.
pub const MIN_CARD_WIDTH: u32 = 90;

/// Gap between cards and around the grid edge.
pub const CARD_GAP: u32 = 4;

/// Card rectangles for a container size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    columns: u32,
    card_count: usize,
    size: Size,
    cells: Vec<Rectangle>,
}

impl GridLayout {
    /// Lay out `card_count` cards in up to `columns` columns.
    pub fn new(
        columns: u32,
        card_count: usize,
        size: Size,
    ) -> Self {
        let mut layout = Self {
            columns: columns.max(1),
            card_count,
            size: Size::zero(),
            cells: Vec::new(),
        };
        layout.reflow(size);
        layout
    }

    #[inline]
    pub const fn size(&self) -> Size { self.size }

    #[inline]
    pub fn cells(&self) -> &[Rectangle] { &self.cells }

    /// Columns actually used at the current size.
    pub fn effective_columns(&self) -> u32 {
        let fit = (self.size.width.saturating_sub(CARD_GAP) / (MIN_CARD_WIDTH + CARD_GAP)).max(1);
        self.columns.min(fit).min(self.card_count.max(1) as u32)
    }

    /// Recompute cell rectangles for `size`. Returns `false` if nothing changed.
    pub fn reflow(
        &mut self,
        size: Size,
    ) -> bool {
        if size == self.size && self.cells.len() == self.card_count {
            return false;
        }
        self.size = size;
        self.cells.clear();
        if self.card_count == 0 {
            return true;
        }

        let columns = self.effective_columns();
        let rows = (self.card_count as u32).div_ceil(columns);
        let cell_w = size.width.saturating_sub(CARD_GAP * (columns + 1)) / columns;
        let cell_h = size.height.saturating_sub(CARD_GAP * (rows + 1)) / rows;

        for index in 0..self.card_count as u32 {
            let col = index % columns;
            let row = index / columns;
            let x = CARD_GAP + col * (cell_w + CARD_GAP);
            let y = CARD_GAP + row * (cell_h + CARD_GAP);
            self.cells
                .push(Rectangle::new(Point::new(x as i32, y as i32), Size::new(cell_w, cell_h)));
        }
        log::debug!("layout: {}x{} -> {columns} columns, {rows} rows", size.width, size.height);
        true
    }

    /// Index of the card under `point`.
    pub fn card_at(
        &self,
        point: Point,
    ) -> Option<usize> {
        self.cells.iter().position(|cell| cell.contains(point))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_columns() {
        let layout = GridLayout::new(3, 5, Size::new(304, 200));
        assert_eq!(layout.effective_columns(), 3);
        assert_eq!(layout.cells().len(), 5);
        // (304 - 16) / 3 = 96 wide, (200 - 12) / 2 = 94 tall
        assert_eq!(layout.cells()[0], Rectangle::new(Point::new(4, 4), Size::new(96, 94)));
        assert_eq!(layout.cells()[4].top_left, Point::new(104, 102));
    }

    #[test]
    fn test_narrow_container_drops_columns() {
        let layout = GridLayout::new(3, 4, Size::new(200, 400));
        assert_eq!(layout.effective_columns(), 2, "Two 90px cards fit in 200px");
    }

    #[test]
    fn test_columns_capped_by_card_count() {
        let layout = GridLayout::new(4, 1, Size::new(400, 100));
        assert_eq!(layout.effective_columns(), 1);
        assert_eq!(layout.cells()[0].size.width, 392);
    }

    #[test]
    fn test_reflow_unchanged_is_noop() {
        let mut layout = GridLayout::new(2, 2, Size::new(200, 100));
        assert!(!layout.reflow(Size::new(200, 100)));
        assert!(layout.reflow(Size::new(300, 100)));
    }

    #[test]
    fn test_card_at() {
        let layout = GridLayout::new(2, 2, Size::new(200, 100));
        assert_eq!(layout.card_at(Point::new(10, 10)), Some(0));
        assert_eq!(layout.card_at(Point::new(150, 50)), Some(1));
        assert_eq!(layout.card_at(Point::new(0, 0)), None, "Gap belongs to no card");
    }
}
