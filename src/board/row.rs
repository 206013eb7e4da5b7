// Tile row: one horizontal band of the board.

use std::collections::BTreeSet;

use crate::error::InvalidClick;

/// A single row of tiles. Positions are canvas pixels with y growing
/// downward, so scrolling toward the strike line increases `vertical_position`.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    id: u64,
    vertical_position: f64,
    width: f64,
    height: f64,
    active: BTreeSet<usize>,   // tiles still waiting for a click
    resolved: BTreeSet<usize>, // tiles already clicked
}

impl Row {
    pub fn new(
        id: u64,
        vertical_position: f64,
        width: f64,
        height: f64,
        active: BTreeSet<usize>,
    ) -> Self {
        Self {
            id,
            vertical_position,
            width,
            height,
            active,
            resolved: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
    pub fn vertical_position(&self) -> f64 {
        self.vertical_position
    }
    pub fn width(&self) -> f64 {
        self.width
    }
    pub fn height(&self) -> f64 {
        self.height
    }
    pub fn bottom(&self) -> f64 {
        self.vertical_position + self.height
    }
    pub fn active_columns(&self) -> &BTreeSet<usize> {
        &self.active
    }
    pub fn resolved_columns(&self) -> &BTreeSet<usize> {
        &self.resolved
    }

    /// Scroll toward the strike line.
    pub fn advance(&mut self, delta: f64) {
        self.vertical_position += delta;
    }

    /// Scroll away from the strike line (warm-up only).
    pub fn retreat(&mut self, delta: f64) {
        self.vertical_position -= delta;
    }

    /// Move `col` from the active set to the resolved set and report whether
    /// the row is now complete. Columns that are not active are rejected
    /// untouched, so a tile can never be scored twice.
    pub fn resolve_column(&mut self, col: usize) -> Result<bool, InvalidClick> {
        if !self.active.remove(&col) {
            return Err(InvalidClick::ColumnNotActive(col));
        }
        self.resolved.insert(col);
        Ok(self.is_complete())
    }

    pub fn is_column_active(&self, col: usize) -> bool {
        self.active.contains(&col)
    }

    pub fn is_column_resolved(&self, col: usize) -> bool {
        self.resolved.contains(&col)
    }

    /// A complete row can no longer end the game.
    pub fn is_complete(&self) -> bool {
        self.active.is_empty()
    }

    pub fn has_crossed_boundary(&self, strike_y: f64) -> bool {
        self.bottom() >= strike_y
    }

    /// Whether `y` falls inside this row's vertical span (top inclusive).
    pub fn spans(&self, y: f64) -> bool {
        self.vertical_position <= y && y < self.bottom()
    }

    /// Whether the whole row lies at or below `y`.
    pub fn is_below(&self, y: f64) -> bool {
        self.vertical_position >= y
    }
}
