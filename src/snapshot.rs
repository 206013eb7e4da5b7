//! Immutable per-frame view of the engine, handed to renderers.

use crate::board::Row;
use crate::engine::{GamePhase, Miss};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RowSnapshot {
    pub id: u64,
    pub y: f64,
    pub height: f64,
    pub active: Vec<usize>,
    pub resolved: Vec<usize>,
}

impl From<&Row> for RowSnapshot {
    fn from(row: &Row) -> Self {
        Self {
            id: row.id(),
            y: row.vertical_position(),
            height: row.height(),
            active: row.active_columns().iter().copied().collect(),
            resolved: row.resolved_columns().iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub speed: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub col_count: usize,
    pub tile_width: f64,
    /// Oldest row first.
    pub rows: Vec<RowSnapshot>,
    /// Set once the run ended on a miss.
    pub miss: Option<Miss>,
}

impl FrameSnapshot {
    /// Columns to paint in the error color for the given row.
    pub fn error_columns(&self, row_id: u64) -> &[usize] {
        match &self.miss {
            Some(miss) if miss.row_id == row_id => &miss.columns,
            _ => &[],
        }
    }

    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
