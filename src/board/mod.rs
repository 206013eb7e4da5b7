//! Tile board model: rows of tiles, the stack they scroll in, and the factory
//! that grows the stack.
//!
//! Nothing in here draws or touches the DOM; the engine drives these types and
//! the renderer only ever sees a [`crate::snapshot::FrameSnapshot`].

mod factory;
mod row;
mod stack;

pub use factory::{ColumnPicker, RandomColumns, RowFactory};
pub use row::Row;
pub use stack::RowStack;
