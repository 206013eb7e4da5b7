//! Piano Tiles core crate.
//!
//! Rows of tiles scroll down a fixed canvas toward the strike line; the player
//! clicks the black tiles of the lowest unfinished row before it gets there.
//! The game core (`board`, `engine`, `snapshot`) is plain Rust and runs
//! natively; `render` and the browser host drive it from a canvas through
//! `wasm-bindgen`.

use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod render;
pub mod snapshot;

mod host;
mod logging;

pub use board::{ColumnPicker, RandomColumns, Row, RowFactory, RowStack};
pub use config::GameConfig;
pub use engine::{ClickOutcome, GameEngine, GamePhase, Hit, Miss, MissCause, TickOutcome};
pub use error::{ConfigError, GameError, InvalidClick};
pub use render::{CanvasRenderer, PaintOp, Renderer, paint_ops};
pub use snapshot::{FrameSnapshot, RowSnapshot};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Show the welcome frame on a viewport-sized canvas; the first click starts play.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    host::launch(None)
}

/// Same as [`start_game`] with a JSON config (camelCase keys, missing keys
/// take defaults).
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(host::to_js)?;
    host::launch(Some(config))
}

/// Stop the running game and cancel the pending animation frame.
#[wasm_bindgen]
pub fn stop_game() {
    host::shutdown();
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn game_snapshot_json() -> Result<String, JsValue> {
    host::snapshot_json()
}
