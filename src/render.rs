//! Drawing side of the game. Renderers consume a [`FrameSnapshot`] and never
//! touch engine state.
//!
//! [`paint_ops`] turns a snapshot into an ordered list of primitive draws so
//! the layout can be checked without a browser; [`CanvasRenderer`] replays the
//! list onto a 2d canvas context.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::engine::GamePhase;
use crate::snapshot::FrameSnapshot;

pub const BACKGROUND_COLOR: &str = "#FFFFFF";
pub const ACTIVE_COLOR: &str = "#000000";
pub const RESOLVED_COLOR: &str = "#AAAAAA";
pub const ERROR_COLOR: &str = "#FF0000";
pub const GRID_COLOR: &str = "#116D6E";
const OVERLAY_SHADE: &str = "rgba(0,0,0,0.45)";
const TEXT_COLOR: &str = "#FFFFFF";

/// Paints one frame.
pub trait Renderer {
    type Error;

    fn render(&mut self, frame: &FrameSnapshot) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    Clear(Rect),
    Fill { rect: Rect, color: &'static str },
    Stroke(Rect),
    Text { text: String, x: f64, y: f64, size: u32 },
}

/// Ordered draws for one frame: background, then per row the white band, the
/// grid cell outlines and the colored tiles, then the score and any overlay.
pub fn paint_ops(frame: &FrameSnapshot) -> Vec<PaintOp> {
    let canvas = Rect {
        x: 0.0,
        y: 0.0,
        w: frame.canvas_width,
        h: frame.canvas_height,
    };
    let tw = frame.tile_width;
    let mut ops = vec![PaintOp::Clear(canvas)];

    for row in &frame.rows {
        // Skip rows that are fully above or below the canvas.
        if row.y + row.height <= 0.0 || row.y >= frame.canvas_height {
            continue;
        }
        ops.push(PaintOp::Fill {
            rect: Rect {
                x: 0.0,
                y: row.y,
                w: frame.canvas_width,
                h: row.height,
            },
            color: BACKGROUND_COLOR,
        });
        let errors = frame.error_columns(row.id);
        for col in 0..frame.col_count {
            let cell = Rect {
                x: col as f64 * tw,
                y: row.y,
                w: tw,
                h: row.height,
            };
            ops.push(PaintOp::Stroke(cell));
            let color = if errors.contains(&col) {
                Some(ERROR_COLOR)
            } else if row.active.contains(&col) {
                Some(ACTIVE_COLOR)
            } else if row.resolved.contains(&col) {
                Some(RESOLVED_COLOR)
            } else {
                None
            };
            if let Some(color) = color {
                ops.push(PaintOp::Fill { rect: cell, color });
            }
        }
    }

    let cx = frame.canvas_width / 2.0;
    let cy = frame.canvas_height / 2.0;
    ops.push(PaintOp::Text {
        text: frame.score.to_string(),
        x: cx,
        y: 36.0,
        size: 28,
    });
    let banner = match frame.phase {
        GamePhase::Playing => None,
        GamePhase::Welcome => Some(("Piano Tiles", "Tap a black tile to start")),
        GamePhase::GameOver => Some(("Oops! Wrong Tile", "Tap to play again")),
    };
    if let Some((title, hint)) = banner {
        ops.push(PaintOp::Fill {
            rect: Rect {
                x: 0.0,
                y: cy - 60.0,
                w: frame.canvas_width,
                h: 100.0,
            },
            color: OVERLAY_SHADE,
        });
        ops.push(PaintOp::Text {
            text: title.to_string(),
            x: cx,
            y: cy - 15.0,
            size: 30,
        });
        ops.push(PaintOp::Text {
            text: hint.to_string(),
            x: cx,
            y: cy + 20.0,
            size: 16,
        });
    }
    ops
}

/// Replays [`paint_ops`] onto a 2d canvas.
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        ctx.set_line_width(1.0);
        ctx.set_stroke_style_str(GRID_COLOR);
        ctx.set_text_align("center");
        Self { ctx }
    }
}

impl Renderer for CanvasRenderer {
    type Error = JsValue;

    fn render(&mut self, frame: &FrameSnapshot) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for op in paint_ops(frame) {
            match op {
                PaintOp::Clear(r) => ctx.clear_rect(r.x, r.y, r.w, r.h),
                PaintOp::Fill { rect: r, color } => {
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(r.x, r.y, r.w, r.h);
                }
                PaintOp::Stroke(r) => ctx.stroke_rect(r.x, r.y, r.w, r.h),
                PaintOp::Text { text, x, y, size } => {
                    ctx.set_font(&format!("bold {size}px 'Fira Code', monospace"));
                    ctx.set_fill_style_str(TEXT_COLOR);
                    ctx.set_stroke_style_str(ACTIVE_COLOR);
                    ctx.set_line_width(4.0);
                    ctx.stroke_text(&text, x, y)?;
                    ctx.fill_text(&text, x, y)?;
                    ctx.set_line_width(1.0);
                    ctx.set_stroke_style_str(GRID_COLOR);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Miss, MissCause};
    use crate::snapshot::RowSnapshot;

    fn frame(phase: GamePhase, miss: Option<Miss>) -> FrameSnapshot {
        FrameSnapshot {
            phase,
            score: 3,
            speed: 2.3,
            canvas_width: 400.0,
            canvas_height: 800.0,
            col_count: 4,
            tile_width: 100.0,
            rows: vec![
                RowSnapshot {
                    id: 7,
                    y: 600.0,
                    height: 200.0,
                    active: vec![1],
                    resolved: vec![2],
                },
                RowSnapshot {
                    id: 8,
                    y: 400.0,
                    height: 200.0,
                    active: vec![0],
                    resolved: vec![],
                },
                RowSnapshot {
                    id: 9,
                    y: -250.0,
                    height: 200.0,
                    active: vec![3],
                    resolved: vec![],
                },
            ],
            miss,
        }
    }

    fn fills(ops: &[PaintOp]) -> Vec<(f64, f64, &'static str)> {
        ops.iter()
            .filter_map(|op| match op {
                PaintOp::Fill { rect, color } if rect.w < 400.0 => Some((rect.x, rect.y, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn paints_active_and_resolved_tiles() {
        let ops = paint_ops(&frame(GamePhase::Playing, None));
        assert_eq!(ops[0], PaintOp::Clear(Rect { x: 0.0, y: 0.0, w: 400.0, h: 800.0 }));
        assert_eq!(
            fills(&ops),
            vec![
                (100.0, 600.0, ACTIVE_COLOR),
                (200.0, 600.0, RESOLVED_COLOR),
                (0.0, 400.0, ACTIVE_COLOR),
            ]
        );
    }

    #[test]
    fn skips_rows_outside_the_canvas() {
        let ops = paint_ops(&frame(GamePhase::Playing, None));
        let strokes = ops.iter().filter(|op| matches!(op, PaintOp::Stroke(_))).count();
        // Two visible rows of four cells each.
        assert_eq!(strokes, 8);
    }

    #[test]
    fn error_color_wins_on_game_over() {
        let miss = Miss {
            row_id: 7,
            columns: vec![3],
            cause: MissCause::WrongTile,
        };
        let ops = paint_ops(&frame(GamePhase::GameOver, Some(miss)));
        assert!(fills(&ops).contains(&(300.0, 600.0, ERROR_COLOR)));
        assert!(ops.iter().any(
            |op| matches!(op, PaintOp::Text { text, .. } if text == "Oops! Wrong Tile")
        ));
    }

    #[test]
    fn playing_frame_has_no_banner() {
        let ops = paint_ops(&frame(GamePhase::Playing, None));
        let texts: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["3"]);
    }
}
