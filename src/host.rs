//! Browser host: canvas setup, click input, and the animation-frame loop.
//!
//! The host owns one [`GameEngine`] in a thread-local cell. Every frame it
//! ticks the engine and repaints; every click is forwarded as canvas-local
//! pixels. When the engine stops running the pending frame is cancelled, so no
//! callback is left scheduled after a game over or teardown.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, window};

use crate::config::GameConfig;
use crate::engine::{ClickOutcome, GameEngine, GamePhase};
use crate::render::{CanvasRenderer, Renderer};

const CANVAS_ID: &str = "tiles-canvas";
const BOUND_ATTR: &str = "data-tiles-bound";

struct Host {
    engine: GameEngine,
    renderer: CanvasRenderer,
    frame_id: Option<i32>, // pending requestAnimationFrame handle
}

thread_local! {
    static HOST: RefCell<Option<Host>> = RefCell::new(None);
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = RefCell::new(None);
}

pub(crate) fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Create (or reuse) the game canvas and show the welcome frame. With no
/// explicit config the canvas is sized from the viewport.
pub(crate) fn launch(config: Option<GameConfig>) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = match config {
        Some(config) => config,
        None => {
            let fallback = GameConfig::default();
            let w = win.inner_width()?.as_f64().unwrap_or(fallback.canvas_width);
            let h = win.inner_height()?.as_f64().unwrap_or(fallback.canvas_height);
            GameConfig::for_viewport(w, h)
        }
    };
    let engine = GameEngine::new(config).map_err(to_js)?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_attribute("style", "display:block; margin:0 auto; border:0.5px solid #d1d5db; touch-action:manipulation;").ok();
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&c)?;
        c
    };
    canvas.set_width(engine.config().canvas_width as u32);
    canvas.set_height(engine.config().canvas_height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let mut renderer = CanvasRenderer::new(ctx);
    renderer.render(&engine.snapshot())?;

    // A relaunch replaces the previous session; drop its pending frame first.
    HOST.with(|cell| {
        let previous = cell.borrow_mut().take();
        if let Some(mut old) = previous {
            old.engine.stop();
            sync_frame_loop(&mut old);
        }
        *cell.borrow_mut() = Some(Host {
            engine,
            renderer,
            frame_id: None,
        });
    });

    install_frame_callback();
    if canvas.get_attribute(BOUND_ATTR).is_none() {
        bind_clicks(&canvas)?;
        canvas.set_attribute(BOUND_ATTR, "1")?;
    }
    log::info!("tiles host ready");
    Ok(())
}

/// Stop the current session and cancel any scheduled frame.
pub(crate) fn shutdown() {
    HOST.with(|cell| {
        if let Some(host) = cell.borrow_mut().as_mut() {
            host.engine.stop();
            sync_frame_loop(host);
            repaint(host);
        }
    });
}

#[cfg(feature = "serde_json")]
pub(crate) fn snapshot_json() -> Result<String, JsValue> {
    HOST.with(|cell| {
        let guard = cell.borrow();
        let host = guard
            .as_ref()
            .ok_or_else(|| JsValue::from_str("game not started"))?;
        host.engine.snapshot().to_json().map_err(to_js)
    })
}

fn bind_clicks(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    // offset_x/offset_y are already relative to the canvas.
    let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
        on_click(evt.offset_x() as f64, evt.offset_y() as f64);
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_click(x: f64, y: f64) {
    HOST.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(host) = guard.as_mut() else {
            return;
        };
        if host.engine.phase() == GamePhase::GameOver {
            host.engine.restart();
        } else if let ClickOutcome::Ignored(reason) = host.engine.handle_click(x, y) {
            log::debug!("click ignored: {reason}");
        }
        sync_frame_loop(host);
        repaint(host);
    });
}

fn on_frame(_ts: f64) {
    HOST.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(host) = guard.as_mut() else {
            return;
        };
        host.frame_id = None;
        host.engine.tick();
        repaint(host);
        sync_frame_loop(host);
    });
}

fn repaint(host: &mut Host) {
    if let Err(err) = host.renderer.render(&host.engine.snapshot()) {
        web_sys::console::error_1(&err);
    }
}

/// Keep exactly one frame scheduled while the engine runs, none otherwise.
fn sync_frame_loop(host: &mut Host) {
    if host.engine.is_running() {
        if host.frame_id.is_none() {
            host.frame_id = request_frame();
        }
    } else if let Some(id) = host.frame_id.take() {
        if let Some(w) = window() {
            let _ = w.cancel_animation_frame(id);
        }
    }
}

fn request_frame() -> Option<i32> {
    let win = window()?;
    FRAME_CALLBACK.with(|cb| {
        let cb = cb.borrow();
        let f = cb.as_ref()?;
        win.request_animation_frame(f.as_ref().unchecked_ref()).ok()
    })
}

fn install_frame_callback() {
    FRAME_CALLBACK.with(|cb| {
        let mut cb = cb.borrow_mut();
        if cb.is_none() {
            *cb = Some(Closure::wrap(Box::new(on_frame) as Box<dyn FnMut(f64)>));
        }
    });
}
