use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Window;

use crate::error::OverlayError;
use crate::host::{Cadence, Host, ResizeCallback, Tick};

/// Drives the loop with `requestAnimationFrame` / `setInterval` and listens
/// for `resize` on the window.
pub struct BrowserHost {
    window: Window,
}

/// A live draw loop. Owns the JS callback so it stays alive while scheduled.
pub enum BrowserLoop {
    Frame {
        /// Id of the pending frame request, `None` while a frame is running.
        id: Rc<Cell<Option<i32>>>,
        // Emptied on cancel, which also breaks the closure's self-reference.
        closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    },
    Interval {
        id: Rc<Cell<Option<i32>>>,
        _closure: Closure<dyn FnMut()>,
    },
}

/// The registered `resize` callback; removal needs the very same function.
pub struct BrowserListener {
    closure: Closure<dyn FnMut()>,
}

impl BrowserHost {
    pub fn new() -> Result<Self, OverlayError> {
        let window = web_sys::window()
            .ok_or_else(|| OverlayError::EventSource("no window".into()))?;
        Ok(Self { window })
    }
}

fn viewport(window: &Window) -> (u32, u32) {
    let px = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
    };
    (px(window.inner_width()), px(window.inner_height()))
}

/// Hand a frame failure to the page's unhandled-error path.
fn throw(err: OverlayError) -> ! {
    log::error!("noise frame failed: {err}");
    wasm_bindgen::throw_str(&err.to_string())
}

impl Host for BrowserHost {
    type Loop = BrowserLoop;
    type Listener = BrowserListener;

    fn viewport_size(&self) -> (u32, u32) {
        viewport(&self.window)
    }

    fn schedule(&mut self, cadence: Cadence, mut tick: Tick) -> Result<BrowserLoop, OverlayError> {
        let id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        match cadence {
            Cadence::FrameSynced => {
                let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
                let (window, next_id, next) = (self.window.clone(), Rc::clone(&id), Rc::clone(&slot));
                let closure = Closure::wrap(Box::new(move || {
                    next_id.set(None);
                    if let Err(err) = tick() {
                        throw(err);
                    }
                    // Request the next frame only after this one is done.
                    let requested = next
                        .borrow()
                        .as_ref()
                        .and_then(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
                    next_id.set(requested);
                }) as Box<dyn FnMut()>);

                let first = self
                    .window
                    .request_animation_frame(closure.as_ref().unchecked_ref())
                    .map_err(|e| OverlayError::Schedule(format!("{e:?}")))?;
                id.set(Some(first));
                *slot.borrow_mut() = Some(closure);
                Ok(BrowserLoop::Frame { id, closure: slot })
            }
            Cadence::Interval(period) => {
                let (window, own_id) = (self.window.clone(), Rc::clone(&id));
                let closure = Closure::wrap(Box::new(move || {
                    if let Err(err) = tick() {
                        if let Some(handle) = own_id.take() {
                            window.clear_interval_with_handle(handle);
                        }
                        throw(err);
                    }
                }) as Box<dyn FnMut()>);

                let timeout = (period.as_secs_f64() * 1000.0).round().max(1.0) as i32;
                let handle = self
                    .window
                    .set_interval_with_callback_and_timeout_and_arguments_0(
                        closure.as_ref().unchecked_ref(),
                        timeout,
                    )
                    .map_err(|e| OverlayError::Schedule(format!("{e:?}")))?;
                id.set(Some(handle));
                Ok(BrowserLoop::Interval { id, _closure: closure })
            }
        }
    }

    fn cancel(&mut self, handle: BrowserLoop) {
        match handle {
            BrowserLoop::Frame { id, closure } => {
                if let Some(id) = id.take() {
                    let _ = self.window.cancel_animation_frame(id);
                }
                closure.borrow_mut().take();
            }
            BrowserLoop::Interval { id, .. } => {
                if let Some(id) = id.take() {
                    self.window.clear_interval_with_handle(id);
                }
            }
        }
    }

    fn listen_resize(&mut self, mut on_resize: ResizeCallback) -> Result<BrowserListener, OverlayError> {
        let window = self.window.clone();
        let closure = Closure::wrap(Box::new(move || {
            let (w, h) = viewport(&window);
            on_resize(w, h);
        }) as Box<dyn FnMut()>);
        self.window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| OverlayError::EventSource(format!("{e:?}")))?;
        Ok(BrowserListener { closure })
    }

    fn unlisten_resize(&mut self, listener: BrowserListener) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", listener.closure.as_ref().unchecked_ref());
    }
}
