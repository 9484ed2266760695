use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use js_sys::Function;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Element, HtmlElement, Window};

use crate::channels::ChannelLineup;
use crate::error::OverlayError;

/// Fired by the video element once the new source has a frame to show.
const LOADED_EVENT: &str = "loadeddata";

struct Tuner {
    window: Window,
    screen: Element,
    snow: HtmlElement,
    lineup: ChannelLineup,
    /// The one outstanding `setTimeout`, if any.
    pending: Option<i32>,
}

impl Tuner {
    fn schedule(&mut self, callback: &Function, after: Duration) {
        self.cancel_pending();
        let ms = after.as_millis().min(i32::MAX as u128) as i32;
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback, ms)
        {
            Ok(id) => self.pending = Some(id),
            Err(e) => log::error!("could not schedule channel switch: {e:?}"),
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.window.clear_timeout_with_handle(id);
        }
    }

    fn set_snow(&self, opacity: &str) {
        if let Err(e) = self.snow.style().set_property("opacity", opacity) {
            log::warn!("snow opacity not applied: {e:?}");
        }
    }

    fn tune(&self) {
        let src = self.lineup.current();
        if let Err(e) = self.screen.set_attribute("src", src) {
            log::error!("could not tune to {src}: {e:?}");
        }
    }

    fn begin_switch(&mut self, finish: &Function) {
        self.pending = None;
        if let Some(snow) = self.lineup.begin_switch() {
            self.set_snow("1");
            self.schedule(finish, snow);
        }
    }

    fn finish_switch(&mut self) {
        self.pending = None;
        if self.lineup.finish_switch().is_some() {
            log::debug!("channel {} of {}", self.lineup.index() + 1, self.lineup.len());
            self.tune();
            self.set_snow("0");
        }
    }
}

/// Rotates a `<video>` through a lineup, hiding each cut behind the snow
/// layer. Timers and the load listener are released on drop.
pub struct ChannelRotator {
    tuner: Rc<RefCell<Tuner>>,
    on_loaded: Closure<dyn FnMut()>,
    _begin: Closure<dyn FnMut()>,
    _finish: Closure<dyn FnMut()>,
}

impl ChannelRotator {
    pub fn new(screen: Element, snow: HtmlElement, lineup: ChannelLineup) -> Result<Self, OverlayError> {
        let window = web_sys::window()
            .ok_or_else(|| OverlayError::EventSource("no window".into()))?;
        let tuner = Rc::new(RefCell::new(Tuner { window, screen, snow, lineup, pending: None }));

        let finish = {
            let tuner = Rc::clone(&tuner);
            Closure::wrap(Box::new(move || tuner.borrow_mut().finish_switch()) as Box<dyn FnMut()>)
        };
        let begin = {
            let tuner = Rc::clone(&tuner);
            let finish: Function = finish.as_ref().unchecked_ref::<Function>().clone();
            Closure::wrap(Box::new(move || tuner.borrow_mut().begin_switch(&finish)) as Box<dyn FnMut()>)
        };
        let begin_fn: Function = begin.as_ref().unchecked_ref::<Function>().clone();
        let on_loaded = {
            let tuner = Rc::clone(&tuner);
            let begin = begin_fn.clone();
            Closure::wrap(Box::new(move || {
                let mut tuner = tuner.borrow_mut();
                let dwell = tuner.lineup.dwell();
                tuner.schedule(&begin, dwell);
            }) as Box<dyn FnMut()>)
        };

        {
            let mut t = tuner.borrow_mut();
            t.screen
                .add_event_listener_with_callback(LOADED_EVENT, on_loaded.as_ref().unchecked_ref())
                .map_err(|e| OverlayError::EventSource(format!("{e:?}")))?;
            t.set_snow("0");
            if t.screen.get_attribute("src").map_or(true, |s| s.is_empty()) {
                t.tune();
            }
            // The current source may have loaded before we got here.
            let dwell = t.lineup.dwell();
            t.schedule(&begin_fn, dwell);
        }

        Ok(Self { tuner, on_loaded, _begin: begin, _finish: finish })
    }
}

impl Drop for ChannelRotator {
    fn drop(&mut self) {
        let mut tuner = self.tuner.borrow_mut();
        tuner.cancel_pending();
        let _ = tuner
            .screen
            .remove_event_listener_with_callback(LOADED_EVENT, self.on_loaded.as_ref().unchecked_ref());
    }
}
