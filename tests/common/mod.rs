#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use vcr_wasm::host::{ResizeCallback, Tick};
use vcr_wasm::{Cadence, Host, OverlayError, Rgba, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Resize(u32, u32),
    Blur(f64),
    Opacity(f64),
    Clear,
    Fill(Rgba),
    Rect { x: f64, y: f64, w: f64, h: f64 },
}

/// Surface that only remembers what was asked of it.
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<Op>,
    /// Makes `set_blur` fail, standing in for a detached canvas.
    pub broken: bool,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ops: Vec::new(), broken: false }
    }

    pub fn rects(&self) -> Vec<(f64, f64, f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::Rect { x, y, w, h } => Some((x, y, w, h)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.push(Op::Resize(width, height));
    }

    fn set_blur(&mut self, radius_px: f64) -> Result<(), OverlayError> {
        if self.broken {
            return Err(OverlayError::Draw("surface detached".into()));
        }
        self.ops.push(Op::Blur(radius_px));
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f64) -> Result<(), OverlayError> {
        self.ops.push(Op::Opacity(opacity));
        Ok(())
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn set_fill(&mut self, color: Rgba) {
        self.ops.push(Op::Fill(color));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(Op::Rect { x, y, w, h });
    }
}

#[derive(Default)]
struct HostState {
    viewport: (u32, u32),
    next_id: usize,
    loops: BTreeMap<usize, (Cadence, Tick)>,
    listeners: BTreeMap<usize, ResizeCallback>,
    scheduled: Vec<Cadence>,
    cancelled: Vec<usize>,
    unlistened: Vec<usize>,
    refuse_listeners: bool,
}

/// Host whose clock and viewport are driven by the test through a [`HostControl`].
pub struct FakeHost {
    state: Rc<RefCell<HostState>>,
}

/// Test-side view of a [`FakeHost`] that has been moved into an overlay.
#[derive(Clone)]
pub struct HostControl {
    state: Rc<RefCell<HostState>>,
}

pub fn fake_host(width: u32, height: u32) -> (FakeHost, HostControl) {
    let state = Rc::new(RefCell::new(HostState { viewport: (width, height), ..Default::default() }));
    (FakeHost { state: Rc::clone(&state) }, HostControl { state })
}

impl FakeHost {
    /// A host on which resize listeners cannot be registered.
    pub fn without_events(width: u32, height: u32) -> Self {
        let (host, ctl) = fake_host(width, height);
        ctl.state.borrow_mut().refuse_listeners = true;
        host
    }
}

impl Host for FakeHost {
    type Loop = usize;
    type Listener = usize;

    fn viewport_size(&self) -> (u32, u32) {
        self.state.borrow().viewport
    }

    fn schedule(&mut self, cadence: Cadence, tick: Tick) -> Result<usize, OverlayError> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.loops.insert(id, (cadence, tick));
        state.scheduled.push(cadence);
        Ok(id)
    }

    fn cancel(&mut self, handle: usize) {
        let mut state = self.state.borrow_mut();
        state.loops.remove(&handle);
        state.cancelled.push(handle);
    }

    fn listen_resize(&mut self, on_resize: ResizeCallback) -> Result<usize, OverlayError> {
        let mut state = self.state.borrow_mut();
        if state.refuse_listeners {
            return Err(OverlayError::EventSource("no resize events here".into()));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.listeners.insert(id, on_resize);
        Ok(id)
    }

    fn unlisten_resize(&mut self, listener: usize) {
        let mut state = self.state.borrow_mut();
        state.listeners.remove(&listener);
        state.unlistened.push(listener);
    }
}

impl HostControl {
    /// Run every live loop once, as one frame/timer period would.
    pub fn tick(&self) -> Result<(), OverlayError> {
        let mut loops = std::mem::take(&mut self.state.borrow_mut().loops);
        let result = loops.values_mut().try_for_each(|(_, tick)| tick());
        self.state.borrow_mut().loops.append(&mut loops);
        result
    }

    /// Change the viewport silently.
    pub fn set_viewport(&self, width: u32, height: u32) {
        self.state.borrow_mut().viewport = (width, height);
    }

    /// Change the viewport and notify every live listener.
    pub fn resize_viewport(&self, width: u32, height: u32) {
        self.state.borrow_mut().viewport = (width, height);
        let mut listeners = std::mem::take(&mut self.state.borrow_mut().listeners);
        for callback in listeners.values_mut() {
            callback(width, height);
        }
        self.state.borrow_mut().listeners.append(&mut listeners);
    }

    pub fn live_loops(&self) -> Vec<Cadence> {
        self.state.borrow().loops.values().map(|(cadence, _)| *cadence).collect()
    }

    pub fn live_listeners(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn scheduled(&self) -> Vec<Cadence> {
        self.state.borrow().scheduled.clone()
    }

    pub fn cancelled(&self) -> Vec<usize> {
        self.state.borrow().cancelled.clone()
    }

    pub fn unlistened(&self) -> Vec<usize> {
        self.state.borrow().unlistened.clone()
    }
}
