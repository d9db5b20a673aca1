use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::sched::LoopState;

type FrameClosure = Closure<dyn FnMut(f64)>;

/// Self-rescheduling requestAnimationFrame loop with an explicit stop
/// handle.
///
/// The closure lives in a shared cell for the whole run and reschedules
/// itself by reading that cell; `stop` cancels any pending request and
/// drops the closure, which also breaks the reference cycle between the
/// two. Do not call `stop` from inside the frame callback — return false
/// from the callback to end the loop from there.
pub struct FrameLoop {
    state: Rc<RefCell<LoopState>>,
    closure: Rc<RefCell<Option<FrameClosure>>>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(LoopState::new())),
            closure: Rc::new(RefCell::new(None)),
        }
    }

    /// Start the loop. The callback receives the frame timestamp in
    /// milliseconds and returns whether to keep going.
    pub fn start<F>(&self, mut callback: F)
    where
        F: FnMut(f64) -> bool + 'static,
    {
        if !self.state.borrow_mut().try_start() {
            return;
        }

        let state = self.state.clone();
        let cell = self.closure.clone();

        *self.closure.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            if !state.borrow_mut().tick_started() {
                return;
            }
            let keep_going = callback(timestamp);
            if state.borrow_mut().tick_finished(keep_going) {
                let rescheduled = cell.borrow().as_ref().and_then(request_frame);
                match rescheduled {
                    Some(id) => state.borrow_mut().frame_requested(id),
                    None => state.borrow_mut().request_failed(),
                }
            }
        }));

        let requested = self.closure.borrow().as_ref().and_then(request_frame);
        match requested {
            Some(id) => self.state.borrow_mut().frame_requested(id),
            None => {
                self.state.borrow_mut().request_failed();
                self.closure.borrow_mut().take();
            }
        }
    }

    /// Stop the loop and cancel any pending frame request.
    pub fn stop(&self) {
        let pending = self.state.borrow_mut().stop();
        if let Some(id) = pending {
            if let Some(window) = web_sys::window() {
                window.cancel_animation_frame(id).ok();
            }
        }
        self.closure.borrow_mut().take();
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().is_running()
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn request_frame(closure: &FrameClosure) -> Option<i32> {
    let window = web_sys::window()?;
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(_) => {
            log::warn!("requestAnimationFrame failed");
            None
        }
    }
}
