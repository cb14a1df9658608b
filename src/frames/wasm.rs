use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::Context;
use std::task::Poll;
use std::task::Waker;

use futures::Stream;
use log::warn;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

#[derive(Default)]
struct FrameState {
    /// The timestamp of a frame that's fired but hasn't been handed out yet.
    fired: Option<f64>,
    /// The id of the outstanding `requestAnimationFrame` call, if there is one.
    request: Option<i32>,
    waker: Option<Waker>,
}

/// One tick per display refresh, carrying the `requestAnimationFrame` timestamp.
///
/// A new frame is only requested once the previous one has been consumed, so a slow consumer
/// never builds up a backlog.
pub struct AnimationFrames {
    window: Window,
    state: Rc<RefCell<FrameState>>,
    callback: Closure<dyn FnMut(f64)>,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        let state = Rc::new(RefCell::new(FrameState::default()));

        let callback = {
            let state = state.clone();
            Closure::wrap(Box::new(move |timestamp: f64| {
                let waker = {
                    let mut state = state.borrow_mut();
                    state.fired = Some(timestamp);
                    state.request = None;
                    state.waker.take()
                };
                if let Some(waker) = waker {
                    waker.wake();
                }
            }) as Box<dyn FnMut(f64)>)
        };

        Self {
            window,
            state,
            callback,
        }
    }
}

impl Stream for AnimationFrames {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        let mut state = self.state.borrow_mut();

        if let Some(timestamp) = state.fired.take() {
            return Poll::Ready(Some(timestamp));
        }

        state.waker = Some(cx.waker().clone());
        if state.request.is_none() {
            match self
                .window
                .request_animation_frame(self.callback.as_ref().unchecked_ref())
            {
                Ok(id) => state.request = Some(id),
                Err(e) => {
                    warn!("requestAnimationFrame failed: {:?}", e);
                    return Poll::Ready(None);
                }
            }
        }

        Poll::Pending
    }
}

impl Drop for AnimationFrames {
    fn drop(&mut self) {
        // The callback is about to be freed, so it mustn't be called after this.
        if let Some(id) = self.state.borrow_mut().request.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}
