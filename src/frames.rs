//! The animation loop: something that ticks once per frame until told to stop.

use std::cell::Cell;
use std::rc::Rc;

use futures::Stream;
use futures::StreamExt;

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(not(target_arch = "wasm32"))]
pub use native::*;

#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
pub use wasm::*;

/// Stops a running [`run_until_stopped`] loop before its next frame.
///
/// Everything here runs on one thread, so a shared `Cell` is all this needs.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Calls `on_frame` for every tick from `frames`, until `stop` is triggered or the ticks run out.
///
/// Returns how many frames were run.
pub async fn run_until_stopped<S, F>(mut frames: S, stop: &StopHandle, mut on_frame: F) -> u64
where
    S: Stream + Unpin,
    F: FnMut(S::Item),
{
    let mut count = 0;
    while !stop.is_stopped() {
        match frames.next().await {
            Some(tick) => {
                // The handle may have been triggered while we were waiting.
                if stop.is_stopped() {
                    break;
                }
                on_frame(tick);
                count += 1;
            }
            None => break,
        }
    }
    count
}
