//! `requestAnimationFrame` backed frame scheduler

use crate::reveal::{FrameId, FrameScheduler};
use wasm_bindgen::{closure::Closure, JsCast};

/// Browser frame scheduler.
///
/// One JS closure is created up front and handed to every request; it
/// receives the frame timestamp in milliseconds.
pub struct AnimationFrameScheduler {
    window: web_sys::Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl AnimationFrameScheduler {
    /// `None` outside a browser window
    pub fn new(on_frame: impl FnMut(f64) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        Some(Self {
            window,
            callback: Closure::new(on_frame),
        })
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameId> {
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameId(id)),
            Err(e) => {
                tracing::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if let Err(e) = self.window.cancel_animation_frame(id.0) {
            tracing::warn!("cancelAnimationFrame({}) failed: {:?}", id.0, e);
        }
    }
}
