//! Hover tracking and the progressive-reveal highlight
//!
//! While the pointer is over the chart the highlight jumps straight to the
//! hovered index. On leave it eases back to zero over `start * 40ms` using a
//! chain of animation frames. Frames are requested through [`FrameScheduler`]
//! so the chain can be cancelled whenever a newer interaction supersedes it.

/// Withdraw duration per point of progress
pub const WITHDRAW_MS_PER_POINT: f64 = 40.0;

/// Remaining progress below which the withdraw snaps to zero
pub const SETTLE_EPSILON: f64 = 0.01;

// ============================================================================
// POINTER MAPPING
// ============================================================================

/// Screen rectangle of the SVG element and its viewBox size.
///
/// The chart renders with `preserveAspectRatio="xMidYMid meet"`, so the
/// viewBox is scaled uniformly and centered (letterboxed) inside the rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMapping {
    pub rect_left: f64,
    pub rect_width: f64,
    pub rect_height: f64,
    pub view_width: f64,
    pub view_height: f64,
}

impl ViewportMapping {
    /// Convert a client X coordinate into chart (viewBox) X
    pub fn to_chart_x(&self, client_x: f64) -> f64 {
        let local = client_x - self.rect_left;
        if self.view_width <= 0.0 || self.view_height <= 0.0 || self.rect_width <= 0.0 {
            return local;
        }

        let scale = (self.rect_width / self.view_width).min(self.rect_height / self.view_height);
        if scale <= 0.0 {
            return local;
        }
        let letterbox = (self.rect_width - self.view_width * scale) / 2.0;
        (local - letterbox) / scale
    }
}

/// Index of the point closest to `x`; ties go to the lower index
pub fn nearest_index(xs: &[f64], x: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &px) in xs.iter().enumerate() {
        let distance = (px - x).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Cubic ease-out
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

// ============================================================================
// STATE MACHINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealPhase {
    Idle,
    Hovering {
        index: usize,
    },
    Withdrawing {
        from: f64,
        /// Timestamp of the first frame, set when that frame arrives
        started_at: Option<f64>,
    },
}

/// Highlight progress, measured in points from the left edge
#[derive(Debug, Clone, PartialEq)]
pub struct RevealAnimation {
    phase: RevealPhase,
    progress: f64,
}

impl RevealAnimation {
    pub fn new() -> Self {
        Self {
            phase: RevealPhase::Idle,
            progress: 0.0,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn hovered_index(&self) -> Option<usize> {
        match self.phase {
            RevealPhase::Hovering { index } => Some(index),
            _ => None,
        }
    }

    /// Snap to the hovered index
    pub fn hover(&mut self, index: usize) {
        self.phase = RevealPhase::Hovering { index };
        self.progress = index as f64;
    }

    /// Begin withdrawing. Returns `true` when frames are needed.
    pub fn leave(&mut self, animate: bool) -> bool {
        if !animate || self.progress < SETTLE_EPSILON {
            self.reset();
            return false;
        }
        self.phase = RevealPhase::Withdrawing {
            from: self.progress,
            started_at: None,
        };
        true
    }

    /// Advance the withdraw to `now` (ms). Returns `true` while more frames are needed.
    pub fn step(&mut self, now: f64) -> bool {
        let RevealPhase::Withdrawing { from, started_at } = self.phase else {
            return false;
        };

        let start = started_at.unwrap_or(now);
        self.phase = RevealPhase::Withdrawing {
            from,
            started_at: Some(start),
        };

        let duration = from * WITHDRAW_MS_PER_POINT;
        let t = if duration > 0.0 {
            ((now - start) / duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.progress = from * (1.0 - ease_out_cubic(t));

        if self.progress < SETTLE_EPSILON {
            self.reset();
            false
        } else {
            true
        }
    }

    pub fn reset(&mut self) {
        self.phase = RevealPhase::Idle;
        self.progress = 0.0;
    }
}

impl Default for RevealAnimation {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// STRATEGY PATTERN: Frame Scheduler
// ============================================================================

/// Handle of a requested animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameId(pub i32);

/// Strategy trait for per-frame callbacks.
///
/// Implementations arrange for [`RevealDriver::on_frame`] to be called once
/// per granted request.
pub trait FrameScheduler {
    /// Request one frame; `None` if the platform refused
    fn request_frame(&mut self) -> Option<FrameId>;

    /// Cancel a previously requested frame
    fn cancel_frame(&mut self, id: FrameId);
}

/// Couples [`RevealAnimation`] to a frame scheduler, keeping at most one frame
/// in flight.
pub struct RevealDriver<S: FrameScheduler> {
    animation: RevealAnimation,
    scheduler: S,
    pending: Option<FrameId>,
    animated: bool,
}

impl<S: FrameScheduler> RevealDriver<S> {
    pub fn new(scheduler: S, animated: bool) -> Self {
        Self {
            animation: RevealAnimation::new(),
            scheduler,
            pending: None,
            animated,
        }
    }

    pub fn progress(&self) -> f64 {
        self.animation.progress()
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.animation.hovered_index()
    }

    pub fn phase(&self) -> RevealPhase {
        self.animation.phase()
    }

    /// A frame is currently requested
    pub fn is_animating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_animated(&mut self, animated: bool) {
        self.animated = animated;
    }

    pub fn pointer_move(&mut self, index: usize) {
        self.cancel_pending();
        self.animation.hover(index);
    }

    pub fn pointer_leave(&mut self) {
        self.cancel_pending();
        if self.animation.leave(self.animated) {
            self.schedule();
        }
    }

    /// Frame callback; `now` is the frame timestamp in ms
    pub fn on_frame(&mut self, now: f64) {
        self.pending = None;
        if self.animation.step(now) {
            self.schedule();
        }
    }

    fn schedule(&mut self) {
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            tracing::warn!("animation frame refused, snapping highlight to idle");
            self.animation.reset();
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
    }
}

impl<S: FrameScheduler> Drop for RevealDriver<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FrameLog {
        next: i32,
        requested: Vec<FrameId>,
        cancelled: Vec<FrameId>,
    }

    #[derive(Clone, Default)]
    struct RecordingScheduler {
        log: Rc<RefCell<FrameLog>>,
        refuse: bool,
    }

    impl FrameScheduler for RecordingScheduler {
        fn request_frame(&mut self) -> Option<FrameId> {
            if self.refuse {
                return None;
            }
            let mut log = self.log.borrow_mut();
            log.next += 1;
            let id = FrameId(log.next);
            log.requested.push(id);
            Some(id)
        }

        fn cancel_frame(&mut self, id: FrameId) {
            self.log.borrow_mut().cancelled.push(id);
        }
    }

    #[test]
    fn test_nearest_index_tie_goes_low() {
        assert_eq!(nearest_index(&[0.0, 50.0, 100.0], 25.0), Some(0));
        assert_eq!(nearest_index(&[0.0, 50.0, 100.0], 75.0), Some(1));
        assert_eq!(nearest_index(&[0.0, 50.0, 100.0], 26.0), Some(1));
        assert_eq!(nearest_index(&[0.0, 50.0, 100.0], -40.0), Some(0));
        assert_eq!(nearest_index(&[0.0, 50.0, 100.0], 400.0), Some(2));
        assert_eq!(nearest_index(&[], 10.0), None);
    }

    #[test]
    fn test_viewport_mapping_identity() {
        let m = ViewportMapping {
            rect_left: 100.0,
            rect_width: 400.0,
            rect_height: 200.0,
            view_width: 400.0,
            view_height: 200.0,
        };
        assert_eq!(m.to_chart_x(150.0), 50.0);
    }

    #[test]
    fn test_viewport_mapping_letterboxed() {
        // viewBox 400x200 shown in 1000x200: scale 1, 300px bars each side
        let m = ViewportMapping {
            rect_left: 0.0,
            rect_width: 1000.0,
            rect_height: 200.0,
            view_width: 400.0,
            view_height: 200.0,
        };
        assert_eq!(m.to_chart_x(300.0), 0.0);
        assert_eq!(m.to_chart_x(700.0), 400.0);

        // viewBox shown at half size
        let half = ViewportMapping {
            rect_left: 10.0,
            rect_width: 200.0,
            rect_height: 100.0,
            view_width: 400.0,
            view_height: 200.0,
        };
        assert_eq!(half.to_chart_x(110.0), 200.0);
    }

    #[test]
    fn test_hover_snaps_progress() {
        let mut anim = RevealAnimation::new();
        anim.hover(4);
        assert_eq!(anim.progress(), 4.0);
        assert_eq!(anim.hovered_index(), Some(4));
        anim.hover(1);
        assert_eq!(anim.progress(), 1.0);
    }

    #[test]
    fn test_withdraw_terminates_at_zero() {
        let mut anim = RevealAnimation::new();
        anim.hover(5);
        assert!(anim.leave(true));

        let mut now = 1_000.0;
        let mut frames = 0;
        let mut last = anim.progress();
        while anim.step(now) {
            assert!(anim.progress() <= last);
            last = anim.progress();
            now += 16.0;
            frames += 1;
            assert!(frames < 1_000, "withdraw never settled");
        }

        assert_eq!(anim.progress(), 0.0);
        assert_eq!(anim.phase(), RevealPhase::Idle);
        // 5 points * 40ms = 200ms at 16ms per frame
        assert!(frames <= 14);
    }

    #[test]
    fn test_withdraw_eases_out() {
        let mut anim = RevealAnimation::new();
        anim.hover(10);
        anim.leave(true);

        assert!(anim.step(0.0));
        assert_eq!(anim.progress(), 10.0);
        // Halfway through 400ms: 1 - (0.5)^3 = 0.875 of the way home
        assert!(anim.step(200.0));
        assert!((anim.progress() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_leave_from_zero_needs_no_frames() {
        let mut anim = RevealAnimation::new();
        anim.hover(0);
        assert!(!anim.leave(true));
        assert_eq!(anim.phase(), RevealPhase::Idle);
    }

    #[test]
    fn test_leave_without_animation_snaps() {
        let mut anim = RevealAnimation::new();
        anim.hover(7);
        assert!(!anim.leave(false));
        assert_eq!(anim.progress(), 0.0);
    }

    #[test]
    fn test_driver_runs_frame_chain_to_completion() {
        let scheduler = RecordingScheduler::default();
        let log = scheduler.log.clone();
        let mut driver = RevealDriver::new(scheduler, true);

        driver.pointer_move(5);
        driver.pointer_leave();
        assert!(driver.is_animating());

        let mut now = 0.0;
        while driver.is_animating() {
            driver.on_frame(now);
            now += 16.0;
            assert!(now < 10_000.0);
        }

        assert_eq!(driver.progress(), 0.0);
        assert_eq!(driver.phase(), RevealPhase::Idle);
        let log = log.borrow();
        assert!(log.cancelled.is_empty());
        assert!(log.requested.len() > 1);
    }

    #[test]
    fn test_hover_cancels_withdraw() {
        let scheduler = RecordingScheduler::default();
        let log = scheduler.log.clone();
        let mut driver = RevealDriver::new(scheduler, true);

        driver.pointer_move(3);
        driver.pointer_leave();
        driver.on_frame(0.0);
        let in_flight = *log.borrow().requested.last().unwrap();

        driver.pointer_move(2);
        assert!(!driver.is_animating());
        assert_eq!(driver.progress(), 2.0);
        assert_eq!(log.borrow().cancelled, vec![in_flight]);
    }

    #[test]
    fn test_second_leave_never_doubles_loops() {
        let scheduler = RecordingScheduler::default();
        let log = scheduler.log.clone();
        let mut driver = RevealDriver::new(scheduler, true);

        driver.pointer_move(4);
        driver.pointer_leave();
        let first = *log.borrow().requested.last().unwrap();
        driver.pointer_leave();

        let log = log.borrow();
        assert_eq!(log.cancelled, vec![first]);
        assert_eq!(log.requested.len() - log.cancelled.len(), 1);
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let scheduler = RecordingScheduler::default();
        let log = scheduler.log.clone();
        {
            let mut driver = RevealDriver::new(scheduler, true);
            driver.pointer_move(6);
            driver.pointer_leave();
        }
        assert_eq!(log.borrow().cancelled.len(), 1);
    }

    #[test]
    fn test_refused_frame_snaps_to_idle() {
        let scheduler = RecordingScheduler {
            refuse: true,
            ..Default::default()
        };
        let mut driver = RevealDriver::new(scheduler, true);
        driver.pointer_move(6);
        driver.pointer_leave();
        assert!(!driver.is_animating());
        assert_eq!(driver.progress(), 0.0);
    }

    #[test]
    fn test_driver_without_animation() {
        let scheduler = RecordingScheduler::default();
        let log = scheduler.log.clone();
        let mut driver = RevealDriver::new(scheduler, false);
        driver.pointer_move(6);
        driver.pointer_leave();
        assert_eq!(driver.progress(), 0.0);
        assert!(log.borrow().requested.is_empty());
    }
}
