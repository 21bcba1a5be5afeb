//! The cue vector shared by motion sources and renderers.

/// Bound applied to every cue the estimator emits.
pub const EMITTED_CUE_LIMIT: f64 = 16.0;
/// Bound applied to the spring-rendered cue.
pub const RENDERED_CUE_LIMIT: f64 = 18.0;

/// Smoothed 2-D displacement signal.
///
/// `x` encodes turning: a right turn yields negative `x` and shifts the dots
/// left. `y` encodes longitudinal acceleration: accelerating yields negative
/// `y` (dots move down), braking positive `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CueVector {
    pub x: f64,
    pub y: f64,
}

impl CueVector {
    pub const ZERO: CueVector = CueVector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp each axis into `[-limit, limit]`.
    pub fn clamped(self, limit: f64) -> Self {
        Self {
            x: clamped(self.x, -limit, limit),
            y: clamped(self.y, -limit, limit),
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

pub fn clamped(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

pub type CueCallback = Box<dyn FnMut(CueVector)>;

/// Fan-out list of cue subscribers.
#[derive(Default)]
pub struct CueSubscribers {
    callbacks: Vec<CueCallback>,
}

impl CueSubscribers {
    pub fn push(&mut self, callback: CueCallback) {
        self.callbacks.push(callback);
    }

    pub fn emit(&mut self, cue: CueVector) {
        for callback in self.callbacks.iter_mut() {
            callback(cue);
        }
    }
}

/// Anything that can drive the overlay dots.
///
/// The motion estimator and the decorative oscillator both implement this,
/// so a single renderer serves either variant. Every method runs on the UI
/// thread; `poll` is called once per frame and is where timers fire.
pub trait CueSource {
    /// Register a callback invoked on every emitted cue.
    fn subscribe(&mut self, callback: CueCallback);
    /// Begin producing cues. Idempotent.
    fn start(&mut self, now: f64);
    /// Stop producing cues, reset to zero and emit that zero once. Idempotent.
    fn stop(&mut self);
    /// Drive pending input and due timer ticks.
    fn poll(&mut self, now: f64);
    fn is_running(&self) -> bool;
    fn current(&self) -> CueVector;
}

#[cfg(test)]
mod tests {
    use super::{CueSubscribers, CueVector};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn clamped_bounds_each_axis_independently() {
        let cue = CueVector::new(-40.0, 3.0).clamped(16.0);
        assert_eq!(cue, CueVector::new(-16.0, 3.0));
    }

    #[test]
    fn subscribers_receive_every_emission_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = CueSubscribers::default();
        let sink = Rc::clone(&seen);
        subscribers.push(Box::new(move |cue| sink.borrow_mut().push(cue)));

        subscribers.emit(CueVector::new(1.0, 2.0));
        subscribers.emit(CueVector::ZERO);

        assert_eq!(
            *seen.borrow(),
            vec![CueVector::new(1.0, 2.0), CueVector::ZERO]
        );
    }
}
