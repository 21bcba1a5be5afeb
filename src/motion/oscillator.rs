use crate::clock::Ticker;
use crate::cue::{CueCallback, CueSource, CueSubscribers, CueVector, EMITTED_CUE_LIMIT};
use std::f64::consts::TAU;

pub const OSCILLATOR_RATE_HZ: f64 = 30.0;
pub const DEFAULT_AMPLITUDE: f64 = 8.0;
const X_FREQUENCY_HZ: f64 = 0.11;
const Y_FREQUENCY_HZ: f64 = 0.17;

/// Decorative cue source: a slow Lissajous drift with no sensor input.
pub struct OscillatorCueSource {
    amplitude: f64,
    started_at: f64,
    cue: CueVector,
    ticker: Ticker,
    running: bool,
    subscribers: CueSubscribers,
}

impl OscillatorCueSource {
    pub fn new(amplitude: f64) -> Self {
        Self {
            amplitude: amplitude.abs().min(EMITTED_CUE_LIMIT),
            started_at: 0.0,
            cue: CueVector::ZERO,
            ticker: Ticker::with_rate(OSCILLATOR_RATE_HZ),
            running: false,
            subscribers: CueSubscribers::default(),
        }
    }

    /// Cue value at `elapsed` seconds after start.
    pub fn sample_at(&self, elapsed: f64) -> CueVector {
        CueVector::new(
            self.amplitude * (TAU * X_FREQUENCY_HZ * elapsed).sin(),
            self.amplitude * (TAU * Y_FREQUENCY_HZ * elapsed).sin(),
        )
        .clamped(EMITTED_CUE_LIMIT)
    }
}

impl Default for OscillatorCueSource {
    fn default() -> Self {
        Self::new(DEFAULT_AMPLITUDE)
    }
}

impl CueSource for OscillatorCueSource {
    fn subscribe(&mut self, callback: CueCallback) {
        self.subscribers.push(callback);
    }

    fn start(&mut self, now: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.started_at = now;
        self.ticker.arm(now);
        tracing::info!(amplitude = self.amplitude, "oscillator cue source started");
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.ticker.cancel();
        self.cue = CueVector::ZERO;
        self.subscribers.emit(self.cue);
        tracing::info!("oscillator cue source stopped");
    }

    fn poll(&mut self, now: f64) {
        if !self.running || self.ticker.due(now) == 0 {
            return;
        }
        self.cue = self.sample_at(now - self.started_at);
        self.subscribers.emit(self.cue);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn current(&self) -> CueVector {
        self.cue
    }
}
