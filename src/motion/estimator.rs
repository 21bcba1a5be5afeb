use crate::clock::Ticker;
use crate::cue::{clamped, CueCallback, CueSource, CueSubscribers, CueVector, EMITTED_CUE_LIMIT};
use crate::motion::sample::{shortest_angle_delta, MotionSample};
use crate::motion::source::MotionSampleSource;

/// Samples this old (seconds) are treated as delayed deliveries.
pub const MAX_SAMPLE_AGE: f64 = 10.0;
/// Exclusive lower bound on the time between a sample pair.
pub const MIN_SAMPLE_DT: f64 = 0.08;
/// Exclusive upper bound on the time between a sample pair.
pub const MAX_SAMPLE_DT: f64 = 3.0;
pub const MAX_ACCELERATION: f64 = 3.5;
pub const MAX_TURN_RATE: f64 = 30.0;
pub const TURN_GAIN: f64 = 0.45;
pub const ACCELERATION_GAIN: f64 = 4.5;
/// Weight kept from the previous cue on every accepted sample.
pub const SMOOTHING_RETAIN: f64 = 0.65;

pub const DECAY_RATE_HZ: f64 = 30.0;
/// Decay stays idle while a signal arrived within this many seconds.
pub const DECAY_HOLD: f64 = 0.7;
pub const DECAY_FACTOR: f64 = 0.88;
/// Below this magnitude on both axes the cue snaps to zero.
pub const DECAY_SNAP: f64 = 0.15;

/// What happened to a sample handed to [`MotionEstimator::ingest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// The estimator is stopped.
    Inactive,
    Stale,
    InvalidSpeed,
    /// First sample after start: stored as baseline only.
    Baseline,
    /// The pair was too close or too far apart; the sample is the new baseline.
    OutsideWindow { dt: f64 },
    Accepted(CueVector),
}

/// Converts raw speed/heading samples into a smoothed, bounded cue vector.
///
/// Samples arrive through a [`MotionSampleSource`]; a 30 Hz decay timer
/// relaxes the cue toward zero when no fresh signal has arrived. Everything
/// runs on the caller's thread from [`CueSource::poll`].
pub struct MotionEstimator {
    source: Box<dyn MotionSampleSource>,
    previous: Option<MotionSample>,
    cue: CueVector,
    last_signal_at: Option<f64>,
    decay: Ticker,
    running: bool,
    subscribers: CueSubscribers,
}

impl MotionEstimator {
    pub fn new(source: Box<dyn MotionSampleSource>) -> Self {
        Self {
            source,
            previous: None,
            cue: CueVector::ZERO,
            last_signal_at: None,
            decay: Ticker::with_rate(DECAY_RATE_HZ),
            running: false,
            subscribers: CueSubscribers::default(),
        }
    }

    pub fn cue(&self) -> CueVector {
        self.cue
    }

    #[cfg(test)]
    pub(crate) fn has_baseline(&self) -> bool {
        self.previous.is_some()
    }

    /// Run one sample through the acceptance pipeline.
    pub fn ingest(&mut self, sample: MotionSample, now: f64) -> SampleOutcome {
        if !self.running {
            return SampleOutcome::Inactive;
        }
        if !sample.timestamp.is_finite() || sample.age(now) >= MAX_SAMPLE_AGE {
            tracing::debug!(age = sample.age(now), "dropping stale motion sample");
            return SampleOutcome::Stale;
        }
        if !sample.speed.is_finite() || sample.speed < 0.0 {
            tracing::debug!(speed = sample.speed, "dropping motion sample with invalid speed");
            return SampleOutcome::InvalidSpeed;
        }

        let Some(previous) = self.previous.replace(sample) else {
            return SampleOutcome::Baseline;
        };

        let dt = sample.timestamp - previous.timestamp;
        if !(dt > MIN_SAMPLE_DT && dt < MAX_SAMPLE_DT) {
            tracing::debug!(dt, "motion sample pair outside derivative window");
            return SampleOutcome::OutsideWindow { dt };
        }

        let acceleration = clamped(
            (sample.speed - previous.speed) / dt,
            -MAX_ACCELERATION,
            MAX_ACCELERATION,
        );
        let turn_rate = match (previous.heading, sample.heading) {
            (Some(from), Some(to)) => clamped(
                shortest_angle_delta(from, to) / dt,
                -MAX_TURN_RATE,
                MAX_TURN_RATE,
            ),
            _ => 0.0,
        };

        // accelerate -> dots down, brake -> up, left turn -> right, right turn -> left
        let target = CueVector::new(-turn_rate * TURN_GAIN, -acceleration * ACCELERATION_GAIN)
            .clamped(EMITTED_CUE_LIMIT);

        let smoothed = CueVector::new(
            self.cue.x * SMOOTHING_RETAIN + target.x * (1.0 - SMOOTHING_RETAIN),
            self.cue.y * SMOOTHING_RETAIN + target.y * (1.0 - SMOOTHING_RETAIN),
        )
        .clamped(EMITTED_CUE_LIMIT);
        if !smoothed.is_finite() {
            return SampleOutcome::InvalidSpeed;
        }

        self.cue = smoothed;
        self.last_signal_at = Some(now);
        self.subscribers.emit(self.cue);
        SampleOutcome::Accepted(self.cue)
    }

    /// One decay step. Returns the emitted cue, or `None` while the hold
    /// window after the last signal is still open.
    pub fn decay_tick(&mut self, now: f64) -> Option<CueVector> {
        if !self.running {
            return None;
        }
        if let Some(last_signal_at) = self.last_signal_at {
            if now - last_signal_at <= DECAY_HOLD {
                return None;
            }
        }

        self.cue = self.cue.scaled(DECAY_FACTOR);
        if self.cue.x.abs() < DECAY_SNAP && self.cue.y.abs() < DECAY_SNAP {
            self.cue = CueVector::ZERO;
        }
        self.subscribers.emit(self.cue);
        Some(self.cue)
    }
}

impl CueSource for MotionEstimator {
    fn subscribe(&mut self, callback: CueCallback) {
        self.subscribers.push(callback);
    }

    fn start(&mut self, now: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.source.start();
        self.decay.arm(now);
        tracing::info!(availability = ?self.source.availability(), "motion estimator started");
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.source.stop();
        self.decay.cancel();
        // a restart must not compare against a pre-stop timestamp
        self.previous = None;
        self.last_signal_at = None;
        self.cue = CueVector::ZERO;
        self.subscribers.emit(self.cue);
        tracing::info!("motion estimator stopped");
    }

    fn poll(&mut self, now: f64) {
        if !self.running {
            return;
        }
        for sample in self.source.drain() {
            self.ingest(sample, now);
        }
        let due = self.decay.due(now);
        for _ in 0..due {
            if !self.decay.is_armed() {
                break;
            }
            self.decay_tick(now);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn current(&self) -> CueVector {
        self.cue
    }
}

#[cfg(test)]
mod tests {
    use super::{MotionEstimator, SampleOutcome};
    use crate::cue::{CueSource, CueVector};
    use crate::motion::sample::MotionSample;
    use crate::motion::source::{channel_source, SampleFeed};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn estimator() -> (SampleFeed, MotionEstimator) {
        let (feed, source) = channel_source();
        (feed, MotionEstimator::new(Box::new(source)))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn acceleration_scenario_matches_reference_values() {
        let (_feed, mut est) = estimator();
        est.start(0.0);
        assert_eq!(
            est.ingest(MotionSample::new(0.0, 10.0, Some(0.0)), 0.0),
            SampleOutcome::Baseline
        );
        let SampleOutcome::Accepted(cue) = est.ingest(MotionSample::new(0.5, 14.0, Some(0.0)), 0.5)
        else {
            panic!("second sample should be accepted");
        };
        assert!(approx(cue.x, 0.0));
        assert!(approx(cue.y, -5.5125), "unexpected y {}", cue.y);
    }

    #[test]
    fn right_turn_shifts_cue_left() {
        let (_feed, mut est) = estimator();
        est.start(0.0);
        est.ingest(MotionSample::new(0.0, 10.0, Some(350.0)), 0.0);
        let SampleOutcome::Accepted(cue) = est.ingest(MotionSample::new(1.0, 10.0, Some(10.0)), 1.0)
        else {
            panic!("pair should be accepted");
        };
        // 20 deg/s right turn -> target x = -9, smoothed = -3.15
        assert!(approx(cue.x, -3.15), "unexpected x {}", cue.x);
        assert!(approx(cue.y, 0.0));
    }

    #[test]
    fn unknown_heading_contributes_no_turn() {
        let (_feed, mut est) = estimator();
        est.start(0.0);
        est.ingest(MotionSample::new(0.0, 10.0, Some(0.0)), 0.0);
        let SampleOutcome::Accepted(cue) = est.ingest(MotionSample::new(1.0, 10.0, None), 1.0)
        else {
            panic!("pair should be accepted");
        };
        assert_eq!(cue, CueVector::ZERO);
    }

    #[test]
    fn out_of_window_pair_keeps_cue_but_moves_baseline() {
        let (_feed, mut est) = estimator();
        est.start(0.0);
        est.ingest(MotionSample::new(0.0, 10.0, None), 0.0);
        assert_eq!(
            est.ingest(MotionSample::new(0.05, 20.0, None), 0.05),
            SampleOutcome::OutsideWindow { dt: 0.05 }
        );
        assert_eq!(est.cue(), CueVector::ZERO);

        // compared against t=0.05, not t=0
        let SampleOutcome::Accepted(cue) = est.ingest(MotionSample::new(1.05, 21.0, None), 1.05)
        else {
            panic!("pair should be accepted");
        };
        assert!(approx(cue.y, -1.0 * 4.5 * 0.35));
    }

    #[test]
    fn window_bounds_are_exclusive() {
        for dt in [0.08, 3.0] {
            let (_feed, mut est) = estimator();
            est.start(0.0);
            est.ingest(MotionSample::new(0.0, 10.0, None), 0.0);
            assert_eq!(
                est.ingest(MotionSample::new(dt, 12.0, None), dt),
                SampleOutcome::OutsideWindow { dt }
            );
            assert_eq!(est.cue(), CueVector::ZERO);
        }

        let (_feed, mut est) = estimator();
        est.start(0.0);
        est.ingest(MotionSample::new(0.0, 10.0, None), 0.0);
        assert!(matches!(
            est.ingest(MotionSample::new(2.9, 10.0, None), 2.9),
            SampleOutcome::Accepted(_)
        ));
    }

    #[test]
    fn long_gap_becomes_new_baseline() {
        let (_feed, mut est) = estimator();
        est.start(0.0);
        est.ingest(MotionSample::new(0.0, 0.0, None), 0.0);
        assert_eq!(
            est.ingest(MotionSample::new(3.5, 30.0, None), 3.5),
            SampleOutcome::OutsideWindow { dt: 3.5 }
        );
        assert_eq!(est.cue(), CueVector::ZERO);

        // 1 m/s^2 against t=3.5; against t=0 it would clamp at 3.5 m/s^2
        let SampleOutcome::Accepted(cue) = est.ingest(MotionSample::new(4.5, 31.0, None), 4.5)
        else {
            panic!("pair should be accepted");
        };
        assert!(approx(cue.y, -1.0 * 4.5 * 0.35));
    }

    #[test]
    fn staleness_boundary_is_ten_seconds() {
        let (_feed, mut est) = estimator();
        est.start(100.0);
        assert_eq!(
            est.ingest(MotionSample::new(90.0, 5.0, None), 100.0),
            SampleOutcome::Stale
        );
        assert_eq!(
            est.ingest(MotionSample::new(90.01, 5.0, None), 100.0),
            SampleOutcome::Baseline
        );
        assert!(est.has_baseline());
    }

    #[test]
    fn stale_and_negative_samples_are_rejected_without_touching_baseline() {
        let (_feed, mut est) = estimator();
        est.start(100.0);
        assert_eq!(
            est.ingest(MotionSample::new(90.0, 5.0, None), 100.0),
            SampleOutcome::Stale
        );
        assert_eq!(
            est.ingest(MotionSample::new(99.0, -1.0, None), 100.0),
            SampleOutcome::InvalidSpeed
        );
        assert!(!est.has_baseline());
    }

    #[test]
    fn decay_waits_for_hold_window_then_snaps_to_zero() {
        let (_feed, mut est) = estimator();
        est.start(0.0);
        est.ingest(MotionSample::new(0.0, 10.0, None), 0.0);
        est.ingest(MotionSample::new(0.5, 14.0, None), 0.5);

        assert_eq!(est.decay_tick(1.0), None);

        let mut previous = est.cue().magnitude();
        let mut now = 1.3;
        loop {
            let cue = est.decay_tick(now).expect("decay should run after hold");
            let magnitude = cue.magnitude();
            assert!(magnitude < previous || cue.is_zero());
            previous = magnitude;
            now += 1.0 / 30.0;
            if cue.is_zero() {
                break;
            }
        }
        assert_eq!(est.decay_tick(now), Some(CueVector::ZERO));
    }

    #[test]
    fn stop_emits_zero_once_and_clears_baseline() {
        let (_feed, mut est) = estimator();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        est.subscribe(Box::new(move |cue| sink.borrow_mut().push(cue)));

        est.start(0.0);
        est.ingest(MotionSample::new(0.0, 10.0, None), 0.0);
        est.ingest(MotionSample::new(0.5, 14.0, None), 0.5);
        est.stop();
        est.stop();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(*seen.last().expect("zero emitted"), CueVector::ZERO);
        assert!(!est.has_baseline());
        assert_eq!(
            est.ingest(MotionSample::new(1.0, 1.0, None), 1.0),
            SampleOutcome::Inactive
        );
    }

    #[test]
    fn poll_drains_feed_and_runs_due_decay_ticks() {
        let (feed, mut est) = estimator();
        est.start(0.0);
        feed.push(MotionSample::new(0.0, 10.0, None));
        feed.push(MotionSample::new(0.5, 14.0, None));
        est.poll(0.5);
        assert!(est.cue().y < 0.0);

        let before = est.cue().magnitude();
        est.poll(2.0);
        assert!(est.cue().magnitude() < before);
    }
}
