/// One reading from the motion sample source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Seconds on the session clock (see [`crate::clock::Clock`]).
    pub timestamp: f64,
    /// Ground speed in units per second. Negative values mark a sensor error.
    pub speed: f64,
    /// Course over ground in `[0, 360)` degrees, `None` when unknown.
    pub heading: Option<f64>,
}

impl MotionSample {
    /// Build a sample, normalising the heading. Negative or non-finite
    /// headings are the sensor's way of saying "unknown".
    pub fn new(timestamp: f64, speed: f64, heading: Option<f64>) -> Self {
        let heading = heading
            .filter(|course| course.is_finite() && *course >= 0.0)
            .map(|course| course.rem_euclid(360.0));
        Self {
            timestamp,
            speed,
            heading,
        }
    }

    pub fn age(&self, now: f64) -> f64 {
        now - self.timestamp
    }
}

/// Shortest signed rotation from `from` to `to`, in `[-180, 180)` degrees.
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}
