pub mod estimator;
pub mod gpsd;
pub mod oscillator;
pub mod sample;
pub mod source;

pub use estimator::{MotionEstimator, SampleOutcome};
pub use oscillator::OscillatorCueSource;
pub use sample::MotionSample;
pub use source::{channel_source, MotionSampleSource, SampleFeed, SourceAvailability};
