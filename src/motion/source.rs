use crate::motion::sample::MotionSample;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};

/// Permission / availability signal published by a sample source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceAvailability {
    /// Not started or no answer yet.
    Unknown,
    /// Samples may arrive.
    Authorized,
    /// The user or platform refused access.
    Denied,
    /// The sensor cannot be reached right now.
    Unavailable,
}

/// Best-effort stream of motion samples.
///
/// Sources own permission handling and reconnection. A source that is denied
/// or unavailable simply yields no samples.
pub trait MotionSampleSource {
    fn start(&mut self);
    fn stop(&mut self);
    /// Samples delivered since the last call, oldest first.
    fn drain(&mut self) -> Vec<MotionSample>;
    fn availability(&self) -> SourceAvailability;
}

pub(crate) type SharedAvailability = Arc<Mutex<SourceAvailability>>;

pub(crate) fn read_availability(shared: &SharedAvailability) -> SourceAvailability {
    shared
        .lock()
        .map(|availability| *availability)
        .unwrap_or(SourceAvailability::Unavailable)
}

pub(crate) fn write_availability(shared: &SharedAvailability, next: SourceAvailability) {
    if let Ok(mut availability) = shared.lock() {
        if *availability != next {
            tracing::debug!(from = ?*availability, to = ?next, "motion source availability changed");
            *availability = next;
        }
    }
}

/// Producer half of [`channel_source`]. Can be moved to another thread.
#[derive(Clone)]
pub struct SampleFeed {
    tx: Sender<MotionSample>,
    availability: SharedAvailability,
}

impl SampleFeed {
    /// Deliver a sample. Returns `false` once the consumer is gone.
    pub fn push(&self, sample: MotionSample) -> bool {
        self.tx.send(sample).is_ok()
    }

    pub fn set_availability(&self, availability: SourceAvailability) {
        write_availability(&self.availability, availability);
    }
}

/// Source fed from an in-process channel.
pub struct ChannelSampleSource {
    rx: Receiver<MotionSample>,
    availability: SharedAvailability,
    active: bool,
}

/// Create a channel-backed source and the feed that drives it.
pub fn channel_source() -> (SampleFeed, ChannelSampleSource) {
    let (tx, rx) = channel();
    let availability = Arc::new(Mutex::new(SourceAvailability::Unknown));
    (
        SampleFeed {
            tx,
            availability: Arc::clone(&availability),
        },
        ChannelSampleSource {
            rx,
            availability,
            active: false,
        },
    )
}

impl ChannelSampleSource {
    fn take_pending(&mut self) -> Vec<MotionSample> {
        let mut samples = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(sample) => samples.push(sample),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        samples
    }
}

impl MotionSampleSource for ChannelSampleSource {
    fn start(&mut self) {
        // anything queued while stopped predates this run
        self.take_pending();
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
        self.take_pending();
    }

    fn drain(&mut self) -> Vec<MotionSample> {
        if !self.active {
            return Vec::new();
        }
        self.take_pending()
    }

    fn availability(&self) -> SourceAvailability {
        read_availability(&self.availability)
    }
}
