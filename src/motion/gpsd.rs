use crate::motion::sample::MotionSample;
use crate::motion::source::{
    read_availability, write_availability, MotionSampleSource, SharedAvailability,
    SourceAvailability,
};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const DEFAULT_GPSD_ADDR: &str = "127.0.0.1:2947";
const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true}\n";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const READ_TIMEOUT: Duration = Duration::from_millis(250);
const RETRY_INTERVAL: Duration = Duration::from_secs(2);
const STOP_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Deserialize)]
struct GpsdReport {
    class: String,
    #[serde(default)]
    mode: Option<u8>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    track: Option<f64>,
}

/// Convert one line of gpsd JSON into a sample.
///
/// Only `TPV` reports with at least a 2D fix and both a time and a speed are
/// usable; everything else (VERSION, DEVICES, SKY, no-fix TPV) yields `None`.
pub fn parse_tpv(line: &str) -> Option<MotionSample> {
    let report: GpsdReport = serde_json::from_str(line.trim()).ok()?;
    if report.class != "TPV" || report.mode.unwrap_or(0) < 2 {
        return None;
    }
    let time = chrono::DateTime::parse_from_rfc3339(report.time.as_deref()?).ok()?;
    let timestamp = time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) * 1e-9;
    Some(MotionSample::new(timestamp, report.speed?, report.track))
}

/// Motion samples from a gpsd daemon.
///
/// A background thread owns the socket and forwards parsed samples over a
/// channel that [`MotionSampleSource::drain`] empties on the UI thread. The
/// thread reconnects on its own while the source is started.
pub struct GpsdSource {
    addr: String,
    availability: SharedAvailability,
    stop_flag: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
    rx: Option<Receiver<MotionSample>>,
}

impl GpsdSource {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            availability: Arc::new(Mutex::new(SourceAvailability::Unknown)),
            stop_flag: Arc::new(AtomicBool::new(false)),
            reader: None,
            rx: None,
        }
    }
}

impl MotionSampleSource for GpsdSource {
    fn start(&mut self) {
        if self.reader.is_some() {
            return;
        }
        let stop_flag = Arc::new(AtomicBool::new(false));
        let (tx, rx) = channel();
        let addr = self.addr.clone();
        let availability = Arc::clone(&self.availability);
        let thread_stop = Arc::clone(&stop_flag);

        match thread::Builder::new()
            .name("gpsd-reader".to_string())
            .spawn(move || run_reader(&addr, &tx, &availability, &thread_stop))
        {
            Ok(handle) => {
                self.stop_flag = stop_flag;
                self.reader = Some(handle);
                self.rx = Some(rx);
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to spawn gpsd reader thread");
                write_availability(&self.availability, SourceAvailability::Unavailable);
            }
        }
    }

    fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        self.rx = None;
        if let Some(handle) = self.reader.take() {
            reap_reader_thread(handle);
        }
        write_availability(&self.availability, SourceAvailability::Unknown);
    }

    fn drain(&mut self) -> Vec<MotionSample> {
        let Some(rx) = &self.rx else {
            return Vec::new();
        };
        let mut samples = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(sample) => samples.push(sample),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        samples
    }

    fn availability(&self) -> SourceAvailability {
        read_availability(&self.availability)
    }
}

impl Drop for GpsdSource {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}

// Joining happens off the UI thread; the reader exits within one read timeout.
fn reap_reader_thread(handle: JoinHandle<()>) {
    let _ = thread::Builder::new()
        .name("gpsd-reaper".to_string())
        .spawn(move || {
            if handle.join().is_err() {
                tracing::error!("gpsd reader thread panicked");
            }
        });
}

fn run_reader(
    addr: &str,
    tx: &Sender<MotionSample>,
    availability: &SharedAvailability,
    stop_flag: &AtomicBool,
) {
    while !stop_flag.load(Ordering::SeqCst) {
        match stream_reports(addr, tx, availability, stop_flag) {
            Ok(()) => {}
            Err(err) => {
                tracing::debug!(error = %err, addr, "gpsd connection unavailable");
            }
        }
        if stop_flag.load(Ordering::SeqCst) {
            break;
        }
        write_availability(availability, SourceAvailability::Unavailable);
        sleep_unless_stopped(RETRY_INTERVAL, stop_flag);
    }
}

fn sleep_unless_stopped(total: Duration, stop_flag: &AtomicBool) {
    let deadline = Instant::now() + total;
    while Instant::now() < deadline {
        if stop_flag.load(Ordering::SeqCst) {
            return;
        }
        thread::sleep(STOP_POLL);
    }
}

fn resolve(addr: &str) -> Result<SocketAddr> {
    addr.to_socket_addrs()
        .with_context(|| format!("invalid gpsd address {addr}"))?
        .next()
        .ok_or_else(|| anyhow!("gpsd address {addr} resolved to nothing"))
}

fn stream_reports(
    addr: &str,
    tx: &Sender<MotionSample>,
    availability: &SharedAvailability,
    stop_flag: &AtomicBool,
) -> Result<()> {
    let socket_addr = resolve(addr)?;
    let mut stream = TcpStream::connect_timeout(&socket_addr, CONNECT_TIMEOUT)
        .with_context(|| format!("connecting to gpsd at {addr}"))?;
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    stream.write_all(WATCH_COMMAND)?;
    write_availability(availability, SourceAvailability::Authorized);
    tracing::info!(addr, "connected to gpsd");

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    while !stop_flag.load(Ordering::SeqCst) {
        match reader.read_line(&mut line) {
            Ok(0) => return Err(anyhow!("gpsd closed the connection")),
            Ok(_) => {
                if let Some(sample) = parse_tpv(&line) {
                    if tx.send(sample).is_err() {
                        return Ok(());
                    }
                }
                line.clear();
            }
            // partial lines stay buffered until the rest arrives
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
