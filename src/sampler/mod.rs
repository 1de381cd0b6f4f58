//! Periodic sampling loop
//!
//! [`Sampler`] is the concurrency core of the crate: a single background
//! tokio task that polls the package temperature on a fixed interval, writes
//! one durable record per reading to the [`LogSink`], and feeds a bounded
//! [`RollingWindow`] for visualization.
//!
//! The loop's lifecycle is the state machine `Idle → Running → Stopping →
//! Idle`, held in an atomic so the background task observes a stop request
//! promptly. Cancellation is cooperative: the interval wait itself is a
//! `select!` over a watch channel and the ticker, so the worst-case stop
//! latency is one interval, never one interval plus unrelated blocking.
//!
//! Sensor failures during a poll are fatal by design. A temperature log with
//! silent gaps is worse than one that stops loudly, so the loop writes a
//! best-effort error record and halts, surfacing the error through
//! [`Sampler::stop`].

mod window;

pub use window::{RollingWindow, DEFAULT_WINDOW_CAPACITY};


use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::logsink::{LogRecord, LogSink};
use crate::sensor::SensorReader;
use crate::unit::TemperatureUnit;

/// Lifecycle state of the sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SamplerState {
    Idle = 0,
    Running = 1,
    Stopping = 2,
}

impl SamplerState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => SamplerState::Running,
            2 => SamplerState::Stopping,
            _ => SamplerState::Idle,
        }
    }
}

/// Cancellable periodic temperature sampler.
pub struct Sampler {
    reader: Arc<SensorReader>,
    sink: Arc<dyn LogSink>,
    state: Arc<AtomicU8>,
    window: Arc<Mutex<RollingWindow>>,
    stop_tx: Option<watch::Sender<bool>>,
    done_rx: watch::Receiver<bool>,
    done_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<Result<()>>>,
}

impl Sampler {
    /// Creates an idle sampler with the default window capacity.
    pub fn new(reader: Arc<SensorReader>, sink: Arc<dyn LogSink>) -> Self {
        Self::with_window_capacity(reader, sink, DEFAULT_WINDOW_CAPACITY)
    }

    /// Creates an idle sampler retaining at most `capacity` window entries.
    pub fn with_window_capacity(
        reader: Arc<SensorReader>,
        sink: Arc<dyn LogSink>,
        capacity: usize,
    ) -> Self {
        let (done_tx, done_rx) = watch::channel(false);
        Self {
            reader,
            sink,
            state: Arc::new(AtomicU8::new(SamplerState::Idle as u8)),
            window: Arc::new(Mutex::new(RollingWindow::new(capacity))),
            stop_tx: None,
            done_rx,
            done_tx,
            handle: None,
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SamplerState {
        SamplerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Point-in-time copy of the rolling window, oldest first.
    ///
    /// Readers never iterate the live buffer; the background task keeps
    /// exclusive mutation rights.
    pub fn window(&self) -> Vec<(DateTime<Local>, f64)> {
        self.window.lock().snapshot()
    }

    /// Receiver that flips to `true` when the background loop exits, for
    /// callers that want to notice a fatal halt without polling.
    pub fn done_signal(&self) -> watch::Receiver<bool> {
        self.done_rx.clone()
    }

    /// Starts the sampling loop.
    ///
    /// Transitions Idle → Running, emits a durable "monitoring" event, and
    /// spawns the background task. Each cycle reads the package temperature
    /// in `unit`, appends one temperature record to the sink, and pushes the
    /// reading into the rolling window.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `interval` is zero, the sampler is not
    /// idle, or a previous run has not been joined yet. A loop that halted
    /// on its own holds its error until [`stop`](Self::stop) or
    /// [`join`](Self::join) collects it; restarting must not discard it.
    pub fn start(&mut self, interval: Duration, unit: TemperatureUnit) -> Result<()> {
        if interval.is_zero() {
            return Err(Error::invalid_argument("sampling interval must be positive"));
        }
        if self.status() != SamplerState::Idle {
            return Err(Error::invalid_argument("sampler is already running"));
        }
        if self.handle.is_some() {
            return Err(Error::invalid_argument("previous sampling run has not been joined"));
        }

        self.sink.append(&LogRecord::event("Monitoring CPU temperature."))?;
        info!(interval_secs = interval.as_secs_f64(), %unit, "starting temperature sampling");

        let (stop_tx, stop_rx) = watch::channel(false);
        self.stop_tx = Some(stop_tx);
        let _ = self.done_tx.send(false);
        self.state.store(SamplerState::Running as u8, Ordering::SeqCst);

        let reader = Arc::clone(&self.reader);
        let sink = Arc::clone(&self.sink);
        let state = Arc::clone(&self.state);
        let window = Arc::clone(&self.window);
        let done_tx = self.done_tx.clone();

        self.handle = Some(tokio::spawn(async move {
            let result = sample_loop(reader, sink, Arc::clone(&state), window, interval, unit, stop_rx).await;
            state.store(SamplerState::Idle as u8, Ordering::SeqCst);
            let _ = done_tx.send(true);
            if let Err(ref e) = result {
                error!(error = %e, "sampling loop halted");
            }
            result
        }));
        Ok(())
    }

    /// Stops the sampling loop and waits for it to exit.
    ///
    /// Transitions Running → Stopping → Idle. The loop observes the stop
    /// signal within one poll interval, finishes any in-flight read, emits
    /// exactly one "stopped monitoring" event record, and exits. A sampler
    /// that is already idle stops trivially, returning any error the loop
    /// halted with.
    pub async fn stop(&mut self) -> Result<()> {
        if self.status() == SamplerState::Running {
            self.state.store(SamplerState::Stopping as u8, Ordering::SeqCst);
        }
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        self.join().await
    }

    /// Waits for the background task to finish and returns its outcome.
    pub async fn join(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => {
                handle.await.map_err(|e| Error::invalid_argument(format!("sampling task panicked: {e}")))?
            },
            None => Ok(()),
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn sample_loop(
    reader: Arc<SensorReader>,
    sink: Arc<dyn LogSink>,
    state: Arc<AtomicU8>,
    window: Arc<Mutex<RollingWindow>>,
    interval: Duration,
    unit: TemperatureUnit,
    mut stop_rx: watch::Receiver<bool>,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = stop_rx.changed() => break,
            _ = ticker.tick() => {
                if SamplerState::from_u8(state.load(Ordering::SeqCst)) != SamplerState::Running {
                    break;
                }
                if let Err(e) = sample_once(&reader, &sink, &window, unit) {
                    // Best-effort durable trace of why the loop died; the
                    // original failure is what propagates.
                    let _ = sink.append(&LogRecord::error(format!(
                        "sampling halted: {e}"
                    )));
                    return Err(e);
                }
            },
        }
    }

    sink.append(&LogRecord::event("Stopped monitoring CPU temperature."))?;
    info!("temperature sampling stopped");
    Ok(())
}

fn sample_once(
    reader: &SensorReader,
    sink: &Arc<dyn LogSink>,
    window: &Mutex<RollingWindow>,
    unit: TemperatureUnit,
) -> Result<()> {
    let sample = reader.package_sample()?;
    let value = unit.convert(sample.current);
    sink.append(&LogRecord::temperature(value))?;
    window.lock().push(Local::now(), value);
    Ok(())
}
