//! Cancelable timer tasks for the session driver.
//!
//! The session never sleeps. It reports whether its clock should be running
//! and whether a resolution is outstanding, and the [`Scheduler`] keeps at
//! most one task of each kind alive to match. Every message a task sends is
//! tagged with the generation it was scheduled for, so a task that outlives
//! its question is rejected by the session even if the abort raced it.

use std::time::Duration;
use strictly_millionaire::{GameSession, Generation, PendingResolution};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, instrument};

/// Countdown granularity.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A message from a scheduled task back to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// One second elapsed on the clock for this generation.
    Tick(Generation),
    /// The settle delay elapsed for the answer locked in at this generation.
    Resolve(Generation),
}

#[derive(Debug)]
struct Scheduled {
    generation: Generation,
    handle: JoinHandle<()>,
}

impl Scheduled {
    fn cancel(self) {
        debug!(generation = %self.generation, "Cancelling scheduled task");
        self.handle.abort();
    }
}

/// Owns the ticker and the pending resolution task.
#[derive(Debug)]
pub struct Scheduler {
    tx: mpsc::UnboundedSender<Timer>,
    ticker: Option<Scheduled>,
    resolution: Option<Scheduled>,
}

impl Scheduler {
    /// Creates a scheduler whose tasks report on `tx`.
    pub fn new(tx: mpsc::UnboundedSender<Timer>) -> Self {
        Self {
            tx,
            ticker: None,
            resolution: None,
        }
    }

    /// Generation of the running ticker, if any.
    pub fn ticker_generation(&self) -> Option<Generation> {
        self.ticker.as_ref().map(|t| t.generation)
    }

    /// Generation of the pending resolution, if any.
    pub fn resolution_generation(&self) -> Option<Generation> {
        self.resolution.as_ref().map(|r| r.generation)
    }

    /// Brings the running tasks in line with the session.
    ///
    /// Call after every operation on the session.
    #[instrument(skip_all, fields(generation = %session.generation(), phase = %session.phase()))]
    pub fn sync<R>(&mut self, session: &GameSession<R>) {
        let wanted_ticker = session.timer_running().then(|| session.generation());
        if self.ticker_generation() != wanted_ticker {
            if let Some(ticker) = self.ticker.take() {
                ticker.cancel();
            }
            if let Some(generation) = wanted_ticker {
                self.start_ticker(generation);
            }
        }

        let wanted_resolution = session.pending_resolution();
        if self.resolution_generation() != wanted_resolution.map(|p| p.generation) {
            if let Some(resolution) = self.resolution.take() {
                resolution.cancel();
            }
            if let Some(pending) = wanted_resolution {
                self.schedule_resolution(pending);
            }
        }
    }

    /// Aborts every outstanding task.
    pub fn cancel_all(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        if let Some(resolution) = self.resolution.take() {
            resolution.cancel();
        }
    }

    fn start_ticker(&mut self, generation: Generation) {
        debug!(%generation, "Starting ticker");
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Timer::Tick(generation)).is_err() {
                    break;
                }
            }
        });
        self.ticker = Some(Scheduled { generation, handle });
    }

    fn schedule_resolution(&mut self, pending: PendingResolution) {
        debug!(generation = %pending.generation, delay_ms = pending.delay.as_millis() as u64, "Scheduling resolution");
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(pending.delay).await;
            let _ = tx.send(Timer::Resolve(pending.generation));
        });
        self.resolution = Some(Scheduled {
            generation: pending.generation,
            handle,
        });
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
