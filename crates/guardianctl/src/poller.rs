//! Periodic dashboard poller
//!
//! One timer task launches a fetch immediately and then once per interval.
//! Fetches run in their own tasks and may overlap. Each takes a sequence
//! number at launch; a result is published only if it is newer than the last
//! one published, so a slow response never overwrites a fresher one.
//!
//! Two locks guard publication. The state lock covers liveness, the sequence
//! check, the latest update and the watch channel; it is never held while a
//! callback runs. The callback lock is held for a whole dispatch, and `stop()`
//! takes it after clearing liveness, so once `stop()` returns nothing is
//! published again, even if a fetch launched earlier resolves afterwards. The
//! in-flight request itself is left to finish.
//!
//! Lock order is callbacks, then state.

use crate::source::{FallbackSource, Fetched};
use chrono::{DateTime, Utc};
use guardian_common::{ConfigError, DashboardSnapshot, DerivedState, FetchError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// One published poll result
#[derive(Debug, Clone, PartialEq)]
pub struct PollUpdate {
    /// Launch order of the fetch that produced this update
    pub seq: u64,
    pub snapshot: DashboardSnapshot,
    pub derived: DerivedState,
    /// Present when the snapshot came from the fixture
    pub fallback: Option<FetchError>,
    pub received_at: DateTime<Utc>,
}

impl PollUpdate {
    fn new(seq: u64, fetched: Fetched) -> Self {
        Self {
            seq,
            derived: DerivedState::from_snapshot(&fetched.snapshot),
            snapshot: fetched.snapshot,
            fallback: fetched.fallback,
            received_at: Utc::now(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

pub type UpdateCallback = Box<dyn Fn(&PollUpdate) + Send + Sync>;

struct PublishState {
    alive: bool,
    last_applied: u64,
    latest: Option<PollUpdate>,
    sender: Option<watch::Sender<Option<PollUpdate>>>,
}

struct Shared {
    source: Arc<FallbackSource>,
    next_seq: AtomicU64,
    callbacks: Mutex<Vec<UpdateCallback>>,
    state: Mutex<PublishState>,
}

impl Shared {
    fn new(source: Arc<FallbackSource>, sender: Option<watch::Sender<Option<PollUpdate>>>) -> Self {
        Self {
            source,
            next_seq: AtomicU64::new(0),
            callbacks: Mutex::new(Vec::new()),
            state: Mutex::new(PublishState {
                alive: true,
                last_applied: 0,
                latest: None,
                sender,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, PublishState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn callbacks(&self) -> MutexGuard<'_, Vec<UpdateCallback>> {
        self.callbacks.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_alive(&self) -> bool {
        self.state().alive
    }

    /// Spawn one fetch tagged with the next sequence number
    fn launch(self: &Arc<Self>) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let shared = Arc::clone(self);

        tokio::spawn(async move {
            debug!(seq, "Polling dashboard");
            let fetched = shared.source.fetch().await;
            shared.publish(seq, fetched);
        });
    }

    fn publish(&self, seq: u64, fetched: Fetched) {
        let callbacks = self.callbacks();

        let update = {
            let mut state = self.state();

            if !state.alive {
                debug!(seq, "Discarding poll result after stop");
                return;
            }

            if seq <= state.last_applied {
                debug!(
                    seq,
                    last_applied = state.last_applied,
                    "Discarding stale poll result"
                );
                return;
            }

            let update = PollUpdate::new(seq, fetched);
            state.last_applied = seq;
            state.latest = Some(update.clone());
            if let Some(sender) = &state.sender {
                sender.send_replace(Some(update.clone()));
            }
            update
        };

        for callback in callbacks.iter() {
            callback(&update);
        }
    }
}

/// Handle to a running poll loop
pub struct Poller {
    shared: Arc<Shared>,
    timer: Mutex<Option<JoinHandle<()>>>,
    interval: Duration,
}

impl Poller {
    /// Fetch now, then every `interval` until stopped.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(source: Arc<FallbackSource>, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::InvalidInterval);
        }

        let (sender, _) = watch::channel(None);
        let shared = Arc::new(Shared::new(source, Some(sender)));

        let timer_shared = Arc::clone(&shared);
        let timer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // First tick completes immediately.
                ticker.tick().await;
                if !timer_shared.is_alive() {
                    break;
                }
                timer_shared.launch();
            }
        });

        info!("Poller started (interval: {}ms)", interval.as_millis());

        Ok(Self {
            shared,
            timer: Mutex::new(Some(timer)),
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register a callback fired with every published update.
    ///
    /// Callbacks run one dispatch at a time. A callback may call `latest()`,
    /// `refresh()` and `is_running()`, but must not call `stop()` or
    /// `on_update()`, or drop the last handle to the poller: those wait for
    /// the running dispatch and would deadlock.
    pub fn on_update<F>(&self, callback: F)
    where
        F: Fn(&PollUpdate) + Send + Sync + 'static,
    {
        let mut callbacks = self.shared.callbacks();
        if self.shared.is_alive() {
            callbacks.push(Box::new(callback));
        }
    }

    /// Watch the latest update. `None` until the first fetch lands.
    ///
    /// The channel closes when the poller stops.
    pub fn subscribe(&self) -> watch::Receiver<Option<PollUpdate>> {
        let state = self.shared.state();
        match &state.sender {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = watch::channel(state.latest.clone());
                drop(sender);
                receiver
            }
        }
    }

    /// Most recently published update
    pub fn latest(&self) -> Option<PollUpdate> {
        self.shared.state().latest.clone()
    }

    /// Fetch once outside the regular schedule
    pub fn refresh(&self) {
        if self.shared.is_alive() {
            self.shared.launch();
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_alive()
    }

    /// Stop polling. Safe to call more than once.
    pub fn stop(&self) {
        {
            let mut state = self.shared.state();
            if !state.alive {
                return;
            }
            state.alive = false;
            state.sender = None;
        }
        // Waits for a dispatch already in progress
        self.shared.callbacks().clear();

        if let Some(timer) = self.timer.lock().unwrap_or_else(|e| e.into_inner()).take() {
            timer.abort();
        }

        info!("Poller stopped");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
