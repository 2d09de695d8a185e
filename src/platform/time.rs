//! Clocks and timers

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::MAX_FRAME_DELTA_MS;
use crate::sim::TimerKind;

/// Wall clock in milliseconds since the Unix epoch
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time: `Date.now()` on web, `SystemTime` natively
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock for tests and the headless demo
///
/// Clones share the same time, so a test can keep a handle while the game
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Turns animation-frame timestamps into tick deltas
///
/// The first frame after a reset only records its timestamp, so time spent
/// paused or hidden never reaches the simulation. Deltas are capped at
/// `MAX_FRAME_DELTA_MS`.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous frame, if there is one
    pub fn frame(&mut self, timestamp_ms: f64) -> Option<f64> {
        if !timestamp_ms.is_finite() {
            return None;
        }
        let last = self.last.replace(timestamp_ms)?;
        let delta = timestamp_ms - last;
        (delta > 0.0).then(|| delta.min(MAX_FRAME_DELTA_MS))
    }

    /// Forget the previous frame (animation stopped)
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn is_running(&self) -> bool {
        self.last.is_some()
    }
}

/// One-shot timers keyed by kind
///
/// Scheduling a kind that is already pending restarts it.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<(u64, TimerKind)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, now_ms: u64) {
        let deadline = now_ms.saturating_add(kind.duration_ms());
        self.pending.retain(|(_, k)| *k != kind);
        self.pending.push((deadline, kind));
    }

    /// Remove and return expired timers, earliest first
    pub fn take_due(&mut self, now_ms: u64) -> Vec<TimerKind> {
        let mut due: Vec<(u64, TimerKind)> = Vec::new();
        self.pending.retain(|&(deadline, kind)| {
            if deadline <= now_ms {
                due.push((deadline, kind));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, kind)| kind).collect()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|(deadline, _)| *deadline).min()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
