//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock, frame deltas, one-shot timers)
//! - Input events (pointer and keyboard to game events)
//! - Storage (LocalStorage on web, a JSON file natively)
//!
//! The wasm bindings for the web shell live in `web`.

pub mod input;
pub mod storage;
pub mod time;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use time::{Clock, FrameClock, ManualClock, SystemClock, TimerQueue};
