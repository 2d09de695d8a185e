//! Story mode life system
//!
//! Lives regenerate one per interval since `last_used_ms`, capped at the
//! maximum. The timestamp advances by whole intervals only, so partial
//! progress toward the next life survives restarts.

use serde::{Deserialize, Serialize};

use crate::consts::{LIFE_REGEN_MS, MAX_LIVES};
use crate::persistence::{self, KeyValueStore, keys};

/// Life system tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeConfig {
    pub max_lives: u32,
    pub regen_interval_ms: u64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            max_lives: MAX_LIVES,
            regen_interval_ms: LIFE_REGEN_MS,
        }
    }
}

/// Catch up on lives regenerated between `last_used_ms` and `now_ms`
///
/// Returns the new `(lives, last_used_ms)`. Calling it again with the same
/// `now_ms` changes nothing.
pub fn regenerate(lives: u32, last_used_ms: u64, now_ms: u64, config: &LifeConfig) -> (u32, u64) {
    if lives >= config.max_lives || config.regen_interval_ms == 0 {
        return (lives, last_used_ms);
    }

    let intervals = now_ms.saturating_sub(last_used_ms) / config.regen_interval_ms;
    if intervals == 0 {
        return (lives, last_used_ms);
    }

    let gained = u32::try_from(intervals).unwrap_or(u32::MAX);
    let lives = lives.saturating_add(gained).min(config.max_lives);
    (lives, last_used_ms + intervals * config.regen_interval_ms)
}

/// Regenerating life counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeSystem {
    config: LifeConfig,
    lives: u32,
    last_used_ms: u64,
}

impl LifeSystem {
    pub fn new(config: LifeConfig, lives: u32, last_used_ms: u64) -> Self {
        Self {
            config,
            lives: lives.min(config.max_lives),
            last_used_ms,
        }
    }

    /// Full lives, timer anchored at `now_ms`
    pub fn full(config: LifeConfig, now_ms: u64) -> Self {
        Self::new(config, config.max_lives, now_ms)
    }

    /// Restore from storage and catch up on regeneration
    ///
    /// Missing or corrupt values fall back to full lives and `now_ms`.
    pub fn load<S: KeyValueStore + ?Sized>(store: &mut S, config: LifeConfig, now_ms: u64) -> Self {
        let lives = persistence::load_or(&*store, keys::LIVES, config.max_lives);
        let last_used_ms = persistence::load_or(&*store, keys::LAST_USED_TIMESTAMP, now_ms);
        let mut system = Self::new(config, lives, last_used_ms);
        if system.catch_up(now_ms) {
            log::info!("Regenerated lives while away: now {}", system.lives);
            system.save(store);
        }
        system
    }

    /// Persist current lives and timestamp (best effort)
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        persistence::save(store, keys::LIVES, self.lives);
        persistence::save(store, keys::LAST_USED_TIMESTAMP, self.last_used_ms);
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.config.max_lives
    }

    pub fn last_used_ms(&self) -> u64 {
        self.last_used_ms
    }

    pub fn is_max_lives(&self) -> bool {
        self.lives >= self.config.max_lives
    }

    pub fn is_regenerating(&self) -> bool {
        !self.is_max_lives()
    }

    /// Apply regeneration up to `now_ms`; true if anything changed
    pub fn catch_up(&mut self, now_ms: u64) -> bool {
        let (lives, last_used_ms) = regenerate(self.lives, self.last_used_ms, now_ms, &self.config);
        let changed = lives != self.lives || last_used_ms != self.last_used_ms;
        self.lives = lives;
        self.last_used_ms = last_used_ms;
        changed
    }

    /// Spend a life
    ///
    /// The regeneration timer only starts when leaving the full state, so a
    /// second loss keeps the running timer.
    pub fn use_life(&mut self, now_ms: u64) {
        if self.lives == 0 {
            return;
        }
        let was_full = self.is_max_lives();
        self.lives -= 1;
        if was_full {
            self.last_used_ms = now_ms;
        }
    }

    /// Grant lives (capped); reaching the cap re-anchors the timer
    pub fn add_life(&mut self, amount: u32, now_ms: u64) {
        self.lives = self.lives.saturating_add(amount).min(self.config.max_lives);
        if self.is_max_lives() {
            self.last_used_ms = now_ms;
        }
    }

    /// Refill to the maximum (rewarded ad)
    pub fn refill_lives(&mut self, now_ms: u64) {
        self.lives = self.config.max_lives;
        self.last_used_ms = now_ms;
    }

    /// Whole seconds until the next life, rounded up; zero when full
    pub fn time_to_next_life_secs(&self, now_ms: u64) -> u64 {
        if self.is_max_lives() || self.config.regen_interval_ms == 0 {
            return 0;
        }
        let elapsed = now_ms.saturating_sub(self.last_used_ms);
        let remaining = self.config.regen_interval_ms - elapsed % self.config.regen_interval_ms;
        remaining.div_ceil(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    const MIN: u64 = 60 * 1000;

    fn config() -> LifeConfig {
        LifeConfig::default()
    }

    #[test]
    fn test_regenerate_whole_intervals_only() {
        // 25 minutes: two lives, timestamp advances by 20 minutes
        let (lives, ts) = regenerate(1, 1_000, 1_000 + 25 * MIN, &config());
        assert_eq!(lives, 3);
        assert_eq!(ts, 1_000 + 20 * MIN);
    }

    #[test]
    fn test_regenerate_caps_at_max() {
        let (lives, ts) = regenerate(3, 0, 100 * MIN, &config());
        assert_eq!(lives, MAX_LIVES);
        assert_eq!(ts, 100 * MIN);
    }

    #[test]
    fn test_regenerate_full_is_untouched() {
        assert_eq!(regenerate(5, 123, 999 * MIN, &config()), (5, 123));
    }

    #[test]
    fn test_regenerate_clock_behind_timestamp() {
        assert_eq!(regenerate(2, 50 * MIN, 10 * MIN, &config()), (2, 50 * MIN));
    }

    #[test]
    fn test_use_life_starts_timer_only_from_full() {
        let mut lives = LifeSystem::full(config(), 0);
        lives.use_life(5 * MIN);
        assert_eq!(lives.lives(), 4);
        assert_eq!(lives.last_used_ms(), 5 * MIN);

        lives.use_life(7 * MIN);
        assert_eq!(lives.lives(), 3);
        assert_eq!(lives.last_used_ms(), 5 * MIN);
    }

    #[test]
    fn test_use_life_floors_at_zero() {
        let mut lives = LifeSystem::new(config(), 0, 10);
        lives.use_life(20);
        assert_eq!(lives.lives(), 0);
        assert_eq!(lives.last_used_ms(), 10);
    }

    #[test]
    fn test_refill_and_add() {
        let mut lives = LifeSystem::new(config(), 1, 0);
        lives.add_life(2, 3 * MIN);
        assert_eq!(lives.lives(), 3);
        assert_eq!(lives.last_used_ms(), 0);

        lives.add_life(10, 4 * MIN);
        assert_eq!(lives.lives(), MAX_LIVES);
        assert_eq!(lives.last_used_ms(), 4 * MIN);

        let mut lives = LifeSystem::new(config(), 0, 0);
        lives.refill_lives(9 * MIN);
        assert!(lives.is_max_lives());
        assert_eq!(lives.last_used_ms(), 9 * MIN);
    }

    #[test]
    fn test_time_to_next_life() {
        let mut lives = LifeSystem::full(config(), 0);
        assert_eq!(lives.time_to_next_life_secs(0), 0);
        lives.use_life(0);
        assert_eq!(lives.time_to_next_life_secs(0), 600);
        assert_eq!(lives.time_to_next_life_secs(1), 600);
        assert_eq!(lives.time_to_next_life_secs(1_000), 599);
        assert_eq!(lives.time_to_next_life_secs(9 * MIN + 59_500), 1);
    }

    #[test]
    fn test_load_defaults_and_catch_up() {
        let mut store = MemoryStore::new();
        let lives = LifeSystem::load(&mut store, config(), 42);
        assert_eq!(lives.lives(), MAX_LIVES);
        assert_eq!(lives.last_used_ms(), 42);

        persistence::save(&mut store, keys::LIVES, 2u32);
        persistence::save(&mut store, keys::LAST_USED_TIMESTAMP, 0u64);
        let lives = LifeSystem::load(&mut store, config(), 15 * MIN);
        assert_eq!(lives.lives(), 3);
        assert_eq!(lives.last_used_ms(), 10 * MIN);
        // Catch-up was written back
        assert_eq!(persistence::load_or(&store, keys::LIVES, 0u32), 3);
    }

    #[test]
    fn test_load_clamps_out_of_range_lives() {
        let mut store = MemoryStore::new();
        persistence::save(&mut store, keys::LIVES, 99u32);
        let lives = LifeSystem::load(&mut store, config(), 0);
        assert_eq!(lives.lives(), MAX_LIVES);
    }

    proptest! {
        #[test]
        fn prop_regenerate_is_idempotent(
            lives in 0u32..=5,
            last in 0u64..1_000_000_000,
            elapsed in 0u64..1_000_000_000,
        ) {
            let now = last + elapsed;
            let once = regenerate(lives, last, now, &config());
            let twice = regenerate(once.0, once.1, now, &config());
            prop_assert_eq!(once, twice);
            prop_assert!(once.0 <= MAX_LIVES);
            prop_assert!(once.1 <= now);
        }
    }
}
