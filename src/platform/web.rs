//! Web shell bindings
//!
//! The page owns the DOM, the animation loop and the ad SDK. It drives a
//! `WebGame` and renders from the JSON snapshot.

use wasm_bindgen::prelude::*;

use super::storage::LocalStorage;
use super::time::SystemClock;
use crate::Vector;
use crate::game::Game;
use crate::settings::{Locale, SettingsPatch};
use crate::sim::{GameEvent, GameMode};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already initialized: {e}").into());
    }
    log::info!("Future Ball starting...");
}

fn parse_mode(mode: &str) -> Option<GameMode> {
    match mode {
        "story" => Some(GameMode::Story),
        "arcade" => Some(GameMode::Arcade),
        _ => None,
    }
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<LocalStorage, SystemClock>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {seed}");
        WebGame {
            game: Game::new(LocalStorage::new(), SystemClock, seed),
        }
    }

    /// `"story"` or `"arcade"`; false if refused
    pub fn start_game(&mut self, mode: &str) -> bool {
        match parse_mode(mode) {
            Some(mode) => self.game.start_game(mode),
            None => {
                log::warn!("Unknown game mode {mode:?}");
                false
            }
        }
    }

    /// Call from `requestAnimationFrame` with its timestamp
    pub fn frame(&mut self, timestamp_ms: f64) {
        self.game.frame(timestamp_ms);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.game.resize(width, height);
    }

    /// Pointer click; `left`/`top` from the arena's bounding rect
    pub fn click(&mut self, client_x: f64, client_y: f64, left: f64, top: f64) {
        self.game
            .click(Vector::new(client_x, client_y), Vector::new(left, top));
    }

    /// Returns true when the key was consumed (call `preventDefault`)
    pub fn key(&mut self, key: &str) -> bool {
        self.game.key(key)
    }

    /// Any state machine event as JSON, e.g. `{"type":"nextLevel"}`
    pub fn dispatch(&mut self, event_json: &str) -> Result<(), JsValue> {
        let event: GameEvent =
            serde_json::from_str(event_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.game.dispatch(event);
        Ok(())
    }

    /// `{"showTrail":bool,"screenShake":bool}`, fields optional
    pub fn update_settings(&mut self, patch_json: &str) -> Result<(), JsValue> {
        let patch: SettingsPatch =
            serde_json::from_str(patch_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.game.update_settings(patch);
        Ok(())
    }

    pub fn watch_ad(&mut self) {
        self.game.watch_ad();
    }

    pub fn cancel_ad(&mut self) {
        self.game.cancel_ad();
    }

    pub fn complete_ad(&mut self) {
        self.game.complete_ad();
    }

    /// Full `AppState` as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.game.state()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn lives(&self) -> u32 {
        self.game.lives().lives()
    }

    pub fn max_lives(&self) -> u32 {
        self.game.lives().max_lives()
    }

    /// True while the next-life countdown should be shown
    pub fn is_regenerating(&self) -> bool {
        self.game.lives().is_regenerating()
    }

    /// Bonus story lives (e.g. a daily reward)
    pub fn add_lives(&mut self, amount: u32) {
        self.game.add_lives(amount);
    }

    pub fn time_to_next_life(&self) -> f64 {
        self.game.time_to_next_life_secs() as f64
    }

    pub fn saved_story_level(&self) -> u32 {
        self.game.saved_story_level()
    }

    pub fn locale(&self) -> String {
        self.game.locale().as_str().to_string()
    }

    pub fn set_locale(&mut self, locale: &str) {
        match Locale::parse(locale) {
            Some(locale) => self.game.set_locale(locale),
            None => log::warn!("Unknown locale {locale:?}"),
        }
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
