//! Player settings and preferences
//!
//! Persisted through the key-value store, separately from story progress.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError, keys};

/// Game settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Keep a trail of recent ball positions for rendering
    pub show_trail: bool,
    /// Shake the arena after a missed prediction
    pub screen_shake: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_trail: true,
            screen_shake: true,
        }
    }
}

/// Partial settings update; `None` fields are left unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub show_trail: Option<bool>,
    pub screen_shake: Option<bool>,
}

impl Settings {
    /// Apply a partial update
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(show_trail) = patch.show_trail {
            self.show_trail = show_trail;
        }
        if let Some(screen_shake) = patch.screen_shake {
            self.screen_shake = screen_shake;
        }
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match Self::try_load(store) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    fn try_load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<Self>, StorageError> {
        match store.get(keys::SETTINGS)? {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|_| StorageError::Corrupt {
                key: keys::SETTINGS,
                value: json,
            }),
            None => Ok(None),
        }
    }

    /// Save settings (best effort)
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        let result = serde_json::to_string(self)
            .map_err(StorageError::from)
            .and_then(|json| store.set(keys::SETTINGS, &json));
        match result {
            Ok(()) => log::debug!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {e}"),
        }
    }
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Pt,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Pt => "pt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Locale::En),
            "pt" => Some(Locale::Pt),
            _ => None,
        }
    }

    /// Load the saved locale, defaulting on missing or unknown values
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(keys::LOCALE) {
            Ok(Some(value)) => Self::parse(&value).unwrap_or_else(|| {
                log::warn!("Unknown locale {value:?}, using default");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Could not load locale: {e}");
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        if let Err(e) = store.set(keys::LOCALE, self.as_str()) {
            log::warn!("Could not save locale: {e}");
        }
    }
}
