//! Presentation preferences
//!
//! Persisted in LocalStorage under `jj_theme` and `jj_sound`. The simulation
//! never reads these; it only requests a theme change through an event.

use serde::{Deserialize, Serialize};

/// Visual theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Xmas,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Xmas => "xmas",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            "xmas" | "christmas" => Some(Theme::Xmas),
            _ => None,
        }
    }

    /// Dark -> Light -> Xmas -> Dark
    pub fn next(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Xmas,
            Theme::Xmas => Theme::Dark,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// LocalStorage keys (used only in wasm32)
    #[allow(dead_code)]
    const THEME_KEY: &'static str = "jj_theme";
    #[allow(dead_code)]
    const SOUND_KEY: &'static str = "jj_sound";

    /// Advance to the next theme and return it
    pub fn cycle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        self.theme
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Build settings from raw stored values, falling back per field
    pub fn from_stored(theme: Option<&str>, sound: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            theme: theme.and_then(Theme::from_str).unwrap_or(defaults.theme),
            sound_enabled: sound
                .map(|s| s.trim() != "false")
                .unwrap_or(defaults.sound_enabled),
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::info!("Using default settings");
            return Self::default();
        };

        let theme = storage.get_item(Self::THEME_KEY).ok().flatten();
        let sound = storage.get_item(Self::SOUND_KEY).ok().flatten();
        let settings = Self::from_stored(theme.as_deref(), sound.as_deref());
        log::info!("Loaded settings: {:?}", settings);
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::THEME_KEY, self.theme.as_str());
            let _ = storage.set_item(
                Self::SOUND_KEY,
                if self.sound_enabled { "true" } else { "false" },
            );
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
