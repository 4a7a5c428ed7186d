//! Light/dark theme resolution, application and persistence.
//!
//! DESIGN
//! ======
//! [`ThemeManager`] owns all theme policy and is generic over three seams:
//! where the explicit choice is stored ([`PreferenceStore`]), where the OS
//! preference comes from ([`ColorSchemeSource`]) and what gets painted
//! ([`ThemeSurface`]). The browser adapter in [`crate::dom`] implements the
//! seams against `web-sys`; tests implement them in memory.
//!
//! The rendered theme is the stored choice when one exists, otherwise the
//! live OS preference. Only [`ThemeManager::toggle_theme`] writes storage,
//! so a theme derived from the OS is never mistaken for a user choice.
//!
//! TRADE-OFFS
//! ==========
//! The active theme is read back from the root attribute instead of being
//! cached on the manager. The document stays the single source of truth and
//! the manager needs no interior mutability.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ThemeConfig;
use crate::error::StorageError;

/// The two palettes the page can render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Storage and attribute representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse the storage/attribute representation. Anything other than the
    /// exact `"light"` / `"dark"` strings is rejected.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable key-value storage for the explicit theme choice.
pub trait PreferenceStore {
    /// Read the raw value under `key`, `Ok(None)` when unset.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when storage cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when storage cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// OS-level color scheme signal.
pub trait ColorSchemeSource {
    /// `true` when the OS asks for a dark scheme. `false` when it asks for
    /// light or the signal is unavailable.
    fn prefers_dark(&self) -> bool;
}

/// The document elements a theme is painted onto.
///
/// Only the root element is required. Implementations treat the toggle
/// control, its icon and the meta color tag as optional and do nothing
/// when they are absent.
pub trait ThemeSurface {
    fn set_root_class(&self, class: &str, enabled: bool);
    fn root_attribute(&self, name: &str) -> Option<String>;
    fn set_root_attribute(&self, name: &str, value: &str);
    fn set_icon_class(&self, class: &str);
    fn set_toggle_pressed(&self, pressed: bool);
    fn set_meta_color(&self, color: &str);
    /// Remove `class` from the root element after `delay_ms`. Fire and
    /// forget: later theme changes do not cancel earlier removals.
    fn remove_root_class_after(&self, class: &str, delay_ms: u32);
}

/// Keeps the painted theme, the stored preference and the OS signal
/// consistent.
pub struct ThemeManager<S, C, D> {
    config: ThemeConfig,
    store: S,
    scheme: C,
    surface: D,
}

impl<S, C, D> ThemeManager<S, C, D>
where
    S: PreferenceStore,
    C: ColorSchemeSource,
    D: ThemeSurface,
{
    #[must_use]
    pub fn new(config: ThemeConfig, store: S, scheme: C, surface: D) -> Self {
        Self { config, store, scheme, surface }
    }

    #[must_use]
    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn scheme(&self) -> &C {
        &self.scheme
    }

    #[must_use]
    pub fn surface(&self) -> &D {
        &self.surface
    }

    /// The explicit user choice, if storage holds a recognized one.
    ///
    /// Read failures are logged and reported as "no choice".
    pub fn stored_preference(&self) -> Option<Theme> {
        match self.store.load(&self.config.storage_key) {
            Ok(raw) => raw.as_deref().and_then(Theme::from_wire),
            Err(err) => {
                log::warn!("theme preference unreadable: {err}");
                None
            }
        }
    }

    /// Whether the user has ever toggled the theme. Re-reads storage on
    /// every call.
    pub fn has_explicit_preference(&self) -> bool {
        self.stored_preference().is_some()
    }

    /// Stored choice if present, else the OS preference.
    pub fn resolve_initial_theme(&self) -> Theme {
        self.stored_preference()
            .unwrap_or_else(|| Theme::from_prefers_dark(self.scheme.prefers_dark()))
    }

    /// Paint `theme` onto the surface and optionally persist it.
    ///
    /// Idempotent: applying the same theme twice leaves the same state as
    /// applying it once.
    pub fn apply_theme(&self, theme: Theme, persist: bool) {
        let config = &self.config;
        let dark = theme.is_dark();
        log::debug!("applying theme {theme} (persist={persist})");

        self.surface.set_root_class(&config.transition_class, true);
        self.surface.set_root_class(&config.dark_class, dark);
        self.surface.set_root_class(&config.light_class, !dark);
        self.surface.set_root_attribute(&config.attribute, theme.as_str());

        let (icon, meta_color) = if dark {
            (&config.dark_icon, &config.dark_meta_color)
        } else {
            (&config.light_icon, &config.light_meta_color)
        };
        self.surface.set_icon_class(icon);
        self.surface.set_toggle_pressed(dark);
        self.surface.set_meta_color(meta_color);

        if persist {
            if let Err(err) = self.store.save(&config.storage_key, theme.as_str()) {
                log::warn!("theme preference not saved: {err}");
            }
        }

        self.surface
            .remove_root_class_after(&config.transition_class, config.transition_ms);
    }

    /// The theme currently painted on the root element, falling back to
    /// [`Self::resolve_initial_theme`] before anything has been applied.
    pub fn active_theme(&self) -> Theme {
        self.surface
            .root_attribute(&self.config.attribute)
            .as_deref()
            .and_then(Theme::from_wire)
            .unwrap_or_else(|| self.resolve_initial_theme())
    }

    /// Flip to the opposite theme and record it as the user's choice.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.active_theme().toggled();
        log::info!("theme toggled to {next}");
        self.apply_theme(next, true);
        next
    }

    /// React to an OS color scheme change.
    ///
    /// Ignored once the user has made an explicit choice, including one made
    /// after initialization. Returns the applied theme, if any.
    pub fn handle_system_change(&self, prefers_dark: bool) -> Option<Theme> {
        if self.has_explicit_preference() {
            log::debug!("ignoring OS scheme change; explicit preference stored");
            return None;
        }
        let theme = Theme::from_prefers_dark(prefers_dark);
        self.apply_theme(theme, false);
        Some(theme)
    }

    /// Resolve and paint the initial theme without persisting it.
    ///
    /// Must run before the toggle control and OS change listener are bound.
    pub fn initialize(&self) -> Theme {
        let theme = self.resolve_initial_theme();
        self.apply_theme(theme, false);
        theme
    }
}
