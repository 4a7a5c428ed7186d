//! Page behavior configuration.
//!
//! Every field has a default from [`crate::consts`], so a page only needs a
//! config block when it deviates from the stock markup. Partial documents
//! are accepted: `{"theme": {"transition_ms": 300}}` changes one value and
//! keeps the rest.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub theme: ThemeConfig,
    pub scroll: ScrollConfig,
    pub counter: CounterConfig,
}

impl SiteConfig {
    /// Parse a JSON config document, filling gaps from defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when `raw` is not valid JSON or a field
    /// has the wrong type.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse an optional config document, logging and falling back to
    /// defaults when it is malformed.
    #[must_use]
    pub fn from_optional_json(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::default();
        };
        match Self::from_json(raw) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }
}

/// Element ids, class names and colors used by the theme manager.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub toggle_id: String,
    pub icon_id: String,
    pub meta_selector: String,
    pub attribute: String,
    pub dark_class: String,
    pub light_class: String,
    pub transition_class: String,
    pub transition_ms: u32,
    pub dark_icon: String,
    pub light_icon: String,
    pub dark_meta_color: String,
    pub light_meta_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: THEME_STORAGE_KEY.to_owned(),
            toggle_id: THEME_TOGGLE_ID.to_owned(),
            icon_id: THEME_ICON_ID.to_owned(),
            meta_selector: THEME_META_SELECTOR.to_owned(),
            attribute: THEME_ATTRIBUTE.to_owned(),
            dark_class: DARK_CLASS.to_owned(),
            light_class: LIGHT_CLASS.to_owned(),
            transition_class: TRANSITION_CLASS.to_owned(),
            transition_ms: TRANSITION_MS,
            dark_icon: DARK_ICON.to_owned(),
            light_icon: LIGHT_ICON.to_owned(),
            dark_meta_color: DARK_META_COLOR.to_owned(),
            light_meta_color: LIGHT_META_COLOR.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub progress_bar_id: String,
    pub back_to_top_id: String,
    pub back_to_top_threshold_px: f64,
    pub visible_class: String,
    pub nav_link_selector: String,
    pub active_class: String,
    pub header_offset_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            progress_bar_id: PROGRESS_BAR_ID.to_owned(),
            back_to_top_id: BACK_TO_TOP_ID.to_owned(),
            back_to_top_threshold_px: BACK_TO_TOP_THRESHOLD_PX,
            visible_class: VISIBLE_CLASS.to_owned(),
            nav_link_selector: NAV_LINK_SELECTOR.to_owned(),
            active_class: ACTIVE_CLASS.to_owned(),
            header_offset_px: HEADER_OFFSET_PX,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub selector: String,
    pub target_attribute: String,
    pub suffix_attribute: String,
    pub duration_ms: f64,
    pub frame_ms: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: COUNTER_SELECTOR.to_owned(),
            target_attribute: COUNTER_TARGET_ATTRIBUTE.to_owned(),
            suffix_attribute: COUNTER_SUFFIX_ATTRIBUTE.to_owned(),
            duration_ms: COUNTER_DURATION_MS,
            frame_ms: COUNTER_FRAME_MS,
        }
    }
}
