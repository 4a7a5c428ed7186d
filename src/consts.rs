//! Default ids, class names, colors and timings for the page behaviors.

// ── Theme ───────────────────────────────────────────────────────

/// `localStorage` key holding the explicit theme choice.
pub const THEME_STORAGE_KEY: &str = "site-theme";

/// Media query for the OS-level dark preference.
pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

pub const THEME_TOGGLE_ID: &str = "theme-toggle";
pub const THEME_ICON_ID: &str = "theme-icon";
pub const THEME_META_SELECTOR: &str = "meta[name=\"theme-color\"]";

pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const DARK_CLASS: &str = "theme-dark";
pub const LIGHT_CLASS: &str = "theme-light";

/// Marker class enabling the CSS palette fade.
pub const TRANSITION_CLASS: &str = "theme-transition";

/// How long the transition marker stays on the root element.
pub const TRANSITION_MS: u32 = 600;

/// Icon shown while dark is active: offers a switch back to light.
pub const DARK_ICON: &str = "bi bi-sun-fill";

/// Icon shown while light is active: offers a switch to dark.
pub const LIGHT_ICON: &str = "bi bi-moon-stars-fill";

/// Mobile browser chrome color while dark is active.
pub const DARK_META_COLOR: &str = "#000000";

/// Mobile browser chrome color while light is active.
pub const LIGHT_META_COLOR: &str = "#0d9488";

// ── Scroll ──────────────────────────────────────────────────────

pub const PROGRESS_BAR_ID: &str = "scroll-progress";
pub const BACK_TO_TOP_ID: &str = "back-to-top";

/// Scroll distance in pixels past which the back-to-top control shows.
pub const BACK_TO_TOP_THRESHOLD_PX: f64 = 300.0;

pub const VISIBLE_CLASS: &str = "show";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const ACTIVE_CLASS: &str = "active";

/// Height of the fixed header; anchors land this far below the viewport top.
pub const HEADER_OFFSET_PX: f64 = 70.0;

// ── Counters ────────────────────────────────────────────────────

pub const COUNTER_SELECTOR: &str = "[data-counter]";
pub const COUNTER_TARGET_ATTRIBUTE: &str = "data-counter";
pub const COUNTER_SUFFIX_ATTRIBUTE: &str = "data-suffix";
pub const COUNTER_DURATION_MS: f64 = 2000.0;
pub const COUNTER_FRAME_MS: u32 = 16;

// ── Config ──────────────────────────────────────────────────────

/// Id of the optional `<script type="application/json">` config block.
pub const CONFIG_ELEMENT_ID: &str = "site-config";
