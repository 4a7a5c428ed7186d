//! # site-behavior
//!
//! WASM behavior layer for a static portfolio page: the light/dark theme
//! toggle, scroll-driven navigation aids, and animated stat counters.
//!
//! All decisions live in host-testable modules. The [`dom`] module is the
//! only code that talks to `web-sys`; it looks up elements, implements the
//! seams the core is generic over, and forwards browser events to named
//! operations.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`theme`] | `Theme` enum and the generic [`theme::ThemeManager`] |
//! | [`scroll`] | Progress, back-to-top, scroll-spy and anchor geometry |
//! | [`counter`] | Eased numeric counter model |
//! | [`config`] | Serde-backed configuration with defaults |
//! | [`error`] | Storage and config error types |
//! | [`consts`] | Default ids, class names, colors and timings |
//! | [`dom`] | Browser adapter and event wiring |

pub mod config;
pub mod consts;
pub mod counter;
pub mod dom;
pub mod error;
pub mod scroll;
pub mod theme;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

/// WASM entry point. Installs logging, then mounts every page behavior.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already installed");
    }
    dom::mount();
}
