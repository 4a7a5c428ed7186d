//! Browser adapter: element lookup, seam implementations and event wiring.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the only module that touches `web-sys`. It implements the theme
//! seams against `localStorage`, `matchMedia` and the document, then binds
//! clicks, scrolls and OS scheme changes to the named operations in
//! [`crate::theme`], [`crate::scroll`] and [`crate::counter`]. Handlers hold
//! no policy of their own.
//!
//! Event closures live for the page lifetime and are leaked with
//! `Closure::forget`. DOM call failures are logged at `debug` and ignored.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, MediaQueryList, MediaQueryListEvent, ScrollBehavior,
    ScrollToOptions, Storage, Window,
};

use crate::config::{CounterConfig, ScrollConfig, SiteConfig, ThemeConfig};
use crate::consts::{CONFIG_ELEMENT_ID, PREFERS_DARK_QUERY};
use crate::counter::{Counter, in_viewport, parse_target};
use crate::error::StorageError;
use crate::scroll::{
    SectionBounds, active_section, anchor_scroll_target, back_to_top_visible, fragment_id, progress_percent,
};
use crate::theme::{ColorSchemeSource, PreferenceStore, ThemeManager, ThemeSurface};

/// Theme manager wired to the live page.
pub type BrowserThemeManager = ThemeManager<LocalStorage, MediaColorScheme, DocumentSurface>;

// =============================================================================
// ENTRY
// =============================================================================

/// Mount every page behavior, deferring until `DOMContentLoaded` when the
/// document is still parsing.
pub fn mount() {
    let Some(window) = web_sys::window() else {
        log::warn!("no window; page behaviors disabled");
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("no document; page behaviors disabled");
        return;
    };

    if document.ready_state() == "loading" {
        let target = document.clone();
        listen(&target, "DOMContentLoaded", move |_event| mount_page(&window, &document));
    } else {
        mount_page(&window, &document);
    }
}

fn mount_page(window: &Window, document: &Document) {
    let config = load_config(document);
    mount_theme(window, document, &config.theme);
    mount_scroll(window, document, &config.scroll);
    mount_counters(window, document, &config.counter);
}

fn load_config(document: &Document) -> SiteConfig {
    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    SiteConfig::from_optional_json(raw.as_deref())
}

// =============================================================================
// THEME SEAMS
// =============================================================================

/// [`PreferenceStore`] over `window.localStorage`.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    #[must_use]
    pub fn from_window(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                log::warn!("localStorage blocked: {err:?}");
                None
            }
        };
        Self { storage }
    }
}

impl PreferenceStore for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|err| StorageError::Read(format!("{err:?}")))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|err| StorageError::Write(format!("{err:?}")))
    }
}

/// [`ColorSchemeSource`] over `matchMedia("(prefers-color-scheme: dark)")`.
pub struct MediaColorScheme {
    query: Option<MediaQueryList>,
}

impl MediaColorScheme {
    #[must_use]
    pub fn from_window(window: &Window) -> Self {
        let query = match window.match_media(PREFERS_DARK_QUERY) {
            Ok(query) => query,
            Err(err) => {
                log::debug!("matchMedia unavailable: {err:?}");
                None
            }
        };
        Self { query }
    }

    #[must_use]
    pub fn query(&self) -> Option<&MediaQueryList> {
        self.query.as_ref()
    }
}

impl ColorSchemeSource for MediaColorScheme {
    fn prefers_dark(&self) -> bool {
        self.query.as_ref().is_some_and(MediaQueryList::matches)
    }
}

/// [`ThemeSurface`] over the `<html>` element plus the optional toggle,
/// icon and `theme-color` meta tag.
pub struct DocumentSurface {
    root: Element,
    toggle: Option<Element>,
    icon: Option<Element>,
    meta: Option<Element>,
}

impl DocumentSurface {
    /// `None` only when the document has no root element.
    #[must_use]
    pub fn from_document(document: &Document, config: &ThemeConfig) -> Option<Self> {
        Some(Self {
            root: document.document_element()?,
            toggle: document.get_element_by_id(&config.toggle_id),
            icon: document.get_element_by_id(&config.icon_id),
            meta: query_one(document, &config.meta_selector),
        })
    }

    #[must_use]
    pub fn toggle(&self) -> Option<&Element> {
        self.toggle.as_ref()
    }
}

impl ThemeSurface for DocumentSurface {
    fn set_root_class(&self, class: &str, enabled: bool) {
        set_class(&self.root, class, enabled);
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.root.get_attribute(name)
    }

    fn set_root_attribute(&self, name: &str, value: &str) {
        log_js_err("set root attribute", self.root.set_attribute(name, value));
    }

    fn set_icon_class(&self, class: &str) {
        if let Some(icon) = &self.icon {
            icon.set_class_name(class);
        }
    }

    fn set_toggle_pressed(&self, pressed: bool) {
        if let Some(toggle) = &self.toggle {
            let value = if pressed { "true" } else { "false" };
            log_js_err("set aria-pressed", toggle.set_attribute("aria-pressed", value));
        }
    }

    fn set_meta_color(&self, color: &str) {
        if let Some(meta) = &self.meta {
            log_js_err("set theme-color", meta.set_attribute("content", color));
        }
    }

    fn remove_root_class_after(&self, class: &str, delay_ms: u32) {
        let root = self.root.clone();
        let class = class.to_owned();
        Timeout::new(delay_ms, move || {
            log_js_err("remove transition class", root.class_list().remove_1(&class));
        })
        .forget();
    }
}

// =============================================================================
// THEME WIRING
// =============================================================================

fn mount_theme(window: &Window, document: &Document, config: &ThemeConfig) {
    let Some(surface) = DocumentSurface::from_document(document, config) else {
        log::warn!("document has no root element; theme disabled");
        return;
    };
    let manager: Rc<BrowserThemeManager> = Rc::new(ThemeManager::new(
        config.clone(),
        LocalStorage::from_window(window),
        MediaColorScheme::from_window(window),
        surface,
    ));

    // Paint before anything becomes interactive.
    let theme = manager.initialize();
    log::info!("theme initialized as {theme}");

    if let Some(toggle) = manager.surface().toggle() {
        let handler = Rc::clone(&manager);
        listen(toggle, "click", move |_event| {
            handler.toggle_theme();
        });
    }

    if let Some(query) = manager.scheme().query() {
        let handler = Rc::clone(&manager);
        listen(query, "change", move |event| {
            let prefers_dark = event
                .dyn_ref::<MediaQueryListEvent>()
                .map_or_else(|| handler.scheme().prefers_dark(), MediaQueryListEvent::matches);
            handler.handle_system_change(prefers_dark);
        });
    }
}

// =============================================================================
// SCROLL WIRING
// =============================================================================

struct NavTarget {
    id: String,
    link: Element,
    section: Element,
}

struct ScrollBindings {
    window: Window,
    root: Element,
    progress_bar: Option<HtmlElement>,
    back_to_top: Option<Element>,
    nav: Vec<NavTarget>,
    config: ScrollConfig,
}

impl ScrollBindings {
    fn scroll_top(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn update(&self) {
        let scroll_top = self.scroll_top();

        if let Some(bar) = &self.progress_bar {
            let percent = progress_percent(
                scroll_top,
                f64::from(self.root.scroll_height()),
                f64::from(self.root.client_height()),
            );
            log_js_err(
                "set progress width",
                bar.style().set_property("width", &format!("{percent:.2}%")),
            );
        }

        if let Some(button) = &self.back_to_top {
            let visible = back_to_top_visible(scroll_top, self.config.back_to_top_threshold_px);
            set_class(button, &self.config.visible_class, visible);
        }

        if !self.nav.is_empty() {
            let mut sections = self
                .nav
                .iter()
                .map(|t| SectionBounds::new(t.id.clone(), t.section.get_bounding_client_rect().top() + scroll_top))
                .collect::<Vec<_>>();
            sections.sort_by(|a, b| a.top.total_cmp(&b.top));
            let active = active_section(&sections, scroll_top, self.config.header_offset_px);
            for target in &self.nav {
                set_class(&target.link, &self.config.active_class, active == Some(target.id.as_str()));
            }
        }
    }
}

fn mount_scroll(window: &Window, document: &Document, config: &ScrollConfig) {
    let Some(root) = document.document_element() else {
        return;
    };

    let nav = query_all(document, &config.nav_link_selector)
        .into_iter()
        .filter_map(|link| {
            let href = link.get_attribute("href")?;
            let id = fragment_id(&href)?.to_owned();
            let section = document.get_element_by_id(&id)?;
            Some(NavTarget { id, link, section })
        })
        .collect::<Vec<_>>();

    let bindings = Rc::new(ScrollBindings {
        window: window.clone(),
        root,
        progress_bar: document
            .get_element_by_id(&config.progress_bar_id)
            .and_then(|el| el.dyn_ref::<HtmlElement>().cloned()),
        back_to_top: document.get_element_by_id(&config.back_to_top_id),
        nav,
        config: config.clone(),
    });

    bind_anchor_links(window, document, config.header_offset_px);

    if let Some(button) = &bindings.back_to_top {
        let window = window.clone();
        listen(button, "click", move |event| {
            event.prevent_default();
            smooth_scroll_to(&window, 0.0);
        });
    }

    bindings.update();
    let handler = Rc::clone(&bindings);
    listen(window, "scroll", move |_event| handler.update());
}

fn bind_anchor_links(window: &Window, document: &Document, offset: f64) {
    for anchor in query_all(document, "a[href^=\"#\"]") {
        let window = window.clone();
        let document = document.clone();
        let source = anchor.clone();
        listen(&anchor, "click", move |event| {
            let Some(href) = source.get_attribute("href") else {
                return;
            };
            let Some(target) = fragment_id(&href).and_then(|id| document.get_element_by_id(id)) else {
                return;
            };
            event.prevent_default();
            let top = anchor_scroll_target(
                target.get_bounding_client_rect().top(),
                window.scroll_y().unwrap_or(0.0),
                offset,
            );
            smooth_scroll_to(&window, top);
        });
    }
}

fn smooth_scroll_to(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

// =============================================================================
// COUNTER WIRING
// =============================================================================

struct CounterSlot {
    element: Element,
    counter: Counter,
    started: Cell<bool>,
}

fn mount_counters(window: &Window, document: &Document, config: &CounterConfig) {
    let slots = query_all(document, &config.selector)
        .into_iter()
        .filter_map(|element| {
            let raw = element.get_attribute(&config.target_attribute)?;
            let Some(target) = parse_target(&raw) else {
                log::debug!("skipping counter with target {raw:?}");
                return None;
            };
            let suffix = element.get_attribute(&config.suffix_attribute).unwrap_or_default();
            Some(CounterSlot {
                element,
                counter: Counter::new(target, config.duration_ms, suffix),
                started: Cell::new(false),
            })
        })
        .collect::<Vec<_>>();
    if slots.is_empty() {
        return;
    }

    let slots = Rc::new(slots);
    let frame_ms = config.frame_ms;
    start_visible_counters(window, &slots, frame_ms);

    let handler_window = window.clone();
    listen(window, "scroll", move |_event| {
        start_visible_counters(&handler_window, &slots, frame_ms);
    });
}

fn start_visible_counters(window: &Window, slots: &[CounterSlot], frame_ms: u32) {
    let viewport_height = window
        .inner_height()
        .map_or(0.0, |height| height.as_f64().unwrap_or(0.0));
    for slot in slots {
        if slot.started.get() {
            continue;
        }
        let rect = slot.element.get_bounding_client_rect();
        if in_viewport(rect.top(), rect.bottom(), viewport_height) {
            slot.started.set(true);
            animate_counter(slot.element.clone(), slot.counter.clone(), frame_ms);
        }
    }
}

fn animate_counter(element: Element, counter: Counter, frame_ms: u32) {
    let started_ms = js_sys::Date::now();
    element.set_text_content(Some(&counter.label_at(0.0)));

    let holder: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
    let holder_for_tick = Rc::clone(&holder);
    let interval = Interval::new(frame_ms, move || {
        let elapsed = js_sys::Date::now() - started_ms;
        element.set_text_content(Some(&counter.label_at(elapsed)));
        if counter.is_finished(elapsed) {
            // Dropping the interval cancels it; do it outside its own tick.
            if let Some(done) = holder_for_tick.borrow_mut().take() {
                Timeout::new(0, move || drop(done)).forget();
            }
        }
    });
    *holder.borrow_mut() = Some(interval);
}

// =============================================================================
// HELPERS
// =============================================================================

fn listen<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    log_js_err(
        "add event listener",
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()),
    );
    callback.forget();
}

fn set_class(element: &Element, class: &str, enabled: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, enabled) {
        log::debug!("toggle class {class:?} failed: {err:?}");
    }
}

fn query_one(document: &Document, selector: &str) -> Option<Element> {
    match document.query_selector(selector) {
        Ok(element) => element,
        Err(err) => {
            log::debug!("invalid selector {selector:?}: {err:?}");
            None
        }
    }
}

fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let list = match document.query_selector_all(selector) {
        Ok(list) => list,
        Err(err) => {
            log::debug!("invalid selector {selector:?}: {err:?}");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}

fn log_js_err(context: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::debug!("{context} failed: {err:?}");
    }
}
