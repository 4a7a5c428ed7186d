use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use super::*;

// =============================================================
// Fakes
// =============================================================

#[derive(Default)]
struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        store
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::Unavailable);
        }
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write("QuotaExceededError".to_owned()));
        }
        self.writes.set(self.writes.get() + 1);
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Default)]
struct OsScheme {
    dark: Cell<bool>,
}

impl ColorSchemeSource for OsScheme {
    fn prefers_dark(&self) -> bool {
        self.dark.get()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Painted {
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    icon: Option<String>,
    pressed: Option<bool>,
    meta: Option<String>,
}

#[derive(Default)]
struct FakeSurface {
    painted: RefCell<Painted>,
    removals: RefCell<Vec<(String, u32)>>,
}

impl FakeSurface {
    fn snapshot(&self) -> Painted {
        self.painted.borrow().clone()
    }

    fn has_class(&self, class: &str) -> bool {
        self.painted.borrow().classes.contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.painted.borrow().attributes.get(name).cloned()
    }
}

impl ThemeSurface for FakeSurface {
    fn set_root_class(&self, class: &str, enabled: bool) {
        let mut painted = self.painted.borrow_mut();
        if enabled {
            painted.classes.insert(class.to_owned());
        } else {
            painted.classes.remove(class);
        }
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.attribute(name)
    }

    fn set_root_attribute(&self, name: &str, value: &str) {
        self.painted
            .borrow_mut()
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    fn set_icon_class(&self, class: &str) {
        self.painted.borrow_mut().icon = Some(class.to_owned());
    }

    fn set_toggle_pressed(&self, pressed: bool) {
        self.painted.borrow_mut().pressed = Some(pressed);
    }

    fn set_meta_color(&self, color: &str) {
        self.painted.borrow_mut().meta = Some(color.to_owned());
    }

    fn remove_root_class_after(&self, class: &str, delay_ms: u32) {
        self.removals.borrow_mut().push((class.to_owned(), delay_ms));
    }
}

type TestManager = ThemeManager<MemoryStore, OsScheme, FakeSurface>;

const KEY: &str = "site-theme";

fn manager(store: MemoryStore, os_dark: bool) -> TestManager {
    let scheme = OsScheme::default();
    scheme.dark.set(os_dark);
    ThemeManager::new(ThemeConfig::default(), store, scheme, FakeSurface::default())
}

// =============================================================
// Theme
// =============================================================

#[test]
fn theme_wire_strings() {
    assert_eq!(Theme::Light.as_str(), "light");
    assert_eq!(Theme::Dark.as_str(), "dark");
    assert_eq!(Theme::from_wire("dark"), Some(Theme::Dark));
    assert_eq!(Theme::from_wire("light"), Some(Theme::Light));
}

#[test]
fn theme_from_wire_rejects_unknown_and_empty() {
    assert_eq!(Theme::from_wire(""), None);
    assert_eq!(Theme::from_wire("Dark"), None);
    assert_eq!(Theme::from_wire("sepia"), None);
}

#[test]
fn theme_toggled_is_complement() {
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
}

#[test]
fn theme_serde_uses_lowercase() {
    assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    assert_eq!(serde_json::from_str::<Theme>("\"light\"").unwrap(), Theme::Light);
}

// =============================================================
// resolve_initial_theme
// =============================================================

#[test]
fn stored_preference_wins_over_os() {
    for (stored, expected) in [("light", Theme::Light), ("dark", Theme::Dark)] {
        for os_dark in [false, true] {
            let m = manager(MemoryStore::with(KEY, stored), os_dark);
            assert_eq!(m.resolve_initial_theme(), expected);
        }
    }
}

#[test]
fn no_stored_preference_follows_os() {
    assert_eq!(manager(MemoryStore::default(), true).resolve_initial_theme(), Theme::Dark);
    assert_eq!(manager(MemoryStore::default(), false).resolve_initial_theme(), Theme::Light);
}

#[test]
fn unrecognized_stored_value_is_ignored() {
    let m = manager(MemoryStore::with(KEY, "sepia"), true);
    assert!(!m.has_explicit_preference());
    assert_eq!(m.resolve_initial_theme(), Theme::Dark);
}

#[test]
fn unreadable_storage_falls_back_to_os() {
    let store = MemoryStore::with(KEY, "light");
    store.fail_reads.set(true);
    let m = manager(store, true);
    assert_eq!(m.resolve_initial_theme(), Theme::Dark);
}

#[test]
fn unreadable_storage_and_light_os_resolves_light() {
    let store = MemoryStore::default();
    store.fail_reads.set(true);
    assert_eq!(manager(store, false).resolve_initial_theme(), Theme::Light);
}

#[test]
fn custom_storage_key_is_honored() {
    let config = ThemeConfig { storage_key: "pf".to_owned(), ..ThemeConfig::default() };
    let m = ThemeManager::new(
        config,
        MemoryStore::with("pf", "dark"),
        OsScheme::default(),
        FakeSurface::default(),
    );
    assert_eq!(m.resolve_initial_theme(), Theme::Dark);
}

// =============================================================
// apply_theme
// =============================================================

#[test]
fn apply_dark_paints_every_element() {
    let m = manager(MemoryStore::default(), false);
    m.apply_theme(Theme::Dark, false);
    let s = m.surface();
    assert!(s.has_class("theme-dark"));
    assert!(!s.has_class("theme-light"));
    assert_eq!(s.attribute("data-theme").as_deref(), Some("dark"));
    let painted = s.snapshot();
    assert_eq!(painted.icon.as_deref(), Some("bi bi-sun-fill"));
    assert_eq!(painted.pressed, Some(true));
    assert_eq!(painted.meta.as_deref(), Some("#000000"));
}

#[test]
fn apply_light_paints_every_element() {
    let m = manager(MemoryStore::default(), false);
    m.apply_theme(Theme::Dark, false);
    m.apply_theme(Theme::Light, false);
    let s = m.surface();
    assert!(s.has_class("theme-light"));
    assert!(!s.has_class("theme-dark"));
    assert_eq!(s.attribute("data-theme").as_deref(), Some("light"));
    let painted = s.snapshot();
    assert_eq!(painted.icon.as_deref(), Some("bi bi-moon-stars-fill"));
    assert_eq!(painted.pressed, Some(false));
    assert_eq!(painted.meta.as_deref(), Some("#0d9488"));
}

#[test]
fn apply_is_idempotent() {
    let once = manager(MemoryStore::default(), false);
    once.apply_theme(Theme::Dark, false);

    let twice = manager(MemoryStore::default(), false);
    twice.apply_theme(Theme::Dark, false);
    twice.apply_theme(Theme::Dark, false);

    assert_eq!(once.surface().snapshot(), twice.surface().snapshot());
}

#[test]
fn apply_without_persist_leaves_storage_untouched() {
    let m = manager(MemoryStore::default(), false);
    m.apply_theme(Theme::Dark, false);
    assert_eq!(m.store().get(KEY), None);
    assert_eq!(m.store().writes.get(), 0);
}

#[test]
fn apply_with_persist_round_trips_through_storage() {
    for theme in [Theme::Light, Theme::Dark] {
        let m = manager(MemoryStore::default(), !theme.is_dark());
        m.apply_theme(theme, true);
        assert_eq!(m.store().get(KEY).as_deref(), Some(theme.as_str()));
        assert_eq!(m.resolve_initial_theme(), theme);
    }
}

#[test]
fn apply_survives_write_failure() {
    let store = MemoryStore::default();
    store.fail_writes.set(true);
    let m = manager(store, false);
    m.apply_theme(Theme::Dark, true);
    assert_eq!(m.surface().attribute("data-theme").as_deref(), Some("dark"));
    assert_eq!(m.store().get(KEY), None);
}

#[test]
fn apply_marks_transition_and_schedules_removal() {
    let m = manager(MemoryStore::default(), false);
    m.apply_theme(Theme::Dark, false);
    assert!(m.surface().has_class("theme-transition"));
    assert_eq!(
        m.surface().removals.borrow().as_slice(),
        &[("theme-transition".to_owned(), 600)]
    );
}

#[test]
fn transition_delay_comes_from_config() {
    let config = ThemeConfig { transition_ms: 150, ..ThemeConfig::default() };
    let m = ThemeManager::new(config, MemoryStore::default(), OsScheme::default(), FakeSurface::default());
    m.apply_theme(Theme::Light, false);
    assert_eq!(m.surface().removals.borrow()[0].1, 150);
}

// =============================================================
// active_theme / toggle_theme
// =============================================================

#[test]
fn active_theme_reads_root_attribute() {
    let m = manager(MemoryStore::with(KEY, "light"), false);
    m.apply_theme(Theme::Dark, false);
    assert_eq!(m.active_theme(), Theme::Dark);
}

#[test]
fn active_theme_before_apply_resolves() {
    let m = manager(MemoryStore::default(), true);
    assert_eq!(m.active_theme(), Theme::Dark);
}

#[test]
fn toggle_produces_complement_and_persists() {
    let m = manager(MemoryStore::default(), false);
    m.initialize();
    let before = m.active_theme();
    let after = m.toggle_theme();
    assert_eq!(after, before.toggled());
    assert_eq!(m.active_theme(), after);
    assert_eq!(m.store().get(KEY).as_deref(), Some(after.as_str()));
}

#[test]
fn toggle_twice_returns_to_start() {
    let m = manager(MemoryStore::default(), true);
    m.initialize();
    m.toggle_theme();
    assert_eq!(m.toggle_theme(), Theme::Dark);
    assert_eq!(m.store().writes.get(), 2);
}

// =============================================================
// initialize / handle_system_change scenarios
// =============================================================

#[test]
fn initialize_follows_dark_os_without_persisting() {
    let m = manager(MemoryStore::default(), true);
    assert_eq!(m.initialize(), Theme::Dark);
    assert_eq!(m.surface().attribute("data-theme").as_deref(), Some("dark"));
    assert_eq!(m.store().get(KEY), None);
}

#[test]
fn stored_light_ignores_dark_os_and_later_changes() {
    let m = manager(MemoryStore::with(KEY, "light"), true);
    assert_eq!(m.initialize(), Theme::Light);
    assert_eq!(m.handle_system_change(true), None);
    assert_eq!(m.surface().attribute("data-theme").as_deref(), Some("light"));
}

#[test]
fn toggle_then_os_change_is_ignored() {
    let m = manager(MemoryStore::default(), false);
    m.initialize();
    assert_eq!(m.toggle_theme(), Theme::Dark);
    assert_eq!(m.store().get(KEY).as_deref(), Some("dark"));

    m.scheme().dark.set(false);
    assert_eq!(m.handle_system_change(false), None);
    assert_eq!(m.active_theme(), Theme::Dark);
}

#[test]
fn os_change_is_tracked_without_explicit_choice() {
    let m = manager(MemoryStore::default(), false);
    m.initialize();
    assert_eq!(m.handle_system_change(true), Some(Theme::Dark));
    assert_eq!(m.active_theme(), Theme::Dark);
    assert_eq!(m.handle_system_change(false), Some(Theme::Light));
    assert_eq!(m.store().writes.get(), 0);
}

#[test]
fn os_change_rechecks_storage_on_every_notification() {
    let m = manager(MemoryStore::default(), false);
    m.initialize();
    assert_eq!(m.handle_system_change(true), Some(Theme::Dark));

    // Written by another tab after startup.
    m.store().entries.borrow_mut().insert(KEY.to_owned(), "light".to_owned());
    assert_eq!(m.handle_system_change(false), None);
    assert_eq!(m.active_theme(), Theme::Dark);
}
