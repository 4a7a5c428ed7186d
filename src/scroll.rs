//! Scroll geometry for the progress bar, back-to-top control, scroll-spy
//! and in-page anchor navigation.
//!
//! All inputs are CSS pixels in document coordinates unless noted.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

/// A page section that a navigation link points at.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    /// Distance from the top of the document to the section's top edge.
    pub top: f64,
}

impl SectionBounds {
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64) -> Self {
        Self { id: id.into(), top }
    }
}

/// How far through the page the reader is, as a percentage in `[0, 100]`.
///
/// Pages that fit in the viewport report `0`.
#[must_use]
pub fn progress_percent(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let scrollable = scroll_height - client_height;
    if scrollable <= 0.0 || !scrollable.is_finite() {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Whether the back-to-top control should be shown.
#[must_use]
pub fn back_to_top_visible(scroll_top: f64, threshold: f64) -> bool {
    scroll_top > threshold
}

/// The section the reader is currently in.
///
/// `sections` must be in document order. The active section is the last one
/// whose top edge has passed `scroll_top + offset`; above the first section
/// nothing is active.
#[must_use]
pub fn active_section(sections: &[SectionBounds], scroll_top: f64, offset: f64) -> Option<&str> {
    let line = scroll_top + offset;
    sections
        .iter()
        .take_while(|section| section.top <= line)
        .last()
        .map(|section| section.id.as_str())
}

/// Absolute scroll position that brings an element to just below the fixed
/// header.
///
/// `element_top` is viewport-relative, as returned by
/// `getBoundingClientRect().top`.
#[must_use]
pub fn anchor_scroll_target(element_top: f64, scroll_top: f64, offset: f64) -> f64 {
    (element_top + scroll_top - offset).max(0.0)
}

/// Extract the fragment id from an in-page link such as `#about`.
///
/// Bare `#` and links to other pages yield `None`.
#[must_use]
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}
