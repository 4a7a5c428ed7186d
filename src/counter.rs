//! Animated stat counters ("120+ projects", "8 years").
//!
//! A counter eases out from zero to its target over a fixed duration. The
//! model is pure; [`crate::dom`] drives it with a timer once the element
//! scrolls into view.

#[cfg(test)]
#[path = "counter_test.rs"]
mod counter_test;

#[derive(Clone, Debug, PartialEq)]
pub struct Counter {
    pub target: f64,
    pub duration_ms: f64,
    pub suffix: String,
}

impl Counter {
    #[must_use]
    pub fn new(target: f64, duration_ms: f64, suffix: impl Into<String>) -> Self {
        Self { target, duration_ms, suffix: suffix.into() }
    }

    /// Eased value `elapsed_ms` into the animation.
    #[must_use]
    pub fn value_at(&self, elapsed_ms: f64) -> f64 {
        if self.is_finished(elapsed_ms) {
            return self.target;
        }
        let t = (elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        self.target * ease_out_cubic(t)
    }

    #[must_use]
    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.duration_ms <= 0.0 || elapsed_ms >= self.duration_ms
    }

    /// Text to render: the rounded value followed by the suffix.
    #[must_use]
    pub fn label_at(&self, elapsed_ms: f64) -> String {
        // `+ 0.0` folds negative zero so the first frame never shows "-0".
        let value = self.value_at(elapsed_ms).round() + 0.0;
        format!("{value:.0}{}", self.suffix)
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Parse a counter target attribute such as `"120"` or `"1,500"`.
#[must_use]
pub fn parse_target(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Whether an element with viewport-relative `top`/`bottom` overlaps a
/// viewport of `viewport_height`.
#[must_use]
pub fn in_viewport(top: f64, bottom: f64, viewport_height: f64) -> bool {
    bottom > 0.0 && top < viewport_height
}
