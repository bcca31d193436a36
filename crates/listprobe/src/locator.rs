//! Locators and the in-page queries built from them.
//!
//! A [`Locator`] is a CSS selector plus the index of the match to act on,
//! mirroring `first()` / `nth(i)` in Playwright. The `*_query` functions turn a
//! locator into a read-only JavaScript expression whose value is plain JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A CSS selector narrowed to one match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    selector: String,
    index: usize,
}

impl Locator {
    /// First element matching `selector`
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            index: 0,
        }
    }

    /// Alias for [`Locator::new`], reads better at call sites
    #[must_use]
    pub fn first(selector: impl Into<String>) -> Self {
        Self::new(selector)
    }

    /// The `index`-th element matching `selector` (zero-based)
    #[must_use]
    pub fn nth(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }

    /// CSS selector
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Match index
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Expression evaluating to the element, or `undefined`
    #[must_use]
    pub fn to_query(&self) -> String {
        format!(
            "document.querySelectorAll({})[{}]",
            js_string(&self.selector),
            self.index
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == 0 {
            write!(f, "{}", self.selector)
        } else {
            write!(f, "{} >> nth={}", self.selector, self.index)
        }
    }
}

/// Quote `value` as a JavaScript string literal
#[must_use]
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Number of elements matching `selector`
#[must_use]
pub fn count_query(selector: &str) -> String {
    format!("document.querySelectorAll({}).length", js_string(selector))
}

/// `textContent` of every element matching `selector`
#[must_use]
pub fn text_contents_query(selector: &str) -> String {
    format!(
        "Array.from(document.querySelectorAll({})).map(el => el.textContent ?? '')",
        js_string(selector)
    )
}

/// `innerHTML` of the located element, or `null`
#[must_use]
pub fn inner_html_query(locator: &Locator) -> String {
    format!(
        "(() => {{ const el = {}; return el ? el.innerHTML : null; }})()",
        locator.to_query()
    )
}

/// `{ found, value }` for an attribute of the located element
#[must_use]
pub fn attribute_query(locator: &Locator, name: &str) -> String {
    format!(
        "(() => {{ const el = {}; return {{ found: !!el, value: el ? el.getAttribute({}) : null }}; }})()",
        locator.to_query(),
        js_string(name)
    )
}

/// Whether the located element carries `class`, or `null` if absent
#[must_use]
pub fn has_class_query(locator: &Locator, class: &str) -> String {
    format!(
        "(() => {{ const el = {}; return el ? el.classList.contains({}) : null; }})()",
        locator.to_query(),
        js_string(class)
    )
}

/// Playwright-style visibility: rendered box and not `visibility: hidden`
#[must_use]
pub fn visibility_query(locator: &Locator) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; \
         const box = el.getBoundingClientRect(); \
         return box.width > 0 && box.height > 0 && getComputedStyle(el).visibility !== 'hidden'; }})()",
        locator.to_query()
    )
}

/// `offsetWidth` of the located element, or `null`
#[must_use]
pub fn offset_width_query(locator: &Locator) -> String {
    format!(
        "(() => {{ const el = {}; return el ? el.offsetWidth : null; }})()",
        locator.to_query()
    )
}

/// Durable storage entry, or `null`
#[must_use]
pub fn storage_item_query(key: &str) -> String {
    format!("localStorage.getItem({})", js_string(key))
}

/// Set an input's value the way a user edit would, then report success
#[must_use]
pub fn fill_query(locator: &Locator, value: &str) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; el.focus(); el.value = {}; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()",
        locator.to_query(),
        js_string(value)
    )
}
