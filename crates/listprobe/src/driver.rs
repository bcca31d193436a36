//! PageDriver - the browser control boundary.
//!
//! Every page operation the checks perform goes through this trait, so the
//! orchestrator can drive a real Chromium tab ([`crate::ChromiumDriver`],
//! feature `browser`) or the in-memory [`crate::mock::MockShoppingPage`].
//!
//! Implementations must provide navigation, input, viewport, capture and
//! [`PageDriver::evaluate`]. The read operations have default bodies built on
//! `evaluate` and the queries in [`crate::locator`]; implementations without a
//! JavaScript engine override them.

use crate::config::ViewportSpec;
use crate::error::{DriverError, DriverResult};
use crate::locator::{self, Locator};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Abstract driver trait for browser automation
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to URL and wait for the document to load
    async fn goto(&mut self, url: &str) -> DriverResult<()>;

    /// Reload the current document and wait for it to load
    async fn reload(&mut self) -> DriverResult<()>;

    /// Click the located element
    async fn click(&mut self, locator: &Locator) -> DriverResult<()>;

    /// Focus the first element matching `selector` and press `key`
    async fn press(&mut self, selector: &str, key: &str) -> DriverResult<()>;

    /// Move the pointer over the located element
    async fn hover(&mut self, locator: &Locator) -> DriverResult<()>;

    /// Evaluate a read-only expression and return its JSON value
    async fn evaluate(&self, script: &str) -> DriverResult<Value>;

    /// Resize the viewport
    async fn set_viewport(&mut self, viewport: &ViewportSpec) -> DriverResult<()>;

    /// Capture the full page as PNG into `path`
    async fn screenshot(&self, path: &Path) -> DriverResult<()>;

    /// Release the browser
    async fn close(&mut self) -> DriverResult<()>;

    /// Document title
    async fn title(&self) -> DriverResult<String> {
        let value = self.evaluate("document.title").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Replace the value of the first input matching `selector`
    async fn fill(&mut self, selector: &str, value: &str) -> DriverResult<()> {
        let target = Locator::first(selector);
        let filled = self
            .evaluate(&locator::fill_query(&target, value))
            .await?;
        if filled.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(DriverError::not_found(selector, 0))
        }
    }

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> DriverResult<usize> {
        let value = self.evaluate(&locator::count_query(selector)).await?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| DriverError::evaluation(format!("count returned {value}")))
    }

    /// Text content of every element matching `selector`, in document order
    async fn text_contents(&self, selector: &str) -> DriverResult<Vec<String>> {
        let value = self
            .evaluate(&locator::text_contents_query(selector))
            .await?;
        Ok(Vec::<String>::deserialize(value)?)
    }

    /// Text content of the first element matching `selector`
    async fn text_content(&self, selector: &str) -> DriverResult<String> {
        self.text_contents(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::not_found(selector, 0))
    }

    /// Inner HTML of the first element matching `selector`
    async fn inner_html(&self, selector: &str) -> DriverResult<String> {
        let value = self
            .evaluate(&locator::inner_html_query(&Locator::first(selector)))
            .await?;
        match value {
            Value::String(html) => Ok(html),
            _ => Err(DriverError::not_found(selector, 0)),
        }
    }

    /// Attribute of the first element matching `selector`; `None` if unset
    async fn attribute(&self, selector: &str, name: &str) -> DriverResult<Option<String>> {
        #[derive(Deserialize)]
        struct Probe {
            found: bool,
            value: Option<String>,
        }

        let value = self
            .evaluate(&locator::attribute_query(&Locator::first(selector), name))
            .await?;
        let probe = Probe::deserialize(value)?;
        if probe.found {
            Ok(probe.value)
        } else {
            Err(DriverError::not_found(selector, 0))
        }
    }

    /// Whether the located element carries `class`
    async fn has_class(&self, locator: &Locator, class: &str) -> DriverResult<bool> {
        let value = self
            .evaluate(&locator::has_class_query(locator, class))
            .await?;
        value
            .as_bool()
            .ok_or_else(|| DriverError::not_found(locator.selector(), locator.index()))
    }

    /// Whether the first element matching `selector` is rendered and visible
    async fn is_visible(&self, selector: &str) -> DriverResult<bool> {
        let value = self
            .evaluate(&locator::visibility_query(&Locator::first(selector)))
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Rendered width in CSS pixels of the first element matching `selector`
    async fn offset_width(&self, selector: &str) -> DriverResult<u32> {
        let value = self
            .evaluate(&locator::offset_width_query(&Locator::first(selector)))
            .await?;
        value
            .as_u64()
            .map(|w| w as u32)
            .ok_or_else(|| DriverError::not_found(selector, 0))
    }

    /// Durable storage entry for `key`
    async fn storage_item(&self, key: &str) -> DriverResult<Option<String>> {
        let value = self.evaluate(&locator::storage_item_query(key)).await?;
        Ok(value.as_str().map(ToString::to_string))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers `evaluate` from a script → value table and records calls
    #[derive(Debug, Default)]
    struct ScriptedDriver {
        answers: HashMap<String, Value>,
        evaluated: Mutex<Vec<String>>,
    }

    impl ScriptedDriver {
        fn answer(mut self, script: String, value: Value) -> Self {
            self.answers.insert(script, value);
            self
        }
    }

    #[async_trait]
    impl PageDriver for ScriptedDriver {
        async fn goto(&mut self, _url: &str) -> DriverResult<()> {
            Ok(())
        }
        async fn reload(&mut self) -> DriverResult<()> {
            Ok(())
        }
        async fn click(&mut self, _locator: &Locator) -> DriverResult<()> {
            Ok(())
        }
        async fn press(&mut self, _selector: &str, _key: &str) -> DriverResult<()> {
            Ok(())
        }
        async fn hover(&mut self, _locator: &Locator) -> DriverResult<()> {
            Ok(())
        }
        async fn evaluate(&self, script: &str) -> DriverResult<Value> {
            self.evaluated.lock().unwrap().push(script.to_string());
            Ok(self.answers.get(script).cloned().unwrap_or(Value::Null))
        }
        async fn set_viewport(&mut self, _viewport: &ViewportSpec) -> DriverResult<()> {
            Ok(())
        }
        async fn screenshot(&self, _path: &Path) -> DriverResult<()> {
            Ok(())
        }
        async fn close(&mut self) -> DriverResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_count_reads_number() {
        let driver = ScriptedDriver::default()
            .answer(locator::count_query(".shopping-item"), Value::from(5));
        assert_eq!(driver.count(".shopping-item").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_count_rejects_non_number() {
        let driver = ScriptedDriver::default();
        let err = driver.count(".shopping-item").await.unwrap_err();
        assert!(matches!(err, DriverError::Evaluation { .. }));
    }

    #[tokio::test]
    async fn test_text_content_of_empty_match_is_not_found() {
        let driver = ScriptedDriver::default().answer(
            locator::text_contents_query(".item-text"),
            serde_json::json!([]),
        );
        let err = driver.text_content(".item-text").await.unwrap_err();
        assert!(matches!(err, DriverError::ElementNotFound { .. }));
    }

    #[tokio::test]
    async fn test_text_contents_in_order() {
        let driver = ScriptedDriver::default().answer(
            locator::text_contents_query(".item-text"),
            serde_json::json!(["우유", "계란"]),
        );
        assert_eq!(
            driver.text_contents(".item-text").await.unwrap(),
            vec!["우유".to_string(), "계란".to_string()]
        );
    }

    #[tokio::test]
    async fn test_attribute_distinguishes_missing_element_from_unset() {
        let root = Locator::first("html");
        let driver = ScriptedDriver::default()
            .answer(
                locator::attribute_query(&root, "data-theme"),
                serde_json::json!({ "found": true, "value": null }),
            )
            .answer(
                locator::attribute_query(&Locator::first("main"), "data-theme"),
                serde_json::json!({ "found": false, "value": null }),
            );
        assert_eq!(driver.attribute("html", "data-theme").await.unwrap(), None);
        assert!(driver.attribute("main", "data-theme").await.is_err());
    }

    #[tokio::test]
    async fn test_fill_reports_missing_input() {
        let mut driver = ScriptedDriver::default();
        let err = driver.fill("#itemInput", "우유").await.unwrap_err();
        assert!(err.to_string().contains("#itemInput"));
    }

    #[tokio::test]
    async fn test_has_class_missing_element_names_index() {
        let driver = ScriptedDriver::default();
        let err = driver
            .has_class(&Locator::nth(".shopping-item", 4), "checked")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No element matches '.shopping-item' at index 4");
    }

    #[tokio::test]
    async fn test_storage_item_null_is_none() {
        let driver = ScriptedDriver::default()
            .answer(locator::storage_item_query("theme"), Value::from("dark"));
        assert_eq!(
            driver.storage_item("theme").await.unwrap(),
            Some("dark".to_string())
        );
        assert_eq!(driver.storage_item("shoppingList").await.unwrap(), None);
        assert_eq!(driver.evaluated.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_visibility_defaults_to_false() {
        let driver = ScriptedDriver::default();
        assert!(!driver.is_visible(".container").await.unwrap());
    }
}
