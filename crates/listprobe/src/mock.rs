//! In-memory shopping-list page.
//!
//! `MockShoppingPage` models the application contract closely enough to run
//! the whole acceptance sequence without a browser: items with checked state,
//! statistics text, theme marker, durable storage that survives reloads.
//! [`MockFault`]s make it misbehave in specific ways so failure isolation can
//! be exercised.

use crate::app::{self, selectors, Theme};
use crate::config::ViewportSpec;
use crate::design::DESIGN_QUERY_MARKER;
use crate::driver::PageDriver;
use crate::error::{DriverError, DriverResult};
use crate::locator::Locator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Maximum container width of the modelled stylesheet
const CONTAINER_MAX_WIDTH: u32 = 600;

/// Horizontal body padding of the modelled stylesheet
const BODY_PADDING: u32 = 20;

/// Ways the mock page can deviate from the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MockFault {
    /// Whitespace-only input creates an item
    AcceptsBlankInput,
    /// Item text is rendered as live markup
    RendersRawMarkup,
    /// Durable storage is wiped on reload
    ForgetsOnReload,
    /// The theme toggle does nothing
    IgnoresThemeToggle,
    /// Delete removes every item instead of one
    DeletesAll,
    /// Navigation fails
    FailsNavigation,
    /// Closing the browser fails
    FailsClose,
}

/// One list entry as the app persists it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockItem {
    /// Item text
    pub text: String,
    /// Completion flag
    pub checked: bool,
}

/// In-memory page implementing [`PageDriver`]
#[derive(Debug)]
pub struct MockShoppingPage {
    title: String,
    url: Option<String>,
    items: Vec<MockItem>,
    theme: Theme,
    input: String,
    hovered: Option<usize>,
    storage: BTreeMap<String, String>,
    viewport: ViewportSpec,
    faults: BTreeSet<MockFault>,
    calls: Vec<String>,
    closed: bool,
}

impl Default for MockShoppingPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockShoppingPage {
    /// A well-behaved page with empty storage
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: format!("🛒 {}", app::APP_TITLE),
            url: None,
            items: Vec::new(),
            theme: Theme::Light,
            input: String::new(),
            hovered: None,
            storage: BTreeMap::new(),
            viewport: ViewportSpec::desktop(),
            faults: BTreeSet::new(),
            calls: Vec::new(),
            closed: false,
        }
    }

    /// Add a fault
    #[must_use]
    pub fn with_fault(mut self, fault: MockFault) -> Self {
        self.faults.insert(fault);
        self
    }

    /// Override the document title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Current items
    #[must_use]
    pub fn items(&self) -> &[MockItem] {
        &self.items
    }

    /// Current theme marker
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Current viewport
    #[must_use]
    pub const fn viewport(&self) -> &ViewportSpec {
        &self.viewport
    }

    /// Raw durable storage entry
    #[must_use]
    pub fn stored(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    /// Loaded URL
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether `close` has been called
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Call history for verification
    #[must_use]
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Check if an operation was called
    #[must_use]
    pub fn was_called(&self, operation: &str) -> bool {
        self.calls.iter().any(|c| c.starts_with(operation))
    }

    fn has_fault(&self, fault: MockFault) -> bool {
        self.faults.contains(&fault)
    }

    fn record(&mut self, call: String) {
        self.calls.push(call);
    }

    fn ensure_loaded(&self) -> DriverResult<()> {
        if self.url.is_some() {
            Ok(())
        } else {
            Err(DriverError::evaluation("no document loaded"))
        }
    }

    /// Rebuild in-page state from durable storage, as the app does on load
    fn load_document(&mut self) -> DriverResult<()> {
        self.items = match self.storage.get(app::ITEMS_STORAGE_KEY) {
            Some(raw) => serde_json::from_str(raw)?,
            None => Vec::new(),
        };
        self.theme = self
            .storage
            .get(app::THEME_STORAGE_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        self.input.clear();
        self.hovered = None;
        Ok(())
    }

    fn persist_items(&mut self) -> DriverResult<()> {
        let raw = serde_json::to_string(&self.items)?;
        self.storage.insert(app::ITEMS_STORAGE_KEY.to_string(), raw);
        Ok(())
    }

    fn submit_input(&mut self) -> DriverResult<()> {
        let raw = std::mem::take(&mut self.input);
        let text = raw.trim();
        if text.is_empty() && !self.has_fault(MockFault::AcceptsBlankInput) {
            return Ok(());
        }
        self.items.push(MockItem {
            text: text.to_string(),
            checked: false,
        });
        self.persist_items()
    }

    fn item_index(&self, locator: &Locator) -> DriverResult<usize> {
        if locator.index() < self.items.len() {
            Ok(locator.index())
        } else {
            Err(DriverError::not_found(locator.selector(), locator.index()))
        }
    }

    fn stats_text(&self) -> String {
        let completed = self.items.iter().filter(|i| i.checked).count();
        format!(
            "총 {} · {}",
            app::total_label(self.items.len()),
            app::completed_label(completed)
        )
    }

    fn render_list(&self) -> String {
        self.items
            .iter()
            .map(|item| {
                let text = if self.has_fault(MockFault::RendersRawMarkup) {
                    item.text.clone()
                } else {
                    escape_html(&item.text)
                };
                let class = if item.checked {
                    "shopping-item checked"
                } else {
                    "shopping-item"
                };
                format!(
                    "<li class=\"{class}\"><span class=\"checkbox\"></span>\
                     <span class=\"item-text\">{text}</span>\
                     <button class=\"delete-btn\">×</button></li>"
                )
            })
            .collect()
    }

    fn container_width(&self) -> u32 {
        self.viewport
            .width
            .saturating_sub(2 * BODY_PADDING)
            .min(CONTAINER_MAX_WIDTH)
    }

    fn design_snapshot(&self) -> Value {
        json!({
            "containerMaxWidth": format!("{CONTAINER_MAX_WIDTH}px"),
            "containerBorderRadius": "20px",
            "hasShadow": true,
            "headerBg": "linear-gradient(135deg, rgb(102, 126, 234) 0%, rgb(118, 75, 162) 100%)",
            "inputBorder": "2px solid rgb(224, 224, 224)",
            "headerPadding": "30px",
            "hasTransition": true,
            "viewportWidth": self.viewport.width,
            "containerWidth": self.container_width(),
            "itemCount": self.items.len(),
        })
    }
}

/// Escape text the way `textContent` assignment serializes into `innerHTML`
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[async_trait]
impl PageDriver for MockShoppingPage {
    async fn goto(&mut self, url: &str) -> DriverResult<()> {
        self.record(format!("goto:{url}"));
        if self.has_fault(MockFault::FailsNavigation) {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                message: "net::ERR_FILE_NOT_FOUND".to_string(),
            });
        }
        self.url = Some(url.to_string());
        self.load_document()
    }

    async fn reload(&mut self) -> DriverResult<()> {
        self.record("reload".to_string());
        self.ensure_loaded()?;
        if self.has_fault(MockFault::ForgetsOnReload) {
            self.storage.clear();
        }
        self.load_document()
    }

    async fn click(&mut self, locator: &Locator) -> DriverResult<()> {
        self.record(format!("click:{locator}"));
        self.ensure_loaded()?;
        match locator.selector() {
            selectors::ADD_BUTTON => self.submit_input(),
            selectors::CHECKBOX => {
                let index = self.item_index(locator)?;
                self.items[index].checked = !self.items[index].checked;
                self.persist_items()
            }
            selectors::DELETE_BUTTON => {
                let index = self.item_index(locator)?;
                // The control is only revealed while its row is hovered
                if self.hovered != Some(index) {
                    return Err(DriverError::not_found(locator.selector(), index));
                }
                if self.has_fault(MockFault::DeletesAll) {
                    self.items.clear();
                } else {
                    self.items.remove(index);
                }
                self.hovered = None;
                self.persist_items()
            }
            selectors::THEME_TOGGLE => {
                if !self.has_fault(MockFault::IgnoresThemeToggle) {
                    self.theme = self.theme.toggled();
                    self.storage.insert(
                        app::THEME_STORAGE_KEY.to_string(),
                        self.theme.as_str().to_string(),
                    );
                }
                Ok(())
            }
            other => Err(DriverError::not_found(other, locator.index())),
        }
    }

    async fn press(&mut self, selector: &str, key: &str) -> DriverResult<()> {
        self.record(format!("press:{selector}:{key}"));
        self.ensure_loaded()?;
        if selector != selectors::ITEM_INPUT {
            return Err(DriverError::not_found(selector, 0));
        }
        if key == app::CONFIRM_KEY {
            self.submit_input()?;
        }
        Ok(())
    }

    async fn hover(&mut self, locator: &Locator) -> DriverResult<()> {
        self.record(format!("hover:{locator}"));
        self.ensure_loaded()?;
        if locator.selector() != selectors::ITEM {
            return Err(DriverError::not_found(locator.selector(), locator.index()));
        }
        self.hovered = Some(self.item_index(locator)?);
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> DriverResult<Value> {
        self.ensure_loaded()?;
        if script.contains(DESIGN_QUERY_MARKER) {
            Ok(self.design_snapshot())
        } else {
            Err(DriverError::evaluation(
                "mock page only answers the design query",
            ))
        }
    }

    async fn set_viewport(&mut self, viewport: &ViewportSpec) -> DriverResult<()> {
        self.record(format!("viewport:{}x{}", viewport.width, viewport.height));
        self.viewport = viewport.clone();
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> DriverResult<()> {
        self.ensure_loaded()?;
        let shade = match self.theme {
            Theme::Light => [245, 245, 250],
            Theme::Dark => [26, 26, 46],
        };
        let image = image::RgbImage::from_pixel(
            self.viewport.width,
            self.viewport.height,
            image::Rgb(shade),
        );
        image.save(path).map_err(DriverError::screenshot)
    }

    async fn close(&mut self) -> DriverResult<()> {
        self.record("close".to_string());
        if self.has_fault(MockFault::FailsClose) {
            return Err(DriverError::Close {
                message: "browser process already gone".to_string(),
            });
        }
        self.closed = true;
        Ok(())
    }

    async fn title(&self) -> DriverResult<String> {
        self.ensure_loaded()?;
        Ok(self.title.clone())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> DriverResult<()> {
        self.record(format!("fill:{selector}"));
        self.ensure_loaded()?;
        if selector != selectors::ITEM_INPUT {
            return Err(DriverError::not_found(selector, 0));
        }
        self.input = value.to_string();
        Ok(())
    }

    async fn count(&self, selector: &str) -> DriverResult<usize> {
        self.ensure_loaded()?;
        Ok(match selector {
            selectors::ITEM
            | selectors::ITEM_TEXT
            | selectors::CHECKBOX
            | selectors::DELETE_BUTTON => self.items.len(),
            selectors::EMPTY_LIST => usize::from(self.items.is_empty()),
            selectors::LIST
            | selectors::STATS
            | selectors::CONTAINER
            | selectors::HEADER
            | selectors::ROOT
            | selectors::ITEM_INPUT
            | selectors::ADD_BUTTON
            | selectors::THEME_TOGGLE => 1,
            _ => 0,
        })
    }

    async fn text_contents(&self, selector: &str) -> DriverResult<Vec<String>> {
        self.ensure_loaded()?;
        Ok(match selector {
            selectors::ITEM_TEXT => self.items.iter().map(|i| i.text.clone()).collect(),
            selectors::STATS => vec![self.stats_text()],
            _ => Vec::new(),
        })
    }

    async fn inner_html(&self, selector: &str) -> DriverResult<String> {
        self.ensure_loaded()?;
        if selector == selectors::LIST {
            Ok(self.render_list())
        } else {
            Err(DriverError::not_found(selector, 0))
        }
    }

    async fn attribute(&self, selector: &str, name: &str) -> DriverResult<Option<String>> {
        self.ensure_loaded()?;
        if selector != selectors::ROOT {
            return Err(DriverError::not_found(selector, 0));
        }
        Ok((name == app::THEME_ATTRIBUTE).then(|| self.theme.as_str().to_string()))
    }

    async fn has_class(&self, locator: &Locator, class: &str) -> DriverResult<bool> {
        self.ensure_loaded()?;
        if locator.selector() != selectors::ITEM {
            return Err(DriverError::not_found(locator.selector(), locator.index()));
        }
        let index = self.item_index(locator)?;
        Ok(class == app::CHECKED_CLASS && self.items[index].checked)
    }

    async fn is_visible(&self, selector: &str) -> DriverResult<bool> {
        self.ensure_loaded()?;
        Ok(selector == selectors::CONTAINER && self.container_width() > 0)
    }

    async fn offset_width(&self, selector: &str) -> DriverResult<u32> {
        self.ensure_loaded()?;
        if selector == selectors::CONTAINER {
            Ok(self.container_width())
        } else {
            Err(DriverError::not_found(selector, 0))
        }
    }

    async fn storage_item(&self, key: &str) -> DriverResult<Option<String>> {
        self.ensure_loaded()?;
        Ok(self.storage.get(key).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    async fn loaded() -> MockShoppingPage {
        let mut page = MockShoppingPage::new();
        page.goto("file:///index.html").await.unwrap();
        page
    }

    async fn add(page: &mut MockShoppingPage, text: &str) {
        page.fill(selectors::ITEM_INPUT, text).await.unwrap();
        page.click(&Locator::first(selectors::ADD_BUTTON)).await.unwrap();
    }

    mod item_tests {
        use super::*;

        #[tokio::test]
        async fn test_add_trims_and_persists() {
            let mut page = loaded().await;
            add(&mut page, "  우유 ").await;
            assert_eq!(page.items()[0].text, "우유");
            assert!(page.stored(app::ITEMS_STORAGE_KEY).unwrap().contains("우유"));
        }

        #[tokio::test]
        async fn test_enter_submits() {
            let mut page = loaded().await;
            page.fill(selectors::ITEM_INPUT, "계란").await.unwrap();
            page.press(selectors::ITEM_INPUT, "Enter").await.unwrap();
            assert_eq!(page.count(selectors::ITEM).await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_blank_is_rejected() {
            let mut page = loaded().await;
            add(&mut page, "   ").await;
            assert!(page.items().is_empty());
            assert_eq!(page.count(selectors::EMPTY_LIST).await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_blank_fault_accepts() {
            let mut page = MockShoppingPage::new().with_fault(MockFault::AcceptsBlankInput);
            page.goto("file:///index.html").await.unwrap();
            add(&mut page, "   ").await;
            assert_eq!(page.items().len(), 1);
        }

        #[tokio::test]
        async fn test_toggle_twice_restores() {
            let mut page = loaded().await;
            add(&mut page, "빵").await;
            let checkbox = Locator::first(selectors::CHECKBOX);
            let row = Locator::first(selectors::ITEM);
            page.click(&checkbox).await.unwrap();
            assert!(page.has_class(&row, app::CHECKED_CLASS).await.unwrap());
            page.click(&checkbox).await.unwrap();
            assert!(!page.has_class(&row, app::CHECKED_CLASS).await.unwrap());
        }

        #[tokio::test]
        async fn test_stats_text_tokens() {
            let mut page = loaded().await;
            for text in ["빵", "사과", "치즈"] {
                add(&mut page, text).await;
            }
            page.click(&Locator::nth(selectors::CHECKBOX, 1)).await.unwrap();
            let stats = page.text_content(selectors::STATS).await.unwrap();
            assert!(stats.contains("3개"));
            assert!(stats.contains("1개 완료"));
        }

        #[tokio::test]
        async fn test_delete_removes_one() {
            let mut page = loaded().await;
            add(&mut page, "빵").await;
            add(&mut page, "사과").await;
            page.hover(&Locator::first(selectors::ITEM)).await.unwrap();
            page.click(&Locator::first(selectors::DELETE_BUTTON))
                .await
                .unwrap();
            assert_eq!(page.items().len(), 1);
            assert_eq!(page.items()[0].text, "사과");
        }

        #[tokio::test]
        async fn test_delete_requires_hover() {
            let mut page = loaded().await;
            add(&mut page, "빵").await;
            let err = page
                .click(&Locator::first(selectors::DELETE_BUTTON))
                .await
                .unwrap_err();
            assert!(matches!(err, DriverError::ElementNotFound { index: 0, .. }));
            assert_eq!(page.items().len(), 1);
            assert_eq!(page.count(selectors::ITEM).await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_hover_on_other_row_does_not_reveal_delete() {
            let mut page = loaded().await;
            add(&mut page, "빵").await;
            add(&mut page, "사과").await;
            page.hover(&Locator::nth(selectors::ITEM, 1)).await.unwrap();
            assert!(page
                .click(&Locator::first(selectors::DELETE_BUTTON))
                .await
                .is_err());
            assert_eq!(page.items().len(), 2);
        }

        #[tokio::test]
        async fn test_click_out_of_range_is_not_found() {
            let mut page = loaded().await;
            let err = page
                .click(&Locator::nth(selectors::CHECKBOX, 3))
                .await
                .unwrap_err();
            assert!(matches!(err, DriverError::ElementNotFound { index: 3, .. }));
        }
    }

    mod markup_tests {
        use super::*;

        #[tokio::test]
        async fn test_markup_is_escaped() {
            let mut page = loaded().await;
            add(&mut page, "<script>alert(\"xss\")</script>").await;
            let html = page.inner_html(selectors::LIST).await.unwrap();
            assert!(!html.contains("<script>"));
            assert!(html.contains("&lt;script&gt;"));
        }

        #[tokio::test]
        async fn test_raw_markup_fault() {
            let mut page = MockShoppingPage::new().with_fault(MockFault::RendersRawMarkup);
            page.goto("file:///index.html").await.unwrap();
            add(&mut page, "<script>alert(1)</script>").await;
            let html = page.inner_html(selectors::LIST).await.unwrap();
            assert!(html.contains("<script>"));
        }

        #[test]
        fn test_escape_html() {
            assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
        }
    }

    mod persistence_tests {
        use super::*;

        #[tokio::test]
        async fn test_theme_toggle_persists_and_survives_reload() {
            let mut page = loaded().await;
            page.click(&Locator::first(selectors::THEME_TOGGLE))
                .await
                .unwrap();
            assert_eq!(page.stored(app::THEME_STORAGE_KEY), Some("dark"));
            page.reload().await.unwrap();
            assert_eq!(
                page.attribute(selectors::ROOT, app::THEME_ATTRIBUTE)
                    .await
                    .unwrap(),
                Some("dark".to_string())
            );
        }

        #[tokio::test]
        async fn test_items_survive_reload() {
            let mut page = loaded().await;
            add(&mut page, "치즈").await;
            page.click(&Locator::first(selectors::CHECKBOX)).await.unwrap();
            page.reload().await.unwrap();
            assert_eq!(
                page.items(),
                &[MockItem {
                    text: "치즈".to_string(),
                    checked: true
                }]
            );
        }

        #[tokio::test]
        async fn test_forgetful_reload() {
            let mut page = MockShoppingPage::new().with_fault(MockFault::ForgetsOnReload);
            page.goto("file:///index.html").await.unwrap();
            add(&mut page, "치즈").await;
            page.reload().await.unwrap();
            assert!(page.items().is_empty());
            assert_eq!(page.theme(), Theme::Light);
        }

        #[tokio::test]
        async fn test_reload_before_goto_fails() {
            let mut page = MockShoppingPage::new();
            assert!(page.reload().await.is_err());
        }
    }

    mod layout_tests {
        use super::*;

        #[tokio::test]
        async fn test_container_width_tracks_viewport() {
            let mut page = loaded().await;
            assert_eq!(page.offset_width(selectors::CONTAINER).await.unwrap(), 600);
            page.set_viewport(&ViewportSpec::mobile()).await.unwrap();
            assert_eq!(page.offset_width(selectors::CONTAINER).await.unwrap(), 335);
            assert!(page.is_visible(selectors::CONTAINER).await.unwrap());
        }

        #[tokio::test]
        async fn test_screenshot_writes_png_of_viewport_size() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("shot.png");
            let mut page = loaded().await;
            page.set_viewport(&ViewportSpec::mobile()).await.unwrap();
            page.screenshot(&path).await.unwrap();
            assert_eq!(image::image_dimensions(&path).unwrap(), (375, 667));
        }

        #[tokio::test]
        async fn test_evaluate_only_answers_design_query() {
            let page = loaded().await;
            assert!(page.evaluate("document.title").await.is_err());
        }
    }
}
