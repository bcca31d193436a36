//! Session state shared by the checks.
//!
//! A [`Session`] owns the driver for the whole run plus what the harness
//! believes the page should look like: the tracked [`Theme`] and a [`Ledger`]
//! of items added and checked. Expected statistics are derived from the
//! ledger, so the checks never hard-code counts.

use crate::app::{self, selectors, Theme};
use crate::config::{HarnessConfig, ViewportSpec};
use crate::driver::PageDriver;
use crate::error::DriverResult;
use crate::locator::Locator;
use crate::wait::{wait_for, WaitCondition, WaitOptions, WaitResult};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Record of the items the harness has added and their checked state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    checked: Vec<bool>,
}

impl Ledger {
    /// Empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new unchecked item at the end of the list
    pub fn add(&mut self) {
        self.checked.push(false);
    }

    /// Flip the item at `index`; returns the new state
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let state = self.checked.get_mut(index)?;
        *state = !*state;
        Some(*state)
    }

    /// Forget the item at `index`
    pub fn remove(&mut self, index: usize) -> bool {
        if index < self.checked.len() {
            self.checked.remove(index);
            true
        } else {
            false
        }
    }

    /// Whether the item at `index` is checked
    #[must_use]
    pub fn is_checked(&self, index: usize) -> Option<bool> {
        self.checked.get(index).copied()
    }

    /// Number of items
    #[must_use]
    pub fn total(&self) -> usize {
        self.checked.len()
    }

    /// Number of checked items
    #[must_use]
    pub fn completed(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }

    /// Expected total statistic, e.g. `5개`
    #[must_use]
    pub fn total_label(&self) -> String {
        app::total_label(self.total())
    }

    /// Expected completed statistic, e.g. `3개 완료`
    #[must_use]
    pub fn completed_label(&self) -> String {
        app::completed_label(self.completed())
    }
}

/// How an item is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    /// Click the add button
    Click,
    /// Press the confirm key in the input
    Enter,
}

/// Page state a settle wait polls for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Exactly `expected` elements match `selector`
    Count {
        /// CSS selector
        selector: String,
        /// Expected match count
        expected: usize,
    },
    /// Some element matching `selector` has exactly `text` as its content
    TextsInclude {
        /// CSS selector
        selector: String,
        /// Expected text
        text: String,
    },
    /// The first element matching `selector` contains `text`
    TextContains {
        /// CSS selector
        selector: String,
        /// Expected fragment
        text: String,
    },
    /// The located element does (or does not) carry `class`
    Class {
        /// Element to inspect
        locator: Locator,
        /// Class name
        class: String,
        /// Whether the class should be present
        present: bool,
    },
    /// The first element matching `selector` has attribute `name` == `value`
    Attribute {
        /// CSS selector
        selector: String,
        /// Attribute name
        name: String,
        /// Expected value
        value: String,
    },
    /// The first element matching `selector` is visible
    Visible {
        /// CSS selector
        selector: String,
    },
}

impl Expectation {
    /// Observe the page once
    pub async fn holds<D: PageDriver + ?Sized>(&self, driver: &D) -> DriverResult<bool> {
        Ok(match self {
            Self::Count { selector, expected } => driver.count(selector).await? == *expected,
            Self::TextsInclude { selector, text } => driver
                .text_contents(selector)
                .await?
                .iter()
                .any(|t| t == text),
            Self::TextContains { selector, text } => driver
                .text_contents(selector)
                .await?
                .first()
                .is_some_and(|t| t.contains(text.as_str())),
            Self::Class {
                locator,
                class,
                present,
            } => driver.has_class(locator, class).await? == *present,
            Self::Attribute {
                selector,
                name,
                value,
            } => driver.attribute(selector, name).await?.as_deref() == Some(value.as_str()),
            Self::Visible { selector } => driver.is_visible(selector).await?,
        })
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count { selector, expected } => write!(f, "{expected} x '{selector}'"),
            Self::TextsInclude { selector, text } => write!(f, "'{selector}' includes \"{text}\""),
            Self::TextContains { selector, text } => write!(f, "'{selector}' contains \"{text}\""),
            Self::Class {
                locator,
                class,
                present: true,
            } => write!(f, "'{locator}' has class '{class}'"),
            Self::Class {
                locator,
                class,
                present: false,
            } => write!(f, "'{locator}' lacks class '{class}'"),
            Self::Attribute {
                selector,
                name,
                value,
            } => write!(f, "'{selector}[{name}]' == \"{value}\""),
            Self::Visible { selector } => write!(f, "'{selector}' visible"),
        }
    }
}

/// An expectation bound to a driver, pollable by [`wait_for`]
struct Settled<'a, D: ?Sized> {
    driver: &'a D,
    expectation: &'a Expectation,
}

#[async_trait]
impl<'a, D: PageDriver + ?Sized> WaitCondition for Settled<'a, D> {
    async fn check(&self) -> DriverResult<bool> {
        self.expectation.holds(self.driver).await
    }

    fn description(&self) -> String {
        self.expectation.to_string()
    }
}

/// Driver plus the state the run expects the page to be in
#[derive(Debug)]
pub struct Session<D> {
    driver: D,
    wait: WaitOptions,
    quiet_period: Duration,
    theme: Theme,
    ledger: Ledger,
}

impl<D: PageDriver> Session<D> {
    /// Start a session on a freshly opened page
    #[must_use]
    pub fn new(driver: D, config: &HarnessConfig) -> Self {
        Self {
            driver,
            wait: config.wait,
            quiet_period: config.quiet_period(),
            theme: Theme::default(),
            ledger: Ledger::new(),
        }
    }

    /// The underlying driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// The underlying driver, mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give the driver back
    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Theme the page should currently show
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Items the harness has added
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Poll until `expectation` holds or the settle timeout elapses
    pub async fn settle(&self, expectation: &Expectation) -> DriverResult<WaitResult> {
        let condition = Settled {
            driver: &self.driver,
            expectation,
        };
        wait_for(&condition, &self.wait).await
    }

    /// Let the page run for the quiet period, for checks that expect no change
    pub async fn quiet(&self) {
        tokio::time::sleep(self.quiet_period).await;
    }

    /// Type `text` into the item input and submit it.
    ///
    /// Visible text is recorded in the ledger and settled on the new count;
    /// blank text is followed by the quiet period instead.
    pub async fn add_item(&mut self, text: &str, submit: Submit) -> DriverResult<()> {
        let before = self.driver.count(selectors::ITEM).await?;
        self.driver.fill(selectors::ITEM_INPUT, text).await?;
        match submit {
            Submit::Click => {
                self.driver
                    .click(&Locator::first(selectors::ADD_BUTTON))
                    .await?;
            }
            Submit::Enter => {
                self.driver
                    .press(selectors::ITEM_INPUT, app::CONFIRM_KEY)
                    .await?;
            }
        }

        if text.trim().is_empty() {
            self.quiet().await;
            return Ok(());
        }
        self.ledger.add();
        self.settle(&Expectation::Count {
            selector: selectors::ITEM.to_string(),
            expected: before + 1,
        })
        .await?;
        tracing::debug!(text, total = self.ledger.total(), "item added");
        Ok(())
    }

    /// Click the checkbox of the item at `index` and settle on its class
    pub async fn toggle_item(&mut self, index: usize) -> DriverResult<()> {
        self.driver
            .click(&Locator::nth(selectors::CHECKBOX, index))
            .await?;
        let present = self.ledger.toggle(index).unwrap_or(true);
        self.settle(&Expectation::Class {
            locator: Locator::nth(selectors::ITEM, index),
            class: app::CHECKED_CLASS.to_string(),
            present,
        })
        .await?;
        Ok(())
    }

    /// Hover the item at `index`, click its delete control, settle on the count
    pub async fn delete_item(&mut self, index: usize) -> DriverResult<()> {
        let before = self.driver.count(selectors::ITEM).await?;
        self.driver
            .hover(&Locator::nth(selectors::ITEM, index))
            .await?;
        self.driver
            .click(&Locator::nth(selectors::DELETE_BUTTON, index))
            .await?;
        self.ledger.remove(index);
        self.settle(&Expectation::Count {
            selector: selectors::ITEM.to_string(),
            expected: before.saturating_sub(1),
        })
        .await?;
        Ok(())
    }

    /// Click the theme switch, flip the tracked theme and settle on the marker
    pub async fn toggle_theme(&mut self) -> DriverResult<Theme> {
        self.driver
            .click(&Locator::first(selectors::THEME_TOGGLE))
            .await?;
        self.theme = self.theme.toggled();
        self.settle(&self.theme_expectation()).await?;
        tracing::debug!(theme = %self.theme, "theme toggled");
        Ok(self.theme)
    }

    /// Toggle until the tracked theme is `theme`
    pub async fn ensure_theme(&mut self, theme: Theme) -> DriverResult<()> {
        if self.theme != theme {
            self.toggle_theme().await?;
        }
        Ok(())
    }

    /// Reload the document; tracked state is kept, since the page should restore it
    pub async fn reload(&mut self) -> DriverResult<()> {
        self.driver.reload().await?;
        self.settle(&self.theme_expectation()).await?;
        Ok(())
    }

    /// Resize the viewport and settle on the container being visible
    pub async fn resize(&mut self, viewport: &ViewportSpec) -> DriverResult<()> {
        self.driver.set_viewport(viewport).await?;
        self.settle(&Expectation::Visible {
            selector: selectors::CONTAINER.to_string(),
        })
        .await?;
        Ok(())
    }

    fn theme_expectation(&self) -> Expectation {
        Expectation::Attribute {
            selector: selectors::ROOT.to_string(),
            name: app::THEME_ATTRIBUTE.to_string(),
            value: self.theme.as_str().to_string(),
        }
    }
}
