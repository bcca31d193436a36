//! Surface of the shopping-list application under test.
//!
//! Selectors, storage keys and label formats the checks rely on. The harness
//! only observes these; it never owns the markup behind them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text the document title must contain once the app has loaded
pub const APP_TITLE: &str = "쇼핑 리스트";

/// CSS selectors exposed by the app
pub mod selectors {
    /// Text input for new items
    pub const ITEM_INPUT: &str = "#itemInput";
    /// Submit button for new items
    pub const ADD_BUTTON: &str = "#addBtn";
    /// List container
    pub const LIST: &str = ".shopping-list";
    /// List container while it has no children
    pub const EMPTY_LIST: &str = ".shopping-list:empty";
    /// One rendered item row
    pub const ITEM: &str = ".shopping-item";
    /// Text span inside an item row
    pub const ITEM_TEXT: &str = ".item-text";
    /// Completion toggle inside an item row
    pub const CHECKBOX: &str = ".checkbox";
    /// Delete control inside an item row (revealed on hover)
    pub const DELETE_BUTTON: &str = ".delete-btn";
    /// Statistics region
    pub const STATS: &str = "#stats";
    /// Light/dark switch
    pub const THEME_TOGGLE: &str = "#themeToggle";
    /// Element carrying the theme marker
    pub const ROOT: &str = "html";
    /// Main layout container
    pub const CONTAINER: &str = ".container";
    /// Page header
    pub const HEADER: &str = "header";
}

/// Class set on an item row when it is checked
pub const CHECKED_CLASS: &str = "checked";

/// Attribute on the root element holding the current theme
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Durable storage key for the serialized item list
pub const ITEMS_STORAGE_KEY: &str = "shoppingList";

/// Durable storage key for the theme preference
pub const THEME_STORAGE_KEY: &str = "theme";

/// Key name sent to confirm the item input
pub const CONFIRM_KEY: &str = "Enter";

/// Statistics token for the total item count, e.g. `5개`
#[must_use]
pub fn total_label(count: usize) -> String {
    format!("{count}개")
}

/// Statistics token for the completed item count, e.g. `3개 완료`
#[must_use]
pub fn completed_label(count: usize) -> String {
    format!("{count}개 완료")
}

/// Display mode of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light mode (initial state)
    #[default]
    Light,
    /// Dark mode
    Dark,
}

impl Theme {
    /// Marker value as written to `data-theme` and durable storage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme marker '{other}'")),
        }
    }
}
