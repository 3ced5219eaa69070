//! Context menu tree sent to the helper.
//!
//! A menu is an ordered list of [`MenuItem`]s. Each node is exactly one of a
//! separator, a clickable leaf, or a submenu carrying its own children; the
//! role is inferred from which fields are populated (see [`MenuItem::role`]).
//! Absent optional fields are omitted on the wire, never sent as `null`.

use serde::{Deserialize, Serialize};

/// A single node of the menu tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Identity reported back in `clicked`. Required unless this is a separator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Absent means enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Tri-state: absent (no check mark slot), unchecked, checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Visual divider. All other fields are ignored when set.
    #[serde(default, skip_serializing_if = "is_false")]
    pub separator: bool,
    /// Children, present only for submenus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MenuItem>>,
}

/// Role of a menu node, inferred from its populated fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRole {
    Separator,
    Leaf,
    Submenu,
}

/// Structural problems found by [`validate_menu`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    /// A non-separator node has no (or an empty) id. `path` is the
    /// dot-separated index path from the root, e.g. `2.0`.
    #[error("menu item at {path} has no id")]
    MissingId { path: String },
}

impl MenuItem {
    /// Creates a clickable leaf.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Creates a separator.
    pub fn separator() -> Self {
        Self {
            separator: true,
            ..Self::default()
        }
    }

    /// Creates a submenu with the given children.
    pub fn submenu(id: impl Into<String>, title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            items: Some(items),
            ..Self::new(id, title)
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// Returns the role of this node.
    pub fn role(&self) -> MenuRole {
        if self.separator {
            MenuRole::Separator
        } else if self.items.is_some() {
            MenuRole::Submenu
        } else {
            MenuRole::Leaf
        }
    }

    /// Whether the node can be activated (absent `enabled` means true).
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Children of a submenu; empty for leaves and separators.
    pub fn children(&self) -> &[MenuItem] {
        match (self.separator, &self.items) {
            (false, Some(items)) => items,
            _ => &[],
        }
    }
}

/// Finds the first non-separator node with the given id, depth-first.
pub fn find_item<'a>(items: &'a [MenuItem], id: &str) -> Option<&'a MenuItem> {
    for item in items {
        if item.separator {
            continue;
        }
        if item.id.as_deref() == Some(id) {
            return Some(item);
        }
        if let Some(found) = find_item(item.children(), id) {
            return Some(found);
        }
    }
    None
}

/// Checks that every non-separator node carries a non-empty id.
pub fn validate_menu(items: &[MenuItem]) -> Result<(), MenuError> {
    validate_level(items, "")
}

fn validate_level(items: &[MenuItem], prefix: &str) -> Result<(), MenuError> {
    for (index, item) in items.iter().enumerate() {
        if item.separator {
            continue;
        }
        let path = if prefix.is_empty() {
            index.to_string()
        } else {
            format!("{prefix}.{index}")
        };
        if item.id.as_deref().is_none_or(str::is_empty) {
            return Err(MenuError::MissingId { path });
        }
        validate_level(item.children(), &path)?;
    }
    Ok(())
}

fn is_false(v: &bool) -> bool {
    !v
}
