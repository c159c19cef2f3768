// crates/addresslookup-core/src/selection.rs

//! # Selection Controller
//!
//! Cursor arithmetic and the key → action table. The session applies the
//! resulting [`NavAction`]s (see [`AutocompleteSession::key`]).
//!
//! [`AutocompleteSession::key`]: crate::session::AutocompleteSession::key

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Navigation actions a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavAction {
    Move(Direction),
    /// Select the row under the cursor.
    Confirm,
    /// Select the row under the cursor, or close the list if there is none.
    ConfirmOrClose,
    /// Close the list and restore the input text.
    Dismiss,
}

/// Default bindings. Both the standard and the legacy (`Up`, `Esc`) key
/// names are accepted.
pub const DEFAULT_BINDINGS: &[(&str, NavAction)] = &[
    ("ArrowUp", NavAction::Move(Direction::Up)),
    ("Up", NavAction::Move(Direction::Up)),
    ("ArrowDown", NavAction::Move(Direction::Down)),
    ("Down", NavAction::Move(Direction::Down)),
    ("Enter", NavAction::Confirm),
    ("Tab", NavAction::ConfirmOrClose),
    ("Escape", NavAction::Dismiss),
    ("Esc", NavAction::Dismiss),
];

/// Data-driven key dispatch table.
///
/// # Examples
///
/// ```rust
/// use addresslookup_core::selection::{Direction, Keymap, NavAction};
///
/// let mut keymap = Keymap::default();
/// keymap.bind("PageDown", NavAction::Move(Direction::Down));
///
/// assert_eq!(keymap.action_for("PageDown"), Some(NavAction::Move(Direction::Down)));
/// assert_eq!(keymap.action_for("Enter"), Some(NavAction::Confirm));
/// assert_eq!(keymap.action_for("a"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<(String, NavAction)>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(key, action)| ((*key).to_string(), *action))
                .collect(),
        }
    }
}

impl Keymap {
    pub fn empty() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Binds `key` to `action`, replacing any previous binding of `key`.
    pub fn bind(&mut self, key: impl Into<String>, action: NavAction) -> &mut Self {
        let key = key.into();
        match self.bindings.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = action,
            None => self.bindings.push((key, action)),
        }
        self
    }

    pub fn unbind(&mut self, key: &str) {
        self.bindings.retain(|(k, _)| k != key);
    }

    pub fn action_for(&self, key: &str) -> Option<NavAction> {
        self.bindings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, action)| *action)
    }
}

/// Next cursor position over `count` rows, wrapping at both ends.
///
/// From no selection, `Down` lands on the first row and `Up` on the last.
/// With zero rows there is nothing to select and `None` is returned.
pub fn step_cursor(cursor: Option<usize>, direction: Direction, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let next = match (cursor, direction) {
        (None, Direction::Down) => 0,
        (None, Direction::Up) => count - 1,
        (Some(i), Direction::Down) => (i + 1) % count,
        (Some(i), Direction::Up) => (i % count + count - 1) % count,
    };
    Some(next)
}
