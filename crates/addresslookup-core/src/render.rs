// crates/addresslookup-core/src/render.rs

//! # Presentation Renderer
//!
//! A pure projection of session state into display rows. The host turns the
//! rows into whatever its list container needs (`<li>` elements, terminal
//! lines, ...); nothing here knows about markup.

use crate::model::{SuggestionItem, SuggestionKind};
use serde::{Deserialize, Serialize};

/// Counts above this are shown as `"100+"`.
pub const MATCH_COUNT_CAP: u32 = 100;

/// What a row does when confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowKind {
    /// Back-affordance to the cache entry at `entry`.
    Back { entry: usize },
    Suggestion { id: String, kind: SuggestionKind },
    /// Informational row shown when a lookup returned nothing.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub kind: RowKind,
    pub label: String,
    /// Location text, omitted in single-summary mode.
    pub secondary: Option<String>,
    /// `"100+"` or the exact count, only for counts above one.
    pub match_count: Option<String>,
    pub selected: bool,
}

impl DisplayRow {
    /// Plain-text rendering: `label secondary (N addresses)`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        if matches!(self.kind, RowKind::Back { .. }) {
            out.push_str("< ");
        }
        out.push_str(&self.label);
        if let Some(secondary) = &self.secondary {
            out.push(' ');
            out.push_str(secondary);
        }
        if let Some(count) = &self.match_count {
            out.push_str(&format!(" ({count} addresses)"));
        }
        out
    }

    pub fn is_back(&self) -> bool {
        matches!(self.kind, RowKind::Back { .. })
    }
}

/// The parent level a back row points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackRow<'a> {
    pub entry: usize,
    pub label: &'a str,
}

/// Everything [`render`] looks at.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub suggestions: &'a [SuggestionItem],
    /// `Some` only when the hierarchy is deeper than one level.
    pub back: Option<BackRow<'a>>,
    pub cursor: Option<usize>,
    pub single_summary: bool,
    pub placeholder: &'a str,
}

impl RenderView<'_> {
    /// Rows the cursor can land on: suggestions plus the back row, if any.
    /// Zero when only the placeholder is shown.
    pub fn effective_count(&self) -> usize {
        if self.suggestions.is_empty() {
            0
        } else {
            self.suggestions.len() + usize::from(self.back.is_some())
        }
    }
}

pub fn format_match_count(count: u32) -> Option<String> {
    match count {
        0 | 1 => None,
        c if c > MATCH_COUNT_CAP => Some(format!("{MATCH_COUNT_CAP}+")),
        c => Some(c.to_string()),
    }
}

pub fn render(view: &RenderView<'_>) -> Vec<DisplayRow> {
    if view.suggestions.is_empty() {
        return vec![DisplayRow {
            kind: RowKind::Placeholder,
            label: view.placeholder.to_string(),
            secondary: None,
            match_count: None,
            selected: false,
        }];
    }

    let mut rows = Vec::with_capacity(view.effective_count());

    if let Some(back) = view.back {
        rows.push(DisplayRow {
            kind: RowKind::Back { entry: back.entry },
            label: back.label.to_string(),
            secondary: None,
            match_count: None,
            selected: false,
        });
    }

    for item in view.suggestions {
        let secondary = if view.single_summary || item.location_summary.is_empty() {
            None
        } else {
            Some(item.location_summary.clone())
        };
        rows.push(DisplayRow {
            kind: RowKind::Suggestion {
                id: item.id.clone(),
                kind: item.kind,
            },
            label: item.summary_line.clone(),
            secondary,
            match_count: format_match_count(item.match_count),
            selected: false,
        });
    }

    if let Some(row) = view.cursor.and_then(|i| rows.get_mut(i)) {
        row.selected = true;
    }
    rows
}
