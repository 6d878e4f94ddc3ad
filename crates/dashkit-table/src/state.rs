//! Table UI state: filter, sort, pagination, and row selection.
//!
//! State is plain data, serializable so callers can persist it across
//! sessions. All derivation happens in [`crate::view`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Free-text filter scoped to a single column.
///
/// An empty `text` matches every row. A `column` that names no known
/// column disables filtering entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Key of the column the filter applies to.
    pub column: String,
    /// Substring to match, case-sensitive.
    pub text: String,
}

impl Filter {
    pub fn new(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            text: text.into(),
        }
    }

    /// Returns true if this filter retains every row.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Sort direction for a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort: one column, one direction. Absence (`Option<Sort>`)
/// means unsorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub column: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Current page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// Zero-based page index. Clamped into range during view computation.
    pub index: usize,
    /// Rows per page. Treated as at least 1.
    pub size: usize,
}

impl PageState {
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self { index: 0, size: 10 }
    }
}

/// Selected rows, identified by their index in the *source* row slice.
///
/// Entries are intentionally not pruned when a filter hides a selected
/// row; selection persists across filter changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    indices: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the row if absent, removes it if present.
    pub fn toggle(&mut self, index: usize) {
        if !self.indices.remove(&index) {
            self.indices.insert(index);
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Iterates selected row indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

/// Aggregate UI state for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    pub filter: Option<Filter>,
    pub sort: Option<Sort>,
    pub page: PageState,
    pub selection: SelectionSet,
}
