//! View derivation: filter, sort, paginate, and the page-number window.
//!
//! [`compute_view`] is the single entry point. It never fails and never
//! mutates its inputs; an out-of-range page index is clamped, an empty
//! result set still yields one (empty) page.

use crate::state::{SelectionSet, Sort, SortDirection, TableState};

/// Column definition: key, header label, and how to read a cell value
/// out of a row.
pub struct Column<T> {
    /// Stable key referenced by filter and sort state.
    pub key: &'static str,
    /// Header label for display.
    pub header: &'static str,
    /// Whether [`toggle_sort`] responds to this column.
    pub sortable: bool,
    /// Extracts the cell's string representation.
    pub accessor: fn(&T) -> String,
}

impl<T> Column<T> {
    /// Creates a non-sortable column.
    pub fn new(key: &'static str, header: &'static str, accessor: fn(&T) -> String) -> Self {
        Self {
            key,
            header,
            sortable: false,
            accessor,
        }
    }

    /// Marks the column as sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<T> {}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

/// One renderable page of a table, derived from the full dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a, T> {
    /// Visible rows for the current page, paired with their index in the
    /// source slice (the row's identity for selection).
    pub rows: Vec<(usize, &'a T)>,
    /// Source indices of every row that survived the filter, in display
    /// order. `rows` is the current page's slice of this set.
    pub filtered_indices: Vec<usize>,
    /// Total number of pages; at least 1 even when nothing matched.
    pub page_count: usize,
    /// Requested page index clamped into `[0, page_count - 1]`.
    pub current_page: usize,
    /// Effective page size (requested size, minimum 1).
    pub page_size: usize,
    /// Page indices to render as numbered controls.
    pub page_window: Vec<usize>,
    /// Whether to render an ellipsis after the window.
    pub show_ellipsis: bool,
    /// Whether to render an explicit control for the last page.
    pub trailing_last_page: bool,
    /// Previous-page control enabled.
    pub can_previous: bool,
    /// Next-page control enabled.
    pub can_next: bool,
}

impl<T> TableView<'_, T> {
    /// Number of rows that survived the filter.
    pub fn filtered_count(&self) -> usize {
        self.filtered_indices.len()
    }

    /// True when the filter matched nothing and the caller should render
    /// its "no results" placeholder.
    pub fn is_empty(&self) -> bool {
        self.filtered_indices.is_empty()
    }
}

/// Derives the visible page for `rows` under `state`.
///
/// Steps, in order:
/// 1. Filter: retain rows whose filter-column value contains the filter
///    text (case-sensitive substring). Empty text, or a filter column
///    not present in `columns`, retains everything.
/// 2. Sort: stable comparison on the sort column's accessor value; ties
///    keep their relative input order. No sort state, or an unknown sort
///    column, keeps input order.
/// 3. Paginate: `page_count = max(1, ceil(filtered / size))`, page index
///    clamped, then slice.
/// 4. Window: see [`page_window`].
pub fn compute_view<'a, T>(
    rows: &'a [T],
    columns: &[Column<T>],
    state: &TableState,
) -> TableView<'a, T> {
    let find = |key: &str| columns.iter().find(|c| c.key == key);

    let mut filtered: Vec<usize> = match state
        .filter
        .as_ref()
        .filter(|f| !f.is_empty())
        .and_then(|f| find(&f.column).map(|c| (c.accessor, f.text.as_str())))
    {
        Some((accessor, text)) => (0..rows.len())
            .filter(|&i| accessor(&rows[i]).contains(text))
            .collect(),
        None => (0..rows.len()).collect(),
    };

    if let Some(sort) = &state.sort {
        if let Some(column) = find(&sort.column) {
            let accessor = column.accessor;
            // Vec::sort_by is stable, so equal keys keep input order in
            // both directions.
            filtered.sort_by(|&a, &b| {
                let ord = accessor(&rows[a]).cmp(&accessor(&rows[b]));
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
    }

    let page_size = state.page.size.max(1);
    let page_count = filtered.len().div_ceil(page_size).max(1);
    let current_page = state.page.index.min(page_count - 1);

    let page_rows: Vec<(usize, &'a T)> = filtered
        .iter()
        .skip(current_page * page_size)
        .take(page_size)
        .map(|&i| (i, &rows[i]))
        .collect();

    let window = page_window(page_count, current_page);
    let show_ellipsis = page_count > 5 && current_page < page_count - 3;
    let trailing_last_page = page_count > 5 && !window.contains(&(page_count - 1));

    TableView {
        rows: page_rows,
        filtered_indices: filtered,
        page_count,
        current_page,
        page_size,
        page_window: window,
        show_ellipsis,
        trailing_last_page,
        can_previous: current_page > 0,
        can_next: current_page + 1 < page_count,
    }
}

/// Computes the bounded window of page numbers to render.
///
/// Up to five pages are shown: all of them when `page_count <= 5`, the
/// first five near the start, the last five near the end, and otherwise
/// the current page with two neighbors on each side.
pub fn page_window(page_count: usize, current_page: usize) -> Vec<usize> {
    if page_count <= 5 {
        return (0..page_count).collect();
    }

    let mut start = current_page.saturating_sub(2);
    let mut end = (current_page + 2).min(page_count - 1);

    if current_page <= 2 {
        end = 4;
    } else if current_page >= page_count - 3 {
        start = page_count - 5;
    }

    (start..=end).collect()
}

/// Cycles the sort state for `key`: ascending → descending → none on the
/// same column; a different column always starts ascending. Unknown or
/// non-sortable keys leave the state unchanged.
pub fn toggle_sort<T>(current: Option<&Sort>, columns: &[Column<T>], key: &str) -> Option<Sort> {
    match columns.iter().find(|c| c.key == key) {
        Some(column) if column.sortable => {}
        _ => return current.cloned(),
    }

    match current {
        Some(sort) if sort.column == key => match sort.direction {
            SortDirection::Ascending => Some(Sort::descending(key)),
            SortDirection::Descending => None,
        },
        _ => Some(Sort::ascending(key)),
    }
}

/// Status line content: selection count when anything visible is
/// selected, otherwise the "showing X to Y of Z" range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSummary {
    /// "N of M row(s) selected."
    Selected { selected: usize, filtered: usize },
    /// "Showing `start` to `end` of `filtered` results" (1-based).
    Showing {
        start: usize,
        end: usize,
        filtered: usize,
    },
}

/// Summarizes the selection against the current view.
///
/// Only selected rows that survived the filter count toward `selected`;
/// entries hidden by the filter stay in the set but are not reported.
pub fn selection_summary<T>(
    selection: &SelectionSet,
    view: &TableView<'_, T>,
) -> SelectionSummary {
    let selected = selection
        .iter()
        .filter(|i| view.filtered_indices.contains(i))
        .count();

    if selected > 0 {
        SelectionSummary::Selected {
            selected,
            filtered: view.filtered_count(),
        }
    } else {
        SelectionSummary::Showing {
            start: view.current_page * view.page_size + 1,
            end: ((view.current_page + 1) * view.page_size).min(view.filtered_count()),
            filtered: view.filtered_count(),
        }
    }
}
