//! Table view-model: derive a displayable page from a full dataset.
//!
//! Everything here is pure and synchronous. The caller owns the rows and
//! the UI state; [`view::compute_view`] projects them into the rows,
//! page count, and page-number window a table widget needs to render.
//! Identical inputs always produce identical output.

pub mod state;
pub mod view;

pub use state::{Filter, PageState, SelectionSet, Sort, SortDirection, TableState};
pub use view::{
    Column, SelectionSummary, TableView, compute_view, page_window, selection_summary,
    toggle_sort,
};
