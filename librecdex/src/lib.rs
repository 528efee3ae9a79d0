#![deny(unused_crate_dependencies)]
//! Record browser engine.
//!
//! Turns a host-supplied record generator into a filtered, sorted, selectable
//! visible sequence, and maintains a persistent per-kind blacklist of source
//! groups (plugins). The engine owns no rendering: hosts call
//! [`TableView::visible_list`] each frame and draw the result themselves.

pub mod blacklist;
pub mod dispatch;
pub mod persist;
pub mod record;
pub mod search;
pub mod selection;
pub mod sort;
pub mod table_view;
#[cfg(test)]
mod tests;

use derive_more::Display;

pub use blacklist::{Blacklist, collect_source_groups};
pub use dispatch::CommandDispatcher;
pub use persist::{default_blacklist_path, load_blacklist, save_blacklist};
pub use record::{RecordId, RecordKind, SortValue, SourceGroup, TableRecord};
pub use search::{SearchFilter, SearchMode};
pub use selection::{SelectMode, SelectionModel};
pub use sort::{SortDirection, SortEngine, SortSpec, compare_sort_values};
pub use table_view::TableView;

/// Configuration misuse, reported to the caller immediately.
///
/// Filter, sort, and selection operations never fail for valid input; only
/// requesting a key or field that was not registered when the view was built
/// is an error.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[display("sort key '{_0}' is not registered for this view")]
    UnknownSortKey(String),

    #[display("search field '{_0}' is not registered for this view")]
    UnknownSearchField(String),
}

impl std::error::Error for ViewError {}
