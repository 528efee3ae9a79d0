//! Record identity and the typed field-accessor seam.

use std::borrow::Cow;
use std::fmt::Display;
use std::hash::Hash;

use derive_more::Display;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};

/// Stable record identity (the host's form identifier).
///
/// Selection and exclusion compare by identity, never by value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[display("{_0:08X}")]
pub struct RecordId(pub u64);

/// Originating plugin/package of a record; the unit of blacklist exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub struct SourceGroup(pub String);

impl SourceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceGroup {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Record kinds the host partitions its data by. Each kind carries its own
/// blacklist map.
#[derive(
    Debug,
    Display,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Sequence,
)]
pub enum RecordKind {
    Quest,
    Item,
    Npc,
    Object,
    Cell,
}

/// Sortable value extracted from one record field.
///
/// Numeric values compare numerically, text compares case-insensitively with
/// natural numeric ordering, and `None` orders after everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    None,
    Numeric(f64),
    Text(String),
}

/// One browsable record. Records are value types copied into containers; the
/// engine never shares mutable ownership with the host.
///
/// `Field` is the fixed enumeration of this kind's columns. Fields resolve to
/// typed accessors here instead of string-keyed lookups, so an unknown field
/// is unrepresentable and the per-view registration check in
/// [`crate::TableView`] is the only runtime validation left.
pub trait TableRecord: Clone {
    type Field: Copy + Eq + Hash + Display + Sequence + 'static;

    fn id(&self) -> RecordId;

    fn name(&self) -> &str;

    fn source_group(&self) -> &SourceGroup;

    /// Searchable text of one field.
    fn field_text(&self, field: Self::Field) -> Cow<'_, str>;

    /// Sortable value of one field.
    fn sort_value(&self, field: Self::Field) -> SortValue;
}
