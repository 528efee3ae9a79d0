//! Stable ordering of the visible record list.

use std::cmp::Ordering;
use std::fmt::Display;

use derive_more::Display;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};

use crate::ViewError;
use crate::record::{SortValue, TableRecord};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Sequence)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec<F> {
    pub field: F,
    pub direction: SortDirection,
}

/// At most one active sort key; no key set means identity order.
#[derive(Debug, Clone)]
pub struct SortEngine<F> {
    registered: Vec<F>,
    active: Option<SortSpec<F>>,
}

impl<F: Copy + Eq + Display> SortEngine<F> {
    #[must_use]
    pub fn new(registered: Vec<F>) -> Self {
        Self {
            registered,
            active: None,
        }
    }

    /// Replaces the current sort state. Fails fast for keys not registered
    /// when the view was built.
    pub fn set_key(&mut self, field: F, ascending: bool) -> Result<(), ViewError> {
        self.ensure_registered(field)?;
        self.active = Some(SortSpec {
            field,
            direction: if ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            },
        });
        Ok(())
    }

    /// Header-click semantics: clicking the active column toggles direction,
    /// clicking any other column selects it ascending.
    pub fn toggle(&mut self, field: F) -> Result<(), ViewError> {
        self.ensure_registered(field)?;
        self.active = Some(match self.active {
            Some(spec) if spec.field == field => SortSpec {
                field,
                direction: spec.direction.reversed(),
            },
            _ => SortSpec {
                field,
                direction: SortDirection::Ascending,
            },
        });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    #[must_use]
    pub fn spec(&self) -> Option<SortSpec<F>> {
        self.active
    }

    #[must_use]
    pub fn registered_keys(&self) -> &[F] {
        &self.registered
    }

    fn ensure_registered(&self, field: F) -> Result<(), ViewError> {
        if self.registered.contains(&field) {
            Ok(())
        } else {
            Err(ViewError::UnknownSortKey(field.to_string()))
        }
    }

    /// Stable sort of `records` under the active key; ties keep their input
    /// order, no key is the identity.
    #[must_use]
    pub fn apply<'a, R: TableRecord<Field = F>>(&self, mut records: Vec<&'a R>) -> Vec<&'a R> {
        let Some(spec) = self.active else {
            return records;
        };
        records.sort_by(|left, right| {
            ordered(
                compare_sort_values(&left.sort_value(spec.field), &right.sort_value(spec.field)),
                spec.direction,
            )
        });
        records
    }

    /// Index-based variant of [`Self::apply`] for callers that cache row
    /// indices instead of references.
    pub fn sort_indices<R: TableRecord<Field = F>>(&self, records: &[R], indices: &mut [usize]) {
        let Some(spec) = self.active else {
            return;
        };
        indices.sort_by(|&left, &right| {
            ordered(
                compare_sort_values(
                    &records[left].sort_value(spec.field),
                    &records[right].sort_value(spec.field),
                ),
                spec.direction,
            )
        });
    }
}

fn ordered(ord: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

fn sort_value_rank(value: &SortValue) -> u8 {
    match value {
        SortValue::Numeric(_) => 0,
        SortValue::Text(_) => 1,
        SortValue::None => 2,
    }
}

/// Numeric values compare via `total_cmp`, text case-insensitively with
/// natural numeric ordering, `None` after everything else.
#[must_use]
pub fn compare_sort_values(a: &SortValue, b: &SortValue) -> Ordering {
    let rank_a = sort_value_rank(a);
    let rank_b = sort_value_rank(b);
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }

    match (a, b) {
        (SortValue::Numeric(left), SortValue::Numeric(right)) => left.total_cmp(right),
        (SortValue::Text(left), SortValue::Text(right)) => {
            numeric_sort::cmp(&left.to_lowercase(), &right.to_lowercase())
        }
        _ => Ordering::Equal,
    }
}
