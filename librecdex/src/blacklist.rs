//! Exclusion of records by originating source group.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::record::{RecordKind, SourceGroup, TableRecord};

/// Known source groups per record kind, each with an exclusion flag.
///
/// A group appears at most once per kind and absence means included. Entries
/// are never removed once seen, so toggles survive generations in which a
/// group is temporarily absent. Owned by the host's composition root and
/// passed explicitly to the views that consume it; the engine keeps no
/// process-wide statics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blacklist {
    entries: BTreeMap<RecordKind, BTreeMap<SourceGroup, bool>>,
    #[serde(skip)]
    revision: u64,
}

// The revision is runtime-only state: two blacklists are equal when their
// entries are, regardless of how they got there.
impl PartialEq for Blacklist {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Blacklist {}

impl Blacklist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic counter bumped by every mutation; views key their visible
    /// caches on it.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Unions newly seen groups into the known set for `kind`, included by
    /// default. Existing flags are untouched. Returns how many groups were
    /// new.
    pub fn merge_known_groups(
        &mut self,
        kind: RecordKind,
        groups: impl IntoIterator<Item = SourceGroup>,
    ) -> usize {
        let known = self.entries.entry(kind).or_default();
        let mut added = 0;
        for group in groups {
            known.entry(group).or_insert_with(|| {
                added += 1;
                false
            });
        }
        if added > 0 {
            self.revision += 1;
        }
        added
    }

    /// Unknown groups default to included.
    #[must_use]
    pub fn is_excluded(&self, kind: RecordKind, group: &SourceGroup) -> bool {
        self.entries
            .get(&kind)
            .and_then(|known| known.get(group))
            .copied()
            .unwrap_or(false)
    }

    /// Flips the exclusion flag and returns the new state. Toggling a group
    /// with no known records is permitted (pre-emptive exclusion): the group
    /// is inserted as excluded.
    pub fn toggle(&mut self, kind: RecordKind, group: SourceGroup) -> bool {
        let flag = self.entries.entry(kind).or_default().entry(group).or_insert(false);
        *flag = !*flag;
        self.revision += 1;
        *flag
    }

    pub fn set_excluded(&mut self, kind: RecordKind, group: SourceGroup, excluded: bool) {
        self.entries.entry(kind).or_default().insert(group, excluded);
        self.revision += 1;
    }

    /// Known groups of `kind` with their flags, in deterministic order, for
    /// the host's toggle list.
    pub fn known_groups(&self, kind: RecordKind) -> impl Iterator<Item = (&SourceGroup, bool)> {
        self.entries
            .get(&kind)
            .into_iter()
            .flat_map(|known| known.iter().map(|(group, &excluded)| (group, excluded)))
    }

    #[must_use]
    pub fn known_group_count(&self, kind: RecordKind) -> usize {
        self.entries.get(&kind).map_or(0, BTreeMap::len)
    }

    /// The order-preserving subsequence of `records` whose source group is
    /// not excluded.
    #[must_use]
    pub fn apply<'a, R: TableRecord>(&self, kind: RecordKind, records: &'a [R]) -> Vec<&'a R> {
        records
            .iter()
            .filter(|record| !self.is_excluded(kind, record.source_group()))
            .collect_vec()
    }
}

/// Distinct source groups present in one generation.
#[must_use]
pub fn collect_source_groups<R: TableRecord>(records: &[R]) -> BTreeSet<SourceGroup> {
    records
        .iter()
        .map(|record| record.source_group().clone())
        .collect()
}
