//! Selection state for one table view.

use std::collections::BTreeSet;

use crate::record::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Clear the selection and select exactly the clicked record.
    Replace,
    /// Toggle the clicked record's membership when click-to-add is enabled;
    /// otherwise behaves as [`SelectMode::Replace`].
    ToggleAdd,
}

/// Selected record identifiers plus the click-to-add configuration.
///
/// Identifiers may go stale when the raw collection regenerates; the owning
/// view prunes them on refresh. The click amount is the quantity forwarded to
/// command dispatch on activation, not a row-span multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    rows: BTreeSet<RecordId>,
    anchor: Option<RecordId>,
    click_amount: u32,
    double_click_to_add: bool,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self {
            rows: BTreeSet::new(),
            anchor: None,
            click_amount: 1,
            double_click_to_add: false,
        }
    }
}

impl SelectionModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one click. Returns true if the selection changed.
    pub fn select(&mut self, id: RecordId, mode: SelectMode) -> bool {
        match mode {
            SelectMode::ToggleAdd if self.double_click_to_add => {
                if self.rows.remove(&id) {
                    if self.anchor == Some(id) {
                        self.anchor = None;
                    }
                } else {
                    self.rows.insert(id);
                    self.anchor = Some(id);
                }
                true
            }
            _ => {
                if self.rows.len() == 1 && self.rows.contains(&id) {
                    return false;
                }
                self.rows.clear();
                self.rows.insert(id);
                self.anchor = Some(id);
                true
            }
        }
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.rows.contains(&id)
    }

    #[must_use]
    pub fn anchor(&self) -> Option<RecordId> {
        self.anchor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.anchor = None;
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.rows.iter().copied()
    }

    /// Drops identifiers for which `keep` is false. Returns how many were
    /// removed.
    pub fn prune(&mut self, keep: impl Fn(RecordId) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|&id| keep(id));
        if let Some(anchor) = self.anchor
            && !self.rows.contains(&anchor)
        {
            self.anchor = None;
        }
        before - self.rows.len()
    }

    pub fn set_click_amount(&mut self, amount: u32) {
        self.click_amount = amount.max(1);
    }

    #[must_use]
    pub fn click_amount(&self) -> u32 {
        self.click_amount
    }

    pub fn set_double_click_to_add(&mut self, enabled: bool) {
        self.double_click_to_add = enabled;
    }

    #[must_use]
    pub fn double_click_to_add(&self) -> bool {
        self.double_click_to_add
    }

    /// How many selected records appear in `visible`.
    #[must_use]
    pub fn count_visible(&self, visible: &[RecordId]) -> usize {
        visible.iter().filter(|id| self.rows.contains(id)).count()
    }

    /// How many selected records are filtered out of `visible`.
    #[must_use]
    pub fn count_hidden(&self, visible: &[RecordId]) -> usize {
        self.rows.len() - self.count_visible(visible)
    }
}
