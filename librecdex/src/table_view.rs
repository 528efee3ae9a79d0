//! The table view orchestrator.
//!
//! Binds one record source to a filtered, sorted, selectable visible
//! sequence. The pipeline is exclusion first (coarsest, cheapest), then text
//! filter, then sort over the smallest remaining set; the result is memoized
//! on revision counters so redundant per-frame calls are cheap.

use std::collections::HashSet;

use itertools::Itertools;
use tracing::{debug, info};

use crate::ViewError;
use crate::blacklist::{Blacklist, collect_source_groups};
use crate::dispatch::CommandDispatcher;
use crate::record::{RecordId, RecordKind, TableRecord};
use crate::search::{SearchFilter, SearchMode};
use crate::selection::{SelectMode, SelectionModel};
use crate::sort::SortEngine;

/// Host-supplied generator for the raw collection. Must not mutate view
/// state; may be expensive, so it is invoked exactly once per
/// [`TableView::refresh`].
pub type RecordSource<R> = Box<dyn Fn() -> Vec<R>>;

/// Inputs the memoized visible sequence was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisibleKey {
    view_revision: u64,
    blacklist_revision: u64,
}

/// One browsable view over a generated record collection.
///
/// Construction is initialization: the record source and the allowed
/// search/sort fields are fixed up front, so every later operation runs on a
/// fully configured view.
pub struct TableView<R: TableRecord> {
    kind: RecordKind,
    generator: RecordSource<R>,
    raw: Vec<R>,
    search: SearchFilter<R::Field>,
    sort: SortEngine<R::Field>,
    selection: SelectionModel,
    activation_verb: Option<String>,
    // Bumped by every mutator that can change the visible sequence.
    revision: u64,
    visible_cache: Option<(VisibleKey, Vec<usize>)>,
}

impl<R: TableRecord> TableView<R> {
    pub fn new(
        kind: RecordKind,
        generator: impl Fn() -> Vec<R> + 'static,
        search_fields: Vec<R::Field>,
        sort_keys: Vec<R::Field>,
    ) -> Self {
        Self {
            kind,
            generator: Box::new(generator),
            raw: Vec::new(),
            search: SearchFilter::new(search_fields),
            sort: SortEngine::new(sort_keys),
            selection: SelectionModel::new(),
            activation_verb: None,
            revision: 0,
            visible_cache: None,
        }
    }

    /// Command verb dispatched when a record is activated by double-click.
    #[must_use]
    pub fn with_activation_verb(mut self, verb: impl Into<String>) -> Self {
        self.activation_verb = Some(verb.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// The cached raw collection of the last refresh.
    #[must_use]
    pub fn table_list(&self) -> &[R] {
        &self.raw
    }

    /// Regenerates the raw collection (one generator call) and prunes
    /// selection identifiers that no longer resolve.
    pub fn refresh(&mut self) {
        self.raw = (self.generator)();
        let present: HashSet<RecordId> = self.raw.iter().map(TableRecord::id).collect();
        let pruned = self.selection.prune(|id| present.contains(&id));
        if pruned > 0 {
            debug!("Dropped {pruned} stale selection entries on refresh");
        }
        self.revision += 1;
        info!("Refreshed {} view with {} records", self.kind, self.raw.len());
    }

    /// Merges this generation's source groups into the blacklist's known set.
    /// Call after every refresh, before the exclusion list is shown.
    pub fn build_plugin_list(&self, blacklist: &mut Blacklist) -> usize {
        blacklist.merge_known_groups(self.kind, collect_source_groups(&self.raw))
    }

    fn rebuild_visible(&mut self, blacklist: &Blacklist) {
        let key = VisibleKey {
            view_revision: self.revision,
            blacklist_revision: blacklist.revision(),
        };
        if matches!(&self.visible_cache, Some((cached, _)) if *cached == key) {
            return;
        }

        let mut indices = self
            .raw
            .iter()
            .enumerate()
            .filter(|(_, record)| !blacklist.is_excluded(self.kind, record.source_group()))
            .filter(|(_, record)| self.search.matches_record(*record))
            .map(|(index, _)| index)
            .collect_vec();
        self.sort.sort_indices(&self.raw, &mut indices);

        self.visible_cache = Some((key, indices));
    }

    /// The visible sequence: exclusion, then search, then a stable sort.
    pub fn visible_list(&mut self, blacklist: &Blacklist) -> Vec<&R> {
        self.rebuild_visible(blacklist);
        match &self.visible_cache {
            Some((_, indices)) => indices.iter().map(|&index| &self.raw[index]).collect_vec(),
            None => Vec::new(),
        }
    }

    /// Identifiers of the visible sequence, in visible order.
    pub fn visible_ids(&mut self, blacklist: &Blacklist) -> Vec<RecordId> {
        self.visible_list(blacklist)
            .into_iter()
            .map(TableRecord::id)
            .collect_vec()
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.search.set_query(text);
        self.revision += 1;
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.search.set_mode(mode);
        self.revision += 1;
    }

    /// Narrows the searchable fields to a subset of those registered at
    /// construction.
    pub fn set_search_fields(&mut self, fields: Vec<R::Field>) -> Result<(), ViewError> {
        self.search.set_active_fields(fields)?;
        self.revision += 1;
        Ok(())
    }

    #[must_use]
    pub fn search(&self) -> &SearchFilter<R::Field> {
        &self.search
    }

    /// Replaces the sort state. Fails fast for unregistered keys.
    pub fn set_sort_key(&mut self, field: R::Field, ascending: bool) -> Result<(), ViewError> {
        self.sort.set_key(field, ascending)?;
        self.revision += 1;
        Ok(())
    }

    /// Header-click semantics; see [`SortEngine::toggle`].
    pub fn toggle_sort(&mut self, field: R::Field) -> Result<(), ViewError> {
        self.sort.toggle(field)?;
        self.revision += 1;
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.sort.clear();
        self.revision += 1;
    }

    #[must_use]
    pub fn sort(&self) -> &SortEngine<R::Field> {
        &self.sort
    }

    /// Applies one click to the selection. Selection is side state keyed by
    /// record identity; it does not change the visible sequence.
    pub fn select(&mut self, id: RecordId, mode: SelectMode) -> bool {
        self.selection.select(id, mode)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn selection_model(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn set_click_amount(&mut self, amount: u32) {
        self.selection.set_click_amount(amount);
    }

    pub fn set_double_click_to_add(&mut self, enabled: bool) {
        self.selection.set_double_click_to_add(enabled);
    }

    /// Selected records re-resolved against the latest visible sequence, in
    /// visible order. Never returns a record the sequence no longer contains.
    pub fn selected_records(&mut self, blacklist: &Blacklist) -> Vec<&R> {
        self.rebuild_visible(blacklist);
        let Some((_, indices)) = &self.visible_cache else {
            return Vec::new();
        };
        indices
            .iter()
            .map(|&index| &self.raw[index])
            .filter(|record| self.selection.contains(record.id()))
            .collect_vec()
    }

    /// Double-click activation: dispatches the configured verb with the click
    /// amount as argument, fire-and-forget, then hands off to the host's
    /// async execution. No-op unless double-click behavior is enabled and a
    /// verb is configured.
    pub fn activate(&self, id: RecordId, dispatcher: &dyn CommandDispatcher) {
        if !self.selection.double_click_to_add() {
            return;
        }
        let Some(verb) = &self.activation_verb else {
            return;
        };
        dispatcher.execute(verb, id, Some(i64::from(self.selection.click_amount())));
        dispatcher.start_async_execution();
    }

    /// Re-attaches view-local state, regenerating the raw collection if it
    /// was discarded by [`TableView::unload`].
    pub fn load(&mut self) {
        if self.raw.is_empty() {
            self.refresh();
        }
    }

    /// Discards view-local state (raw cache, selection, query, sort). The
    /// blacklist is shared state and is not touched.
    pub fn unload(&mut self) {
        self.raw.clear();
        self.selection.clear();
        self.search.set_query("");
        self.sort.clear();
        self.visible_cache = None;
        self.revision += 1;
    }
}
