//! Filtering of the record list.

use std::fmt::Display;

use derive_more::Display;
use enum_iterator::Sequence;
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use itertools::Itertools;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ViewError;
use crate::record::TableRecord;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Sequence)]
pub enum SearchMode {
    #[display("Contains")]
    Contains,

    #[display("Exact match")]
    Exact,

    #[display("Regular expression")]
    Regex,

    #[display("Fuzzy")]
    Fuzzy,
}

/// Query state plus the field set it matches against.
///
/// A record matches when the concatenated text of the active fields matches
/// the query. The empty query matches everything; a whitespace-only query is
/// non-empty and matched literally. Matching is case-insensitive unless the
/// host opts out.
#[derive(Debug, Clone)]
pub struct SearchFilter<F> {
    mode: SearchMode,
    case_insensitive: bool,
    query: String,
    query_lower: String,
    registered: Vec<F>,
    active: Vec<F>,
    // Compiled once per query/mode change; an invalid pattern matches nothing
    // and surfaces through `regex_error`.
    regex: Option<Regex>,
    regex_error: Option<String>,
}

impl<F: Copy + Eq + Display> SearchFilter<F> {
    #[must_use]
    pub fn new(fields: Vec<F>) -> Self {
        Self {
            mode: SearchMode::Contains,
            case_insensitive: true,
            query: String::new(),
            query_lower: String::new(),
            active: fields.clone(),
            registered: fields,
            regex: None,
            regex_error: None,
        }
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.query_lower = self.query.to_lowercase();
        self.rebuild_regex();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
        self.rebuild_regex();
    }

    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn set_case_insensitive(&mut self, case_insensitive: bool) {
        self.case_insensitive = case_insensitive;
        self.rebuild_regex();
    }

    /// Narrows the active searchable fields to a subset of the registered set.
    pub fn set_active_fields(&mut self, fields: Vec<F>) -> Result<(), ViewError> {
        for &field in &fields {
            if !self.registered.contains(&field) {
                return Err(ViewError::UnknownSearchField(field.to_string()));
            }
        }
        self.active = fields;
        Ok(())
    }

    #[must_use]
    pub fn active_fields(&self) -> &[F] {
        &self.active
    }

    /// The error message of the last failed regex compilation, if the current
    /// mode is [`SearchMode::Regex`].
    #[must_use]
    pub fn regex_error(&self) -> Option<&str> {
        match self.mode {
            SearchMode::Regex => self.regex_error.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    fn rebuild_regex(&mut self) {
        self.regex = None;
        self.regex_error = None;
        if self.mode != SearchMode::Regex || self.query.is_empty() {
            return;
        }
        match RegexBuilder::new(&self.query)
            .case_insensitive(self.case_insensitive)
            .build()
        {
            Ok(regex) => self.regex = Some(regex),
            Err(err) => {
                debug!("Invalid search pattern '{}': {err}", self.query);
                self.regex_error = Some(err.to_string());
            }
        }
    }

    /// Concatenated text of the active fields for one record.
    #[must_use]
    pub fn searchable_text<R: TableRecord<Field = F>>(&self, record: &R) -> String {
        self.active
            .iter()
            .map(|&field| record.field_text(field))
            .join(" ")
    }

    /// Whether `haystack` matches the stored query under the current mode.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        if !self.is_active() {
            return true;
        }

        match self.mode {
            SearchMode::Contains => {
                if self.case_insensitive {
                    haystack.to_lowercase().contains(&self.query_lower)
                } else {
                    haystack.contains(&self.query)
                }
            }
            SearchMode::Exact => {
                if self.case_insensitive {
                    haystack.to_lowercase() == self.query_lower
                } else {
                    haystack == self.query
                }
            }
            SearchMode::Regex => self
                .regex
                .as_ref()
                .is_some_and(|regex| regex.is_match(haystack)),
            SearchMode::Fuzzy => self
                .fuzzy_matcher()
                .fuzzy_match(haystack, &self.query)
                .is_some(),
        }
    }

    #[must_use]
    pub fn matches_record<R: TableRecord<Field = F>>(&self, record: &R) -> bool {
        if !self.is_active() {
            return true;
        }
        self.matches(&self.searchable_text(record))
    }

    /// The order-preserving subsequence of `records` matching the query.
    #[must_use]
    pub fn apply<'a, R: TableRecord<Field = F>>(&self, records: &'a [R]) -> Vec<&'a R> {
        if !self.is_active() {
            return records.iter().collect_vec();
        }

        // Build the fuzzy matcher once instead of per record.
        if self.mode == SearchMode::Fuzzy {
            let matcher = self.fuzzy_matcher();
            return records
                .iter()
                .filter(|record| {
                    matcher
                        .fuzzy_match(&self.searchable_text(*record), &self.query)
                        .is_some()
                })
                .collect_vec();
        }

        records
            .iter()
            .filter(|record| self.matches(&self.searchable_text(*record)))
            .collect_vec()
    }

    fn fuzzy_matcher(&self) -> SkimMatcherV2 {
        let matcher = SkimMatcherV2::default();
        if self.case_insensitive {
            matcher.ignore_case()
        } else {
            matcher.respect_case()
        }
    }
}
