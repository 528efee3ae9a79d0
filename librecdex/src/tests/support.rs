use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use derive_more::Display;
use enum_iterator::Sequence;

use crate::dispatch::CommandDispatcher;
use crate::record::{RecordId, RecordKind, SortValue, SourceGroup, TableRecord};
use crate::table_view::TableView;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub(super) enum QuestField {
    #[display("Name")]
    Name,
    #[display("Editor ID")]
    EditorId,
    #[display("Stage")]
    Stage,
    #[display("Type")]
    QuestType,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct QuestRecord {
    pub id: RecordId,
    pub name: String,
    pub editor_id: String,
    pub group: SourceGroup,
    pub stage: u32,
    pub quest_type: String,
}

impl TableRecord for QuestRecord {
    type Field = QuestField;

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn source_group(&self) -> &SourceGroup {
        &self.group
    }

    fn field_text(&self, field: QuestField) -> Cow<'_, str> {
        match field {
            QuestField::Name => Cow::Borrowed(self.name.as_str()),
            QuestField::EditorId => Cow::Borrowed(self.editor_id.as_str()),
            QuestField::Stage => Cow::Owned(self.stage.to_string()),
            QuestField::QuestType => Cow::Borrowed(self.quest_type.as_str()),
        }
    }

    fn sort_value(&self, field: QuestField) -> SortValue {
        match field {
            QuestField::Name => SortValue::Text(self.name.clone()),
            QuestField::EditorId => SortValue::Text(self.editor_id.clone()),
            QuestField::Stage => SortValue::Numeric(f64::from(self.stage)),
            QuestField::QuestType => SortValue::Text(self.quest_type.clone()),
        }
    }
}

pub(super) fn quest(id: u64, name: &str, group: &str, stage: u32) -> QuestRecord {
    QuestRecord {
        id: RecordId(id),
        name: name.to_string(),
        editor_id: name.replace(' ', ""),
        group: SourceGroup::from(group),
        stage,
        quest_type: "Side Quest".to_string(),
    }
}

/// The three-record collection used by the scenario tests:
/// Q1/Q2 from "Core", Q3 from "DLC".
pub(super) fn sample_quests() -> Vec<QuestRecord> {
    vec![
        quest(1, "Find the Amulet", "Core", 10),
        quest(2, "Find the Blade", "Core", 2),
        quest(3, "Hidden Quest", "DLC", 100),
    ]
}

pub(super) fn all_fields() -> Vec<QuestField> {
    enum_iterator::all::<QuestField>().collect()
}

/// A refreshed quest view over a fixed collection, with every field
/// registered for search and sort.
pub(super) fn quest_view(records: Vec<QuestRecord>) -> TableView<QuestRecord> {
    let mut view = TableView::new(
        RecordKind::Quest,
        move || records.clone(),
        all_fields(),
        all_fields(),
    );
    view.refresh();
    view
}

/// Counts generator invocations so tests can pin the one-call-per-refresh
/// contract.
pub(super) fn counting_view(
    records: Vec<QuestRecord>,
) -> (TableView<QuestRecord>, Rc<RefCell<usize>>) {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let view = TableView::new(
        RecordKind::Quest,
        move || {
            *counter.borrow_mut() += 1;
            records.clone()
        },
        all_fields(),
        all_fields(),
    );
    (view, calls)
}

/// Records every dispatched command instead of executing anything.
#[derive(Default)]
pub(super) struct RecordingDispatcher {
    pub commands: RefCell<Vec<(String, RecordId, Option<i64>)>>,
    pub async_starts: RefCell<usize>,
}

impl CommandDispatcher for RecordingDispatcher {
    fn execute(&self, verb: &str, record: RecordId, arg: Option<i64>) {
        self.commands
            .borrow_mut()
            .push((verb.to_string(), record, arg));
    }

    fn start_async_execution(&self) {
        *self.async_starts.borrow_mut() += 1;
    }
}

pub(super) fn ids<R: TableRecord>(records: &[&R]) -> Vec<RecordId> {
    records.iter().map(|record| record.id()).collect()
}
