use crate::{FilterCriteria, Record, SortOrder};

/// Commands the presentation layer sends to the [`RecordView`].
///
/// [`RecordView`]: crate::RecordView
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Filter(FilterCriteria),
    ResetFilters,
    Search(String),
    Sort(SortOrder),
    GoToPage(usize),
    NextPage,
    PrevPage,
    Edit(i64),
    Delete(i64),
    Reload,
}

/// Work an intent hands back to the application because it needs the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    OpenEditor(Record),
    ConfirmDelete(Record),
    Reload,
}
