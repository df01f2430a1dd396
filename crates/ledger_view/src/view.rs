use std::collections::BTreeSet;

use chrono_tz::Tz;

use crate::{
    Effect, FilterCriteria, Intent, Page, Record, SortOrder, filter, page, search, sort,
};

/// The working set plus the filter, search, sort and page state of one screen.
///
/// Every query method is a pure function of these fields; the only mutation
/// is replacing the working set on [`RecordView::load`] and changing the
/// stored criteria.
#[derive(Debug, Clone)]
pub struct RecordView {
    records: Vec<Record>,
    criteria: FilterCriteria,
    search_term: String,
    order: SortOrder,
    page_number: usize,
    page_size: usize,
    tz: Tz,
}

impl RecordView {
    pub fn new(page_size: usize, tz: Tz) -> Self {
        Self {
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            search_term: String::new(),
            order: SortOrder::default(),
            page_number: 1,
            page_size: page_size.max(1),
            tz,
        }
    }

    /// Replaces the working set and goes back to page 1.
    ///
    /// Filter, search and sort settings are kept, so a reload after an edit
    /// shows the same slice of data.
    pub fn load(&mut self, records: Vec<Record>) {
        self.records = records;
        self.page_number = 1;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Records of the working set matching `criteria`.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Record> {
        filter::filter(&self.records, criteria, self.tz)
    }

    /// Stores `criteria` as the active filter and resets to page 1.
    pub fn apply_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.page_number = 1;
    }

    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.search_term.clear();
        self.page_number = 1;
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn search(&self, term: &str, items: &[Record]) -> Vec<Record> {
        search::search(term, items)
    }

    /// Updates the search term from the search box.
    ///
    /// Returns `false`, and keeps the previous term, when the new one is too
    /// short to search with.
    pub fn set_search(&mut self, term: &str) -> bool {
        if !search::is_active(term) {
            return false;
        }
        self.search_term = term.to_string();
        self.page_number = 1;
        true
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort(&self, order: SortOrder, items: &[Record]) -> Vec<Record> {
        sort::sort(order, items)
    }

    pub fn set_sort(&mut self, order: SortOrder) {
        self.order = order;
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn page(&self, number: usize, size: usize, items: &[Record]) -> Page {
        page::paginate(number, size, items)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page_number = 1;
    }

    /// Filtered, searched and sorted records: everything the pager walks over.
    pub fn visible_records(&self) -> Vec<Record> {
        let filtered = self.filter(&self.criteria);
        let found = self.search(&self.search_term, &filtered);
        self.sort(self.order, &found)
    }

    pub fn current_page(&self) -> Page {
        self.page(self.page_number, self.page_size, &self.visible_records())
    }

    /// Moves to page `number`, clamped to the pages that exist.
    pub fn go_to(&mut self, number: usize) {
        let total = self.visible_records().len();
        self.page_number = page::clamp_page(number, total, self.page_size);
    }

    pub fn next_page(&mut self) {
        self.go_to(self.page_number.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to(self.page_number.saturating_sub(1));
    }

    /// Sorted distinct categories of the working set.
    pub fn categories(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|record| record.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Applies a presentation intent.
    ///
    /// Intents that need the store come back as an [`Effect`]; an intent
    /// naming an id outside the working set is ignored.
    pub fn handle(&mut self, intent: Intent) -> Option<Effect> {
        match intent {
            Intent::Filter(criteria) => self.apply_filter(criteria),
            Intent::ResetFilters => self.reset_filters(),
            Intent::Search(term) => {
                self.set_search(&term);
            }
            Intent::Sort(order) => self.set_sort(order),
            Intent::GoToPage(number) => self.go_to(number),
            Intent::NextPage => self.next_page(),
            Intent::PrevPage => self.prev_page(),
            Intent::Edit(id) => return self.get(id).cloned().map(Effect::OpenEditor),
            Intent::Delete(id) => return self.get(id).cloned().map(Effect::ConfirmDelete),
            Intent::Reload => return Some(Effect::Reload),
        }
        None
    }
}
