//! The table view controller.
//!
//! `ViewState` is a single immutable value; every user event is a pure
//! transition producing the next one. The visible page is derived from the
//! full source collection on every change (filter, then sort, then
//! paginate), so the filtered result never becomes the new source.

use crate::filter::{FilterError, FilterMode, NamePattern};
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::record::Record;
use crate::selection::{HeaderCheck, IdentitySet};
use crate::sort::{comparator, stable_sort, SortDirection, SortField, SortState};
use std::sync::Arc;

/// Events emitted by the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    RequestSort(SortField),
    ToggleSelect(i64),
    SelectAll(bool),
    ToggleExpand(i64),
    ChangePage(usize),
    ChangeRowsPerPage(usize),
    SetFilterText(String),
    SetDense(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub sort: SortState,
    pub page: usize,
    pub page_size: usize,
    pub filter_text: String,
    pub dense: bool,
    /// Selected record ids.
    pub selected: IdentitySet<i64>,
    /// Expanded record ids.
    pub expanded: IdentitySet<i64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort: SortState::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            filter_text: String::new(),
            dense: false,
            selected: IdentitySet::new(),
            expanded: IdentitySet::new(),
        }
    }
}

/// Records matching the filter, falling back to all records when the
/// pattern does not compile.
fn filtered<'a>(
    records: &'a [Record],
    filter_text: &str,
    mode: FilterMode,
) -> (Vec<&'a Record>, Option<FilterError>) {
    match NamePattern::compile(filter_text, mode) {
        Ok(pattern) => (pattern.apply(records), None),
        Err(e) => (records.iter().collect(), Some(e)),
    }
}

impl ViewState {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
            self.page = 0;
        }
        self
    }

    pub fn with_filter_text(mut self, text: impl Into<String>) -> Self {
        self.filter_text = text.into();
        self.page = 0;
        self
    }

    pub fn with_dense(mut self, dense: bool) -> Self {
        self.dense = dense;
        self
    }

    pub fn order(&self) -> SortDirection {
        self.sort.order
    }

    pub fn order_by(&self) -> SortField {
        self.sort.order_by
    }

    /// Next allowed page size after the current one, wrapping around.
    pub fn next_page_size(&self, options: &[usize]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        let next = match options.iter().position(|s| *s == self.page_size) {
            Some(i) => options[(i + 1) % options.len()],
            None => options[0],
        };
        Some(next)
    }

    /// Keep `page` on a page that exists for the current filter.
    pub fn clamped(mut self, records: &[Record], mode: FilterMode) -> Self {
        let (matches, _) = filtered(records, &self.filter_text, mode);
        self.page = pagination::clamp_page(self.page, matches.len(), self.page_size);
        self
    }

    pub fn apply(&self, action: ViewAction, records: &[Record], mode: FilterMode) -> ViewState {
        let mut next = self.clone();
        match action {
            ViewAction::RequestSort(field) => {
                next.sort = self.sort.request(field);
            }
            ViewAction::ToggleSelect(id) => {
                next.selected = self.selected.toggled(id);
            }
            ViewAction::SelectAll(true) => {
                let (matches, _) = filtered(records, &self.filter_text, mode);
                next.selected = IdentitySet::from_keys(matches.iter().map(|r| r.id));
            }
            ViewAction::SelectAll(false) => {
                next.selected = self.selected.cleared();
            }
            ViewAction::ToggleExpand(id) => {
                next.expanded = self.expanded.toggled(id);
            }
            ViewAction::ChangePage(page) => {
                next.page = page;
                return next.clamped(records, mode);
            }
            ViewAction::ChangeRowsPerPage(page_size) => {
                return next.with_page_size(page_size);
            }
            ViewAction::SetFilterText(text) => {
                next.filter_text = text;
                return next.clamped(records, mode);
            }
            ViewAction::SetDense(dense) => {
                next.dense = dense;
            }
        }
        next
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRow {
    pub record: Record,
    pub selected: bool,
    pub expanded: bool,
}

/// Everything the rendering layer needs for one frame of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub rows: Vec<VisibleRow>,
    pub empty_rows: usize,
    pub total_filtered: usize,
    /// Selected records among the filtered set (drives the header checkbox).
    pub selected_in_filtered: usize,
    pub page: usize,
    pub page_size: usize,
    pub sort: SortState,
    pub dense: bool,
    /// Set when the filter text could not be compiled; rows are unfiltered.
    pub notice: Option<FilterError>,
}

impl TableView {
    pub fn header_check(&self) -> HeaderCheck {
        HeaderCheck::of(self.selected_in_filtered, self.total_filtered)
    }

    pub fn all_selected(&self) -> bool {
        self.header_check() == HeaderCheck::Checked
    }

    pub fn page_count(&self) -> usize {
        pagination::page_count(self.total_filtered, self.page_size)
    }

    pub fn displayed_rows_label(&self) -> String {
        pagination::displayed_rows_label(self.page, self.page_size, self.total_filtered)
    }
}

/// Filter, sort and paginate `records` for `state`.
pub fn derive_view(records: &[Record], state: &ViewState, mode: FilterMode) -> TableView {
    let (matches, notice) = filtered(records, &state.filter_text, mode);
    let cmp = comparator(state.sort.order, state.sort.order_by);
    let sorted = stable_sort(&matches, |a: &&Record, b: &&Record| cmp(a, b));
    let slice = pagination::paginate(&sorted, state.page, state.page_size);

    let rows = slice
        .rows
        .into_iter()
        .map(|record| VisibleRow {
            selected: state.selected.contains(&record.id),
            expanded: state.expanded.contains(&record.id),
            record: record.clone(),
        })
        .collect();

    TableView {
        rows,
        empty_rows: slice.empty_rows,
        total_filtered: sorted.len(),
        selected_in_filtered: state.selected.count_in(sorted.iter().copied().map(|r| &r.id)),
        page: state.page,
        page_size: state.page_size,
        sort: state.sort,
        dense: state.dense,
        notice,
    }
}

struct Memo {
    generation: u64,
    mode: FilterMode,
    state: ViewState,
    view: TableView,
}

/// Owns the fetched records, the current view state and the last derived
/// view.
pub struct TableController {
    records: Arc<[Record]>,
    generation: u64,
    state: ViewState,
    mode: FilterMode,
    memo: Option<Memo>,
}

impl Default for TableController {
    fn default() -> Self {
        Self::new(ViewState::default(), FilterMode::default())
    }
}

impl TableController {
    pub fn new(state: ViewState, mode: FilterMode) -> Self {
        Self {
            records: Arc::from(Vec::new()),
            generation: 0,
            state,
            mode,
            memo: None,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
        self.state = self.state.clone().clamped(&self.records, mode);
    }

    /// Adopt a freshly fetched collection. View state is kept; the page is
    /// clamped if the new collection is shorter.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = Arc::from(records);
        self.generation += 1;
        self.state = self.state.clone().clamped(&self.records, self.mode);
    }

    pub fn dispatch(&mut self, action: ViewAction) {
        self.state = self.state.apply(action, &self.records, self.mode);
    }

    pub fn view(&mut self) -> &TableView {
        let fresh = matches!(
            &self.memo,
            Some(m) if m.generation == self.generation && m.mode == self.mode && m.state == self.state
        );
        if !fresh {
            self.memo = None;
        }
        let (records, state, mode, generation) =
            (&self.records, &self.state, self.mode, self.generation);
        &self
            .memo
            .get_or_insert_with(|| Memo {
                generation,
                mode,
                state: state.clone(),
                view: derive_view(records, state, mode),
            })
            .view
    }
}
