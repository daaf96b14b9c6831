//! Locally held slice of records for one page.
//!
//! The window is a derived view of the server's record set. All mutating
//! methods take the server-reported total count so that the page count is
//! recomputed from the same response that changed the items.

use crate::domain::{MAX_PAGE_SIZE, Todo, TodoId};

/// Message shown when any request fails.
pub const NETWORK_ERROR_MESSAGE: &str = "Network response was not ok";

/// Status of the last operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// No request in flight and the last one succeeded.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request failed with this message.
    Error(String),
}

impl LoadStatus {
    /// Returns the error message, if the last operation failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => formatter.write_str("idle"),
            Self::Loading => formatter.write_str("loading"),
            Self::Error(message) => write!(formatter, "error: {message}"),
        }
    }
}

/// Number of pages for `total_count` records, never less than one.
#[must_use]
pub fn max_page_for(total_count: u64, page_size: u32) -> u32 {
    let pages = total_count.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// One page of records plus the paging state derived from the total count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    items: Vec<Todo>,
    page_size: u32,
    current_page: u32,
    max_page: u32,
    total_count: u64,
    status: LoadStatus,
}

impl PageWindow {
    /// Creates an empty window on page 1. The page size is clamped to
    /// `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            current_page: 1,
            max_page: 1,
            total_count: 0,
            status: LoadStatus::Idle,
        }
    }

    /// Returns the records on the current page.
    #[must_use]
    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    /// Returns the number of records per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the 1-indexed page this window shows.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns the last page number, never less than 1.
    #[must_use]
    pub const fn max_page(&self) -> u32 {
        self.max_page
    }

    /// Returns the total count reported by the last response.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns the status of the last operation.
    #[must_use]
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Looks up an item on this page.
    #[must_use]
    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.items.iter().find(|todo| todo.id == id)
    }

    pub(crate) fn begin_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    pub(crate) fn finish(&mut self) {
        self.status = LoadStatus::Idle;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.status = LoadStatus::Error(message.into());
    }

    /// Moves to `page` without fetching. Pages below 1 become 1.
    pub(crate) fn set_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    /// Records a new total count and recomputes the page count.
    pub(crate) fn set_total(&mut self, total_count: u64) {
        self.total_count = total_count;
        self.max_page = max_page_for(total_count, self.page_size);
    }

    /// Replaces the items with a freshly fetched page.
    pub(crate) fn replace_page(&mut self, mut rows: Vec<Todo>, total_count: u64) {
        rows.truncate(self.page_size as usize);
        self.items = rows;
        self.set_total(total_count);
    }

    /// Puts a created record at the front, dropping the last item when full.
    pub(crate) fn prepend(&mut self, todo: Todo, total_count: u64) {
        if self.items.len() >= self.page_size as usize {
            self.items.pop();
        }
        self.items.insert(0, todo);
        self.set_total(total_count);
    }

    /// Replaces the item with the same id, leaving the window untouched if
    /// it is not on this page.
    pub(crate) fn replace_item(&mut self, todo: Todo, total_count: u64) {
        if let Some(slot) = self.items.iter_mut().find(|item| item.id == todo.id) {
            *slot = todo;
        }
        self.set_total(total_count);
    }

    /// Removes only the item with exactly this id.
    pub(crate) fn remove_item(&mut self, id: TodoId, total_count: u64) {
        self.items.retain(|item| item.id != id);
        self.set_total(total_count);
    }

    /// Pulls `current_page` back to `max_page`. Returns `true` if it moved.
    pub(crate) fn reclamp(&mut self) -> bool {
        if self.current_page > self.max_page {
            self.current_page = self.max_page;
            true
        } else {
            false
        }
    }

    /// Page to fetch for "previous", or `None` on the first page.
    #[must_use]
    pub fn previous_page(&self) -> Option<u32> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    /// Page to fetch for "next", or `None` on the last page.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        (self.current_page < self.max_page).then(|| self.current_page + 1)
    }
}
