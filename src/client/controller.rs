//! Todo list controller.
//!
//! Keeps one [`PageWindow`] consistent with the server. Every operation
//! moves the window to `loading`, then to `idle` on success or to
//! `error` with [`NETWORK_ERROR_MESSAGE`] on failure. Operations take
//! `&mut self`, so at most one is in flight per controller.

use super::transport::{ClientError, TodoApi};
use super::window::{NETWORK_ERROR_MESSAGE, PageWindow};
use crate::domain::{TodoId, TodoPatch};

/// How the window follows the server after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Patch the window in place from the mutation response.
    #[default]
    Patch,
    /// Refetch the current page whenever the total count changed.
    Refetch,
}

/// Client-side controller for the paginated to-do list.
#[derive(Debug)]
pub struct TodoListController<A> {
    api: A,
    window: PageWindow,
    input: String,
    sync_mode: SyncMode,
}

impl<A: TodoApi> TodoListController<A> {
    /// Creates a controller on page 1 with an empty window.
    pub fn new(api: A, page_size: u32) -> Self {
        Self {
            api,
            window: PageWindow::new(page_size),
            input: String::new(),
            sync_mode: SyncMode::default(),
        }
    }

    /// Sets the sync mode.
    #[must_use]
    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }

    /// Returns the page window.
    pub const fn window(&self) -> &PageWindow {
        &self.window
    }

    /// Returns the pending text of the add box.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the pending text of the add box.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Returns how the window is reconciled after a mutation.
    pub const fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    /// Returns the transport.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the current page.
    ///
    /// # Errors
    ///
    /// Returns the transport error; the window status is set to `error`.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.window.begin_loading();
        self.fetch_current().await
    }

    /// Moves to `page` and fetches it. A page past the end is clamped to
    /// the last page once the total count is known.
    ///
    /// # Errors
    ///
    /// Same as [`TodoListController::load`].
    pub async fn go_to_page(&mut self, page: u32) -> Result<(), ClientError> {
        self.window.set_page(page);
        self.load().await
    }

    /// Fetches the next page. No request is made on the last page.
    ///
    /// # Errors
    ///
    /// Same as [`TodoListController::load`].
    pub async fn next_page(&mut self) -> Result<(), ClientError> {
        match self.window.next_page() {
            Some(page) => self.go_to_page(page).await,
            None => Ok(()),
        }
    }

    /// Fetches the previous page. No request is made on the first page.
    ///
    /// # Errors
    ///
    /// Same as [`TodoListController::load`].
    pub async fn previous_page(&mut self) -> Result<(), ClientError> {
        match self.window.previous_page() {
            Some(page) => self.go_to_page(page).await,
            None => Ok(()),
        }
    }

    /// Creates a to-do from the input text.
    ///
    /// The input is cleared as soon as the request starts. On failure the
    /// captured text is put back.
    ///
    /// # Errors
    ///
    /// Returns the transport error, including a 400 for a blank title.
    pub async fn add(&mut self) -> Result<(), ClientError> {
        self.window.begin_loading();
        let title = std::mem::take(&mut self.input);

        match self.api.create(title.clone()).await {
            Ok(created) => {
                tracing::debug!(id = %created.todo.id, count = created.count, "Todo added");
                let changed = created.count != self.window.total_count();
                if self.refetches(changed) {
                    self.window.set_total(created.count);
                } else {
                    self.window.prepend(created.todo, created.count);
                }
                self.settle(changed).await
            }
            Err(error) => {
                self.input = title;
                Err(self.fail(error))
            }
        }
    }

    /// Flips the completion flag of an item on the current page.
    ///
    /// If the server no longer has the record, the stale item is dropped
    /// from the window.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotInWindow` without a request if the id is
    /// not on this page, otherwise the transport error.
    pub async fn toggle(&mut self, id: TodoId) -> Result<(), ClientError> {
        let Some(completed) = self.window.find(id).map(|todo| todo.completed) else {
            return Err(ClientError::NotInWindow(id));
        };
        self.window.begin_loading();

        match self.api.update(id, TodoPatch::completed(!completed)).await {
            Ok(mutation) => {
                let changed = mutation.count != self.window.total_count();
                if self.refetches(changed) {
                    self.window.set_total(mutation.count);
                } else if let Some(todo) = mutation.todo {
                    self.window.replace_item(todo, mutation.count);
                } else {
                    tracing::debug!(%id, "Todo no longer exists, dropping it");
                    self.window.remove_item(id, mutation.count);
                }
                self.settle(changed).await
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Deletes a to-do by id.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn delete(&mut self, id: TodoId) -> Result<(), ClientError> {
        self.window.begin_loading();

        match self.api.delete(id).await {
            Ok(mutation) => {
                if mutation.todo.is_none() {
                    tracing::debug!(%id, "Delete for unknown todo");
                }
                let changed = mutation.count != self.window.total_count();
                if self.refetches(changed) {
                    self.window.set_total(mutation.count);
                } else {
                    self.window.remove_item(id, mutation.count);
                }
                self.settle(changed).await
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    fn refetches(&self, count_changed: bool) -> bool {
        self.sync_mode == SyncMode::Refetch && count_changed
    }

    async fn settle(&mut self, count_changed: bool) -> Result<(), ClientError> {
        if self.window.reclamp() || self.refetches(count_changed) {
            self.fetch_current().await
        } else {
            self.window.finish();
            Ok(())
        }
    }

    async fn fetch_current(&mut self) -> Result<(), ClientError> {
        loop {
            let page = self.window.current_page();
            let response = match self.api.list(page, self.window.page_size()).await {
                Ok(response) => response,
                Err(error) => return Err(self.fail(error)),
            };
            self.window.replace_page(response.rows, response.count);

            if !self.window.reclamp() {
                break;
            }
            tracing::debug!(
                requested = page,
                clamped = self.window.current_page(),
                "Page out of range"
            );
        }

        tracing::debug!(
            page = self.window.current_page(),
            max_page = self.window.max_page(),
            count = self.window.total_count(),
            "Page loaded"
        );
        self.window.finish();
        Ok(())
    }

    fn fail(&mut self, error: ClientError) -> ClientError {
        tracing::warn!(%error, "Todo request failed");
        self.window.fail(NETWORK_ERROR_MESSAGE);
        error
    }
}
