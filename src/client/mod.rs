//! Client side of the to-do server.
//!
//! [`TodoListController`] keeps a [`PageWindow`] in sync with the server
//! through a [`TodoApi`] transport; [`HttpTodoApi`] is the `reqwest`
//! implementation.

pub mod controller;
pub mod counter;
pub mod transport;
pub mod window;

pub use controller::{SyncMode, TodoListController};
pub use counter::CounterController;
pub use transport::{ClientError, ClientFuture, HttpTodoApi, TodoApi};
pub use window::{LoadStatus, NETWORK_ERROR_MESSAGE, PageWindow, max_page_for};
