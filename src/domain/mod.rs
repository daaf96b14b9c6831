//! Domain module for the to-do list.
//!
//! This module contains the to-do record, its update commands and the
//! process-lifetime counter.

pub mod counter;
pub mod todo;

pub use counter::ProcessCounter;
pub use todo::{MAX_PAGE_SIZE, NewTodo, Todo, TodoId, TodoPatch};
