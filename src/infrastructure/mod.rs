//! Infrastructure module for persistence.
//!
//! This module contains the repository trait, its in-memory and
//! `PostgreSQL` implementations, and the factory that picks one at startup.

pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod repository;

pub use factory::{
    AppEnvironment, ConfigurationError, FactoryError, RepositoryConfig, RepositoryFactory,
    StorageMode,
};
pub use in_memory::InMemoryTodoRepository;
pub use postgres::PostgresTodoRepository;
pub use repository::{
    CreatedTodo, PaginatedResult, Pagination, RepositoryError, RepositoryFuture, TodoMutation,
    TodoRepository,
};
