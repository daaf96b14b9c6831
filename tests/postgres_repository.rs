//! `PostgreSQL` repository tests.
//!
//! Run against a disposable database:
//!
//! ```text
//! TEST_DATABASE_URL=postgres://localhost/todos_test \
//!     cargo test --test postgres_repository -- --ignored
//! ```
//!
//! The test drops and recreates the `todos` table. It returns early when
//! `TEST_DATABASE_URL` is not set.

use sqlx::PgPool;

use paged_todos::domain::{NewTodo, TodoId, TodoPatch};
use paged_todos::infrastructure::{Pagination, PostgresTodoRepository, TodoRepository};

async fn connect() -> Option<PostgresTodoRepository> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return None;
    };
    let pool = PgPool::connect(&url).await.expect("connect to test database");
    let repository = PostgresTodoRepository::new(pool);
    repository.ensure_schema(true).await.expect("reset schema");
    Some(repository)
}

// Single test so that steps sharing the table never run in parallel.
#[tokio::test]
#[ignore = "requires PostgreSQL via TEST_DATABASE_URL"]
async fn postgres_repository_round_trip() {
    let Some(repository) = connect().await else {
        return;
    };

    let empty = repository.list(Pagination::new(1, 10)).await.unwrap();
    assert!(empty.items.is_empty());
    assert_eq!(empty.total, 0);

    let created = repository.create(NewTodo::new("Buy milk")).await.unwrap();
    assert_eq!(created.todo.id, TodoId::new(1));
    assert!(!created.todo.completed);
    assert_eq!(created.total, 1);

    for index in 2..=15 {
        repository
            .create(NewTodo::new(format!("todo {index}")))
            .await
            .unwrap();
    }

    let second = repository.list(Pagination::new(2, 10)).await.unwrap();
    let ids: Vec<i64> = second.items.iter().map(|todo| todo.id.value()).collect();
    assert_eq!(ids, (11..=15).collect::<Vec<_>>());
    assert_eq!(second.total, 15);

    let beyond = repository.list(Pagination::new(9, 10)).await.unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 15);

    let toggled = repository
        .update(TodoId::new(1), TodoPatch::completed(true))
        .await
        .unwrap();
    let todo = toggled.todo.unwrap();
    assert!(todo.completed);
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(toggled.total, 15);

    let missing = repository
        .update(TodoId::new(999), TodoPatch::completed(true))
        .await
        .unwrap();
    assert!(missing.todo.is_none());
    assert_eq!(missing.total, 15);

    let deleted = repository.delete(TodoId::new(1)).await.unwrap();
    assert_eq!(deleted.todo.map(|todo| todo.title).as_deref(), Some("Buy milk"));
    assert_eq!(deleted.total, 14);

    let again = repository.delete(TodoId::new(1)).await.unwrap();
    assert!(again.todo.is_none());
    assert_eq!(again.total, 14);
}
