//! End-to-end tests: the list and counter controllers over `reqwest`
//! against a server bound to an ephemeral port.

mod common;

use std::time::Duration;

use rstest::rstest;

use common::{
    create_app_state_with_counter_delay, create_test_app_state, seed_todos, spawn_server,
    unused_address,
};
use paged_todos::client::{
    ClientError, CounterController, HttpTodoApi, LoadStatus, NETWORK_ERROR_MESSAGE, SyncMode,
    TodoApi, TodoListController, max_page_for,
};
use paged_todos::domain::TodoId;
use paged_todos::infrastructure::TodoRepository;

fn controller_for(base_url: &str) -> TodoListController<HttpTodoApi> {
    let api = HttpTodoApi::new(base_url).unwrap();
    TodoListController::new(api, 10)
}

fn window_ids(controller: &TodoListController<HttpTodoApi>) -> Vec<i64> {
    controller
        .window()
        .items()
        .iter()
        .map(|todo| todo.id.value())
        .collect()
}

#[rstest]
#[tokio::test]
async fn empty_store_has_one_page() {
    let server = spawn_server(create_test_app_state()).await;
    let mut controller = controller_for(&server.base_url());

    controller.load().await.unwrap();

    assert!(controller.window().items().is_empty());
    assert_eq!(controller.window().total_count(), 0);
    assert_eq!(controller.window().max_page(), 1);
    assert_eq!(controller.window().status(), &LoadStatus::Idle);
}

#[rstest]
#[tokio::test]
async fn second_page_of_fifteen() {
    let state = create_test_app_state();
    seed_todos(&state, 15).await;
    let server = spawn_server(state).await;
    let mut controller = controller_for(&server.base_url());

    controller.load().await.unwrap();
    controller.next_page().await.unwrap();

    assert_eq!(controller.window().current_page(), 2);
    assert_eq!(window_ids(&controller), (11..=15).collect::<Vec<_>>());
    assert_eq!(controller.window().total_count(), 15);
    assert_eq!(controller.window().max_page(), 2);
}

#[rstest]
#[tokio::test]
async fn page_size_above_server_cap_keeps_every_record_reachable() {
    let state = create_test_app_state();
    seed_todos(&state, 150).await;
    let server = spawn_server(state).await;
    let api = HttpTodoApi::new(server.base_url()).unwrap();
    let mut controller = TodoListController::new(api, 200);

    controller.load().await.unwrap();
    assert_eq!(controller.window().page_size(), 100);
    assert_eq!(controller.window().items().len(), 100);
    assert_eq!(controller.window().max_page(), 2);

    controller.next_page().await.unwrap();

    assert_eq!(controller.window().current_page(), 2);
    assert_eq!(window_ids(&controller), (101..=150).collect::<Vec<_>>());
    assert!(controller.window().find(TodoId::new(150)).is_some());
}

#[rstest]
#[tokio::test]
async fn added_record_is_visible_to_a_fresh_window() {
    let server = spawn_server(create_test_app_state()).await;
    let mut controller = controller_for(&server.base_url());
    controller.load().await.unwrap();
    controller.set_input("Buy milk");

    controller.add().await.unwrap();

    let mut fresh = controller_for(&server.base_url());
    fresh.load().await.unwrap();
    assert_eq!(fresh.window().items().len(), 1);
    assert_eq!(fresh.window().items()[0].title, "Buy milk");
    assert_eq!(fresh.window().items()[0].id, TodoId::new(1));
    assert!(!fresh.window().items()[0].completed);
}

#[rstest]
#[tokio::test]
async fn add_to_full_page_drops_last_item() {
    let state = create_test_app_state();
    seed_todos(&state, 10).await;
    let server = spawn_server(state).await;
    let mut controller = controller_for(&server.base_url());
    controller.load().await.unwrap();
    controller.set_input("newest");

    controller.add().await.unwrap();

    let ids = window_ids(&controller);
    assert_eq!(ids.len(), 10);
    assert_eq!(ids[0], 11);
    assert!(!ids.contains(&10));
    assert_eq!(controller.window().max_page(), 2);
    assert_eq!(controller.input(), "");
}

#[rstest]
#[tokio::test]
async fn blank_add_is_rejected_and_input_restored() {
    let server = spawn_server(create_test_app_state()).await;
    let mut controller = controller_for(&server.base_url());
    controller.load().await.unwrap();
    controller.set_input("   ");

    let error = controller.add().await.unwrap_err();

    assert!(matches!(error, ClientError::Status { code, .. } if code == "VALIDATION_ERROR"));
    assert_eq!(controller.input(), "   ");
    assert_eq!(
        controller.window().status(),
        &LoadStatus::Error(NETWORK_ERROR_MESSAGE.to_string())
    );
}

#[rstest]
#[tokio::test]
async fn toggle_twice_restores_completed() {
    let state = create_test_app_state();
    seed_todos(&state, 3).await;
    let server = spawn_server(state).await;
    let mut controller = controller_for(&server.base_url());
    controller.load().await.unwrap();
    let id = TodoId::new(2);

    controller.toggle(id).await.unwrap();
    assert!(controller.window().find(id).unwrap().completed);
    controller.toggle(id).await.unwrap();
    assert!(!controller.window().find(id).unwrap().completed);

    let stored = server
        .state
        .todo_repository
        .list(paged_todos::infrastructure::Pagination::new(1, 10))
        .await
        .unwrap();
    assert!(stored.items.iter().all(|todo| !todo.completed));
}

#[rstest]
#[tokio::test]
async fn deleting_unknown_id_leaves_window_intact() {
    let state = create_test_app_state();
    seed_todos(&state, 4).await;
    let server = spawn_server(state).await;
    let mut controller = controller_for(&server.base_url());
    controller.load().await.unwrap();

    controller.delete(TodoId::new(404)).await.unwrap();

    assert_eq!(window_ids(&controller), vec![1, 2, 3, 4]);
    assert_eq!(controller.window().total_count(), 4);
    assert_eq!(controller.window().status(), &LoadStatus::Idle);
}

#[rstest]
#[tokio::test]
async fn deleting_only_item_on_last_page_moves_back() {
    let state = create_test_app_state();
    seed_todos(&state, 21).await;
    let server = spawn_server(state).await;
    let mut controller = controller_for(&server.base_url());
    controller.go_to_page(3).await.unwrap();
    assert_eq!(window_ids(&controller), vec![21]);

    controller.delete(TodoId::new(21)).await.unwrap();

    assert_eq!(controller.window().current_page(), 2);
    assert_eq!(controller.window().max_page(), 2);
    assert_eq!(window_ids(&controller), (11..=20).collect::<Vec<_>>());
}

#[rstest]
#[tokio::test]
async fn refetch_mode_shows_server_order_after_delete() {
    let state = create_test_app_state();
    seed_todos(&state, 12).await;
    let server = spawn_server(state).await;
    let api = HttpTodoApi::new(server.base_url()).unwrap();
    let mut controller = TodoListController::new(api, 10).with_sync_mode(SyncMode::Refetch);
    controller.load().await.unwrap();

    controller.delete(TodoId::new(1)).await.unwrap();

    assert_eq!(window_ids(&controller), (2..=11).collect::<Vec<_>>());
    assert_eq!(controller.window().total_count(), 11);
}

#[rstest]
#[case(1)]
#[case(10)]
#[case(11)]
#[case(25)]
#[tokio::test]
async fn max_page_follows_every_response(#[case] seeded: usize) {
    let state = create_test_app_state();
    seed_todos(&state, seeded).await;
    let server = spawn_server(state).await;
    let mut controller = controller_for(&server.base_url());

    controller.load().await.unwrap();
    let expected = |controller: &TodoListController<HttpTodoApi>| {
        max_page_for(controller.window().total_count(), 10)
    };
    assert_eq!(controller.window().max_page(), expected(&controller));

    controller.set_input("one more");
    controller.add().await.unwrap();
    assert_eq!(controller.window().max_page(), expected(&controller));

    let first = controller.window().items()[0].id;
    controller.toggle(first).await.unwrap();
    assert_eq!(controller.window().max_page(), expected(&controller));

    controller.delete(first).await.unwrap();
    assert_eq!(controller.window().max_page(), expected(&controller));
    assert_eq!(controller.window().total_count(), u64::try_from(seeded).unwrap());
}

#[rstest]
#[tokio::test]
async fn unreachable_server_sets_error_status() {
    let address = unused_address().await;
    let api =
        HttpTodoApi::with_timeout(format!("http://{address}"), Some(Duration::from_secs(2)))
            .unwrap();
    let mut controller = TodoListController::new(api, 10);

    let error = controller.load().await.unwrap_err();

    assert!(matches!(error, ClientError::Transport(_)));
    assert_eq!(
        controller.window().status().error(),
        Some(NETWORK_ERROR_MESSAGE)
    );
}

#[rstest]
#[tokio::test]
async fn request_slower_than_timeout_sets_error_status() {
    let server =
        spawn_server(create_app_state_with_counter_delay(Duration::from_millis(500))).await;
    let api =
        HttpTodoApi::with_timeout(server.base_url(), Some(Duration::from_millis(50))).unwrap();
    let mut counter = CounterController::new(api);

    let error = counter.increment().await.unwrap_err();

    assert!(matches!(&error, ClientError::Transport(inner) if inner.is_timeout()));
    assert_eq!(counter.value(), 0);
    assert_eq!(counter.status().error(), Some(NETWORK_ERROR_MESSAGE));
}

#[rstest]
#[tokio::test]
async fn counter_is_monotonic() {
    let server = spawn_server(create_test_app_state()).await;
    let api = HttpTodoApi::new(server.base_url()).unwrap();
    let mut counter = CounterController::new(api.clone());

    counter.load().await.unwrap();
    assert_eq!(counter.value(), 0);

    let mut previous = counter.value();
    for _ in 0..5 {
        counter.increment().await.unwrap();
        assert!(counter.value() > previous);
        previous = counter.value();
    }

    assert_eq!(api.counter().await.unwrap().counter, 5);
    assert_eq!(server.state.counter.current(), 5);
}
