//! Board controller behavior against a scripted in-process transport.
//!
//! # Design
//! `ScriptedTransport` answers requests from a queue of canned responses and
//! records every request it sees. A step can be gated on a oneshot channel so
//! tests can observe the board while a move is still in flight.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::json;
use taskboard_core::{
    ApiError, BoardController, BoardObserver, CreateTask, HttpMethod, HttpRequest, HttpResponse,
    LoadState, MoveOutcome, ResourceApi, ResourceClient, Task, TaskStatus, Tasks, Transport,
    TransitionState,
};
use tokio::sync::oneshot;
use uuid::Uuid;

const BASE_URL: &str = "http://board.test";

struct Step {
    gate: Option<oneshot::Receiver<()>>,
    response: Result<HttpResponse, ApiError>,
}

fn respond(status: u16, body: serde_json::Value) -> Step {
    Step {
        gate: None,
        response: Ok(HttpResponse::new(status, body.to_string())),
    }
}

fn respond_raw(status: u16, body: &str) -> Step {
    Step {
        gate: None,
        response: Ok(HttpResponse::new(status, body)),
    }
}

/// The request never gets an HTTP answer.
fn unreachable_server() -> Step {
    Step {
        gate: None,
        response: Err(ApiError::Transport("connection refused".to_string())),
    }
}

fn gated(status: u16, body: serde_json::Value) -> (Step, oneshot::Sender<()>) {
    let (tx, rx) = oneshot::channel();
    let step = Step {
        gate: Some(rx),
        response: Ok(HttpResponse::new(status, body.to_string())),
    };
    (step, tx)
}

#[derive(Default)]
struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    log: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            log: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<(HttpMethod, String)> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.method, r.path.clone()))
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.log.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        let step = next
            .unwrap_or_else(|| panic!("unscripted request: {} {}", request.method, request.path));
        if let Some(gate) = step.gate {
            gate.await.unwrap();
        }
        step.response
    }
}

#[derive(Default)]
struct Recorder {
    moved: Mutex<Vec<(Uuid, TaskStatus, TaskStatus)>>,
    errors: Mutex<Vec<String>>,
    edits: Mutex<Vec<Uuid>>,
}

impl BoardObserver<Tasks> for Recorder {
    fn item_moved(&self, item: &Task, from: TaskStatus, to: TaskStatus) {
        self.moved.lock().unwrap().push((item.id, from, to));
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn edit_requested(&self, item: &Task) {
        self.edits.lock().unwrap().push(item.id);
    }
}

type Board = BoardController<Tasks, ScriptedTransport, Recorder>;

fn board(steps: Vec<Step>) -> Board {
    let api = ResourceApi::new(ResourceClient::new(BASE_URL), ScriptedTransport::new(steps));
    BoardController::with_observer(api, Recorder::default())
}

fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn task(n: u128, status: &str, hour: u32) -> serde_json::Value {
    json!({
        "id": id(n),
        "title": format!("task {n}"),
        "status": status,
        "priority": "medium",
        "createdAt": format!("2024-01-01T{hour:02}:00:00Z"),
    })
}

fn list_path() -> String {
    format!("{BASE_URL}/api/tasks")
}

fn item_path(n: u128) -> String {
    format!("{BASE_URL}/api/tasks/{}", id(n))
}

fn ids(items: &[Task]) -> Vec<Uuid> {
    items.iter().map(|t| t.id).collect()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[tokio::test]
async fn activate_loads_once_newest_first() {
    let board = board(vec![respond(
        200,
        json!([task(1, "todo", 8), task(2, "todo", 12), task(3, "done", 10)]),
    )]);
    assert_eq!(board.load_state().await, LoadState::NotLoaded);

    board.activate().await;
    board.activate().await;

    assert_eq!(board.load_state().await, LoadState::Ready);
    assert_eq!(ids(&board.items().await), vec![id(2), id(3), id(1)]);
    assert_eq!(board.api().transport().requests().len(), 1);
}

#[tokio::test]
async fn concurrent_activations_share_one_fetch() {
    let (list, release) = gated(200, json!([task(1, "todo", 8)]));
    let board = board(vec![list]);

    let first = board.activate();
    let second = async {
        // The first activation is parked on the gated list request.
        tokio::task::yield_now().await;
        board.activate().await;
        assert_eq!(board.load_state().await, LoadState::Loading);
        release.send(()).unwrap();
    };
    tokio::join!(first, second);

    assert_eq!(board.load_state().await, LoadState::Ready);
    assert_eq!(ids(&board.items().await), vec![id(1)]);
    assert_eq!(board.api().transport().requests().len(), 1);
}

#[tokio::test]
async fn load_failure_reports_error_and_retry_recovers() {
    let board = board(vec![
        respond(503, json!({"message": "maintenance"})),
        respond(200, json!([task(1, "todo", 8)])),
    ]);

    board.activate().await;
    assert_eq!(
        board.load_state().await,
        LoadState::Failed {
            message: "Failed to load tasks".to_string()
        }
    );
    assert!(board.items().await.is_empty());

    board.retry().await;
    assert_eq!(board.load_state().await, LoadState::Ready);
    assert_eq!(ids(&board.items().await), vec![id(1)]);
}

#[tokio::test]
async fn load_drops_duplicate_ids() {
    let board = board(vec![respond(
        200,
        json!([task(1, "todo", 8), task(1, "done", 9), task(2, "review", 7)]),
    )]);
    board.load().await;

    let items = board.items().await;
    assert_eq!(ids(&items), vec![id(1), id(2)]);
    assert_eq!(items[0].status, TaskStatus::Todo);
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn grouping_matches_board_columns() {
    let board = board(vec![respond(200, json!([task(1, "todo", 8), task(2, "done", 9)]))]);
    board.load().await;

    let groups = board.grouped().await;
    let view: Vec<(TaskStatus, Vec<Uuid>)> = groups
        .iter()
        .map(|g| (g.status, ids(&g.items)))
        .collect();
    assert_eq!(
        view,
        vec![
            (TaskStatus::Todo, vec![id(1)]),
            (TaskStatus::InProgress, vec![]),
            (TaskStatus::Review, vec![]),
            (TaskStatus::Done, vec![id(2)]),
        ]
    );
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

#[tokio::test]
async fn move_to_current_status_sends_nothing() {
    let board = board(vec![respond(200, json!([task(1, "todo", 8)]))]);
    board.load().await;
    let before = board.items().await;

    let outcome = board.move_item(id(1), TaskStatus::Todo).await;

    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert_eq!(board.items().await, before);
    assert_eq!(board.api().transport().requests().len(), 1);
    assert!(board.observer().moved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn move_unknown_item_sends_nothing() {
    let board = board(vec![respond(200, json!([task(1, "todo", 8)]))]);
    board.load().await;

    let outcome = board.move_item(id(42), TaskStatus::Done).await;

    assert_eq!(outcome, MoveOutcome::UnknownItem);
    assert_eq!(board.api().transport().requests().len(), 1);
}

#[tokio::test]
async fn move_is_visible_before_confirmation() {
    let (update, release) = gated(200, task(1, "in_progress", 8));
    let board = board(vec![respond(200, json!([task(1, "todo", 8)])), update]);
    board.load().await;

    let (outcome, ()) = tokio::join!(board.move_item(id(1), TaskStatus::InProgress), async {
        assert_eq!(
            board.transition(id(1)).await,
            TransitionState::Pending {
                from: TaskStatus::Todo,
                to: TaskStatus::InProgress
            }
        );
        assert_eq!(board.item(id(1)).await.unwrap().status, TaskStatus::InProgress);
        let groups = board.grouped().await;
        assert!(groups[0].items.is_empty());
        assert_eq!(ids(&groups[1].items), vec![id(1)]);
        release.send(()).unwrap();
    });

    assert_eq!(
        outcome,
        MoveOutcome::Confirmed {
            from: TaskStatus::Todo,
            to: TaskStatus::InProgress
        }
    );
    assert_eq!(board.transition(id(1)).await, TransitionState::Idle);
}

#[tokio::test]
async fn confirmed_move_updates_item_and_notifies() {
    let mut confirmed = task(1, "done", 8);
    confirmed["updatedAt"] = json!("2024-01-02T00:00:00Z");
    let board = board(vec![
        respond(200, json!([task(1, "todo", 8), task(2, "todo", 9)])),
        respond(200, confirmed),
    ]);
    board.load().await;

    let outcome = board.move_item(id(1), TaskStatus::Done).await;

    assert_eq!(
        outcome,
        MoveOutcome::Confirmed {
            from: TaskStatus::Todo,
            to: TaskStatus::Done
        }
    );
    let items = board.items().await;
    let matching: Vec<&Task> = items.iter().filter(|t| t.id == id(1)).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].status, TaskStatus::Done);
    assert!(matching[0].updated_at.is_some());
    assert_eq!(
        *board.observer().moved.lock().unwrap(),
        vec![(id(1), TaskStatus::Todo, TaskStatus::Done)]
    );
    assert!(board.observer().errors.lock().unwrap().is_empty());

    let requests = board.api().transport().requests();
    assert_eq!(requests[1], (HttpMethod::Put, item_path(1)));
}

#[tokio::test]
async fn failed_move_replaces_collection_with_refetch() {
    let board = board(vec![
        respond(200, json!([task(1, "todo", 8), task(2, "todo", 9)])),
        respond(500, json!({"message": "database exploded"})),
        // Server truth differs from the pre-move snapshot on purpose.
        respond(200, json!([task(1, "review", 8), task(3, "done", 10)])),
    ]);
    board.load().await;

    let outcome = board.move_item(id(1), TaskStatus::Done).await;

    assert_eq!(
        outcome,
        MoveOutcome::RolledBack {
            from: TaskStatus::Todo,
            to: TaskStatus::Done,
            message: "Failed to update task status".to_string(),
        }
    );
    let items = board.items().await;
    assert_eq!(ids(&items), vec![id(3), id(1)]);
    assert_eq!(items[1].status, TaskStatus::Review);
    assert_eq!(board.load_state().await, LoadState::Ready);
    assert_eq!(board.transition(id(1)).await, TransitionState::Idle);

    // Observers only ever see the sanitized text.
    assert_eq!(
        *board.observer().errors.lock().unwrap(),
        vec!["Failed to update task status".to_string()]
    );
    assert!(board.observer().moved.lock().unwrap().is_empty());

    let requests = board.api().transport().requests();
    assert_eq!(
        requests,
        vec![
            (HttpMethod::Get, list_path()),
            (HttpMethod::Put, item_path(1)),
            (HttpMethod::Get, list_path()),
        ]
    );
}

#[tokio::test]
async fn unreachable_server_during_move_rolls_back_with_refetch() {
    let board = board(vec![
        respond(200, json!([task(1, "todo", 8)])),
        unreachable_server(),
        respond(200, json!([task(1, "todo", 8)])),
    ]);
    board.load().await;

    let outcome = board.move_item(id(1), TaskStatus::InProgress).await;

    assert_eq!(
        outcome,
        MoveOutcome::RolledBack {
            from: TaskStatus::Todo,
            to: TaskStatus::InProgress,
            message: "Failed to update task status".to_string(),
        }
    );
    assert_eq!(board.item(id(1)).await.unwrap().status, TaskStatus::Todo);
    assert_eq!(board.load_state().await, LoadState::Ready);
    assert_eq!(
        *board.observer().errors.lock().unwrap(),
        vec!["Failed to update task status".to_string()]
    );
    assert_eq!(
        board.api().transport().requests(),
        vec![
            (HttpMethod::Get, list_path()),
            (HttpMethod::Put, item_path(1)),
            (HttpMethod::Get, list_path()),
        ]
    );
}

#[tokio::test]
async fn failed_refetch_after_rollback_leaves_load_error() {
    let board = board(vec![
        respond(200, json!([task(1, "todo", 8)])),
        respond_raw(502, "bad gateway"),
        respond_raw(502, "bad gateway"),
    ]);
    board.load().await;

    let outcome = board.move_item(id(1), TaskStatus::Review).await;

    assert!(matches!(outcome, MoveOutcome::RolledBack { .. }));
    assert!(matches!(board.load_state().await, LoadState::Failed { .. }));
    assert_eq!(board.observer().errors.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn rapid_moves_on_one_item_last_request_wins() {
    let (first_update, release) = gated(500, json!({"message": "too slow"}));
    let board = board(vec![
        respond(200, json!([task(1, "todo", 8)])),
        first_update,
        respond(200, task(1, "done", 8)),
    ]);
    board.load().await;

    let (first, second) = tokio::join!(board.move_item(id(1), TaskStatus::InProgress), async {
        let outcome = board.move_item(id(1), TaskStatus::Done).await;
        release.send(()).unwrap();
        outcome
    });

    assert_eq!(
        first,
        MoveOutcome::Superseded {
            to: TaskStatus::InProgress
        }
    );
    assert_eq!(
        second,
        MoveOutcome::Confirmed {
            from: TaskStatus::InProgress,
            to: TaskStatus::Done
        }
    );
    assert_eq!(board.item(id(1)).await.unwrap().status, TaskStatus::Done);
    // The stale failure neither notified nor re-fetched.
    assert!(board.observer().errors.lock().unwrap().is_empty());
    assert_eq!(board.api().transport().requests().len(), 3);
}

#[tokio::test]
async fn moves_of_different_items_run_concurrently() {
    let board = board(vec![
        respond(200, json!([task(1, "todo", 8), task(2, "todo", 9)])),
        respond(200, task(1, "review", 8)),
        respond(200, task(2, "done", 9)),
    ]);
    board.load().await;

    let (a, b) = tokio::join!(
        board.move_item(id(1), TaskStatus::Review),
        board.move_item(id(2), TaskStatus::Done)
    );

    assert!(matches!(a, MoveOutcome::Confirmed { .. }));
    assert!(matches!(b, MoveOutcome::Confirmed { .. }));
    assert_eq!(board.item(id(1)).await.unwrap().status, TaskStatus::Review);
    assert_eq!(board.item(id(2)).await.unwrap().status, TaskStatus::Done);
    assert_eq!(board.observer().moved.lock().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Create / remove / edit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_puts_new_item_first() {
    let board = board(vec![
        respond(200, json!([task(1, "todo", 8)])),
        respond(201, task(2, "todo", 9)),
    ]);
    board.load().await;

    let input = CreateTask {
        title: "task 2".to_string(),
        ..CreateTask::default()
    };
    let created = board.create(&input).await.unwrap();

    assert_eq!(created.id, id(2));
    assert_eq!(ids(&board.items().await), vec![id(2), id(1)]);
}

#[tokio::test]
async fn create_with_invalid_input_sends_nothing() {
    let board = board(vec![]);

    let err = board.create(&CreateTask::default()).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(board.api().transport().requests().is_empty());
}

#[tokio::test]
async fn remove_drops_item_after_no_content() {
    let board = board(vec![
        respond(200, json!([task(1, "todo", 8), task(2, "done", 9)])),
        respond_raw(204, ""),
    ]);
    board.load().await;

    board.remove(id(1)).await.unwrap();

    assert_eq!(ids(&board.items().await), vec![id(2)]);
    assert_eq!(
        board.api().transport().requests()[1],
        (HttpMethod::Delete, item_path(1))
    );
}

#[tokio::test]
async fn remove_failure_keeps_item() {
    let board = board(vec![
        respond(200, json!([task(1, "todo", 8)])),
        respond(404, json!({"message": "task not found"})),
    ]);
    board.load().await;

    let err = board.remove(id(1)).await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(ids(&board.items().await), vec![id(1)]);
}

#[tokio::test]
async fn edit_notifies_observer_for_known_items() {
    let board = board(vec![respond(200, json!([task(1, "todo", 8)]))]);
    board.load().await;

    assert!(board.edit(id(1)).await);
    assert!(!board.edit(id(7)).await);
    assert_eq!(*board.observer().edits.lock().unwrap(), vec![id(1)]);
}
