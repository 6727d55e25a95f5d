//! In-memory REST backend for the task board client.
//!
//! Serves `/api/tasks`, `/api/posts` and `/api/users` with the same CRUD
//! shape: list, get, create (201), partial update via PUT, delete (204).
//! Failures answer with `{"message": ...}` bodies.

pub mod error;
pub mod posts;
pub mod tasks;
pub mod users;

use std::{collections::HashMap, sync::Arc};

use axum::Router;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub use error::{ApiFailure, ErrorBody};
pub use posts::Post;
pub use tasks::{Task, TaskPriority, TaskStatus};
pub use users::User;

pub type Db<T> = Arc<RwLock<HashMap<Uuid, T>>>;

#[derive(Clone, Default)]
pub struct AppState {
    pub tasks: Db<Task>,
    pub posts: Db<Post>,
    pub users: Db<User>,
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// Router over caller-owned state, so tests can seed or inspect it.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(tasks::routes())
        .merge(posts::routes())
        .merge(users::routes())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}
