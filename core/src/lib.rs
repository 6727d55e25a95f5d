//! API client core for the task board service.
//!
//! # Overview
//! `ResourceClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). `ResourceApi`
//! pairs it with a `Transport` for async callers, and `BoardController`
//! keeps an optimistic, status-grouped view of the task collection on top.
//!
//! # Design
//! - `ResourceClient<R>` is stateless and generic over a `Resource` marker
//!   (`Tasks`, `Posts`, `Users`).
//! - Each CRUD operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and testable with plain data.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod resource;
pub mod transport;
pub mod types;
pub mod validate;

pub use api::ResourceApi;
pub use client::ResourceClient;
pub use config::ClientConfig;
pub use controller::{
    group_by_status, BoardController, BoardObserver, LoadState, MoveOutcome, NoopObserver,
    StatusGroup, TransitionState,
};
pub use error::{ApiError, ConfigError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resource::{Board, Posts, Record, Resource, Tasks, Users};
pub use transport::{HttpTransport, Transport};
pub use types::{
    CreatePost, CreateTask, CreateUser, Post, Task, TaskPriority, TaskStatus, UpdatePost,
    UpdateTask, UpdateUser, User,
};
pub use validate::Validate;
