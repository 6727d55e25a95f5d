//! Resource descriptors binding a collection path to its DTOs.
//!
//! A resource is a zero-sized marker type. `ResourceClient<R>` and
//! `ResourceApi<R, T>` are generic over it, so tasks, posts and users share
//! one request/response implementation.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::types::{
    CreatePost, CreateTask, CreateUser, Post, Task, TaskStatus, UpdatePost, UpdateTask, UpdateUser,
    User,
};
use crate::validate::Validate;

/// A record with a server-assigned identifier.
pub trait Record: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

/// A REST collection served under `/api/{COLLECTION}`.
pub trait Resource: Send + Sync + 'static {
    /// Path segment of the collection, e.g. `tasks`.
    const COLLECTION: &'static str;
    /// Singular noun used in user-facing messages.
    const LABEL: &'static str;

    type Item: Record;
    type Create: Serialize + Validate + Send + Sync;
    type Update: Serialize + Validate + Send + Sync;
}

/// A resource whose items sit in status columns and can be moved between
/// them.
pub trait Board: Resource {
    type Status: Copy
        + Eq
        + Hash
        + fmt::Debug
        + fmt::Display
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Every status in column order.
    fn statuses() -> &'static [Self::Status];
    fn status(item: &Self::Item) -> Self::Status;
    fn set_status(item: &mut Self::Item, status: Self::Status);
    /// Creation timestamp used for newest-first ordering, if exposed.
    fn created_at(item: &Self::Item) -> Option<DateTime<Utc>>;
    /// Partial update that moves an item to `status`.
    fn status_update(status: Self::Status) -> Self::Update;
}

#[derive(Debug, Clone, Copy)]
pub struct Tasks;

#[derive(Debug, Clone, Copy)]
pub struct Posts;

#[derive(Debug, Clone, Copy)]
pub struct Users;

impl Record for Task {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Resource for Tasks {
    const COLLECTION: &'static str = "tasks";
    const LABEL: &'static str = "task";
    type Item = Task;
    type Create = CreateTask;
    type Update = UpdateTask;
}

impl Resource for Posts {
    const COLLECTION: &'static str = "posts";
    const LABEL: &'static str = "post";
    type Item = Post;
    type Create = CreatePost;
    type Update = UpdatePost;
}

impl Resource for Users {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "user";
    type Item = User;
    type Create = CreateUser;
    type Update = UpdateUser;
}

impl Board for Tasks {
    type Status = TaskStatus;

    fn statuses() -> &'static [TaskStatus] {
        &TaskStatus::ALL
    }

    fn status(item: &Task) -> TaskStatus {
        item.status
    }

    fn set_status(item: &mut Task, status: TaskStatus) {
        item.status = status;
    }

    fn created_at(item: &Task) -> Option<DateTime<Utc>> {
        item.created_at
    }

    fn status_update(status: TaskStatus) -> UpdateTask {
        UpdateTask::status(status)
    }
}
