use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{require, ApiFailure};
use crate::AppState;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

/// Post edits are audited: the acting user must be named.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub actor_user_id: Option<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}

async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    let mut posts: Vec<Post> = state.posts.read().await.values().cloned().collect();
    posts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Json(posts)
}

async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<CreatePost>,
) -> Result<(StatusCode, Json<Post>), ApiFailure> {
    require("title", &input.title)?;
    require("content", &input.content)?;
    let post = Post {
        id: Uuid::new_v4(),
        title: input.title,
        content: input.content,
        author_id: input.author_id,
        created_at: Utc::now(),
        updated_at: None,
        updated_by: None,
    };
    state.posts.write().await.insert(post.id, post.clone());
    tracing::info!(id = %post.id, author = %post.author_id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiFailure> {
    let posts = state.posts.read().await;
    posts
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("post"))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePost>,
) -> Result<Json<Post>, ApiFailure> {
    let actor = input
        .actor_user_id
        .ok_or_else(|| ApiFailure::bad_request("actorUserId is required"))?;
    if let Some(title) = &input.title {
        require("title", title)?;
    }
    if let Some(content) = &input.content {
        require("content", content)?;
    }
    let mut posts = state.posts.write().await;
    let post = posts.get_mut(&id).ok_or_else(|| ApiFailure::not_found("post"))?;
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(content) = input.content {
        post.content = content;
    }
    post.updated_at = Some(Utc::now());
    post.updated_by = Some(actor);
    tracing::info!(%id, %actor, "post updated");
    Ok(Json(post.clone()))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiFailure> {
    let mut posts = state.posts.write().await;
    posts
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found("post"))
}
