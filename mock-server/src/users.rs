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
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn email_taken<'a>(
    mut users: impl Iterator<Item = &'a User>,
    email: &str,
    except: Option<Uuid>,
) -> bool {
    users.any(|user| Some(user.id) != except && user.email.eq_ignore_ascii_case(email))
}

async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    let mut users: Vec<User> = state.users.read().await.values().cloned().collect();
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Json(users)
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), ApiFailure> {
    require("name", &input.name)?;
    require("email", &input.email)?;
    let mut users = state.users.write().await;
    if email_taken(users.values(), &input.email, None) {
        return Err(ApiFailure::conflict("email already in use"));
    }
    let user = User {
        id: Uuid::new_v4(),
        name: input.name,
        email: input.email,
        created_at: Utc::now(),
    };
    users.insert(user.id, user.clone());
    tracing::info!(id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiFailure> {
    let users = state.users.read().await;
    users
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("user"))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<User>, ApiFailure> {
    if let Some(name) = &input.name {
        require("name", name)?;
    }
    let mut users = state.users.write().await;
    if let Some(email) = &input.email {
        require("email", email)?;
        if email_taken(users.values(), email, Some(id)) {
            return Err(ApiFailure::conflict("email already in use"));
        }
    }
    let user = users.get_mut(&id).ok_or_else(|| ApiFailure::not_found("user"))?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiFailure> {
    let mut users = state.users.write().await;
    users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found("user"))
}
