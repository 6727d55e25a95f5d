//! Stateless HTTP request builder and response parser for one resource.
//!
//! # Design
//! `ResourceClient<R>` holds only a base URL and an optional actor id and
//! carries no mutable state between calls. Each CRUD operation is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round-trip.
//!
//! Every `parse_*` method goes through `read_body`: any 2xx is success, 204
//! is success with no content whatever the body says, and everything else is
//! turned into an `ApiError` by `failure_from`.

use std::collections::HashMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resource::{Board, Resource};
use crate::validate::Validate;

/// Message used when a failed response has no parseable JSON body.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Field appended to update payloads by clients built with an actor.
pub const ACTOR_FIELD: &str = "actorUserId";

/// Synchronous, stateless client for one resource collection.
pub struct ResourceClient<R> {
    base_url: String,
    actor: Option<Uuid>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            actor: self.actor,
            _resource: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.base_url)
            .field("actor", &self.actor)
            .finish()
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            actor: None,
            _resource: PhantomData,
        }
    }

    /// Attach `actorUserId` to every update payload built by this client.
    pub fn with_actor(mut self, actor: Uuid) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn actor(&self) -> Option<Uuid> {
        self.actor
    }

    fn collection_url(&self) -> String {
        format!("{}/api/{}", self.base_url, R::COLLECTION)
    }

    fn item_url(&self, id: Uuid) -> String {
        format!("{}/api/{}/{id}", self.base_url, R::COLLECTION)
    }

    pub fn build_list(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create(&self, input: &R::Create) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let body = serde_json::to_string(input).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(json_request(HttpMethod::Post, self.collection_url(), body))
    }

    pub fn build_update(&self, id: Uuid, input: &R::Update) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let body = match self.actor {
            None => serde_json::to_string(input),
            Some(actor) => {
                let mut value =
                    serde_json::to_value(input).map_err(|e| ApiError::Encode(e.to_string()))?;
                let Some(fields) = value.as_object_mut() else {
                    return Err(ApiError::Encode(format!(
                        "{} update must serialize to a JSON object",
                        R::LABEL
                    )));
                };
                fields.insert(ACTOR_FIELD.to_string(), Value::String(actor.to_string()));
                serde_json::to_string(&value)
            }
        }
        .map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(json_request(HttpMethod::Put, self.item_url(id), body))
    }

    pub fn build_delete(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<R::Item>, ApiError> {
        Ok(read_body(&response)?.unwrap_or_default())
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<R::Item, ApiError> {
        require_body(&response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<R::Item, ApiError> {
        require_body(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<R::Item, ApiError> {
        require_body(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        if !response.is_success() {
            return Err(failure_from(&response));
        }
        Ok(())
    }
}

impl<R: Board> ResourceClient<R> {
    /// `GET ?groupBy=status`: the server returns a status-keyed mapping.
    pub fn build_list_grouped(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}?groupBy=status", self.collection_url()),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_grouped(
        &self,
        response: HttpResponse,
    ) -> Result<HashMap<R::Status, Vec<R::Item>>, ApiError> {
        let mut groups: HashMap<R::Status, Vec<R::Item>> =
            read_body(&response)?.unwrap_or_default();
        for status in R::statuses() {
            groups.entry(*status).or_default();
        }
        Ok(groups)
    }
}

fn json_request(method: HttpMethod, path: String, body: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    }
}

/// Decode a successful response. `Ok(None)` means 204 No Content.
pub fn read_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<Option<T>, ApiError> {
    if !response.is_success() {
        return Err(failure_from(response));
    }
    if response.is_no_content() {
        return Ok(None);
    }
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn require_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    read_body(response)?.ok_or(ApiError::MissingBody {
        status: response.status,
    })
}

/// Map a non-success response to an `ApiError`, resolving its message from
/// a `{"message": ...}` body.
///
/// Only a body that is not JSON at all gets the bare generic message. Any
/// JSON body without a non-blank string `message` gets the status variant.
pub fn failure_from(response: &HttpResponse) -> ApiError {
    let status = response.status;
    let message = match serde_json::from_str::<Value>(&response.body) {
        Err(_) => GENERIC_FAILURE.to_string(),
        Ok(body) => body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{GENERIC_FAILURE} with status {status}")),
    };
    if status == 404 {
        ApiError::NotFound { message }
    } else {
        ApiError::Server { status, message }
    }
}
