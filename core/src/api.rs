//! Async CRUD facade: a `ResourceClient` paired with a `Transport`.
//!
//! No retries happen here. Every non-success outcome is returned to the
//! caller as an `ApiError`.

use std::collections::HashMap;

use uuid::Uuid;

use crate::client::ResourceClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::resource::{Board, Resource};
use crate::transport::Transport;

pub struct ResourceApi<R, T> {
    client: ResourceClient<R>,
    transport: T,
}

impl<R: Resource, T: Transport> ResourceApi<R, T> {
    pub fn new(client: ResourceClient<R>, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ResourceClient<R> {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.execute(request).await?;
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }

    pub async fn list(&self) -> Result<Vec<R::Item>, ApiError> {
        let response = self.send(self.client.build_list()).await?;
        self.client.parse_list(response)
    }

    pub async fn get(&self, id: Uuid) -> Result<R::Item, ApiError> {
        let response = self.send(self.client.build_get(id)).await?;
        self.client.parse_get(response)
    }

    pub async fn create(&self, input: &R::Create) -> Result<R::Item, ApiError> {
        let request = self.client.build_create(input)?;
        let response = self.send(request).await?;
        self.client.parse_create(response)
    }

    pub async fn update(&self, id: Uuid, input: &R::Update) -> Result<R::Item, ApiError> {
        let request = self.client.build_update(id, input)?;
        let response = self.send(request).await?;
        self.client.parse_update(response)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete(id)).await?;
        self.client.parse_delete(response)
    }
}

impl<R: Board, T: Transport> ResourceApi<R, T> {
    pub async fn list_grouped(&self) -> Result<HashMap<R::Status, Vec<R::Item>>, ApiError> {
        let response = self.send(self.client.build_list_grouped()).await?;
        self.client.parse_list_grouped(response)
    }
}
