//! Optimistic list controller for status boards.
//!
//! # Overview
//! `BoardController` owns the in-memory Collection of a `Board` resource and
//! moves items between status columns optimistically: the local status is
//! rewritten first, the server is asked to confirm, and a failed update is
//! reconciled by re-fetching the whole list rather than undoing one field.
//!
//! # Design
//! - The Collection sits behind a `tokio::sync::RwLock` that is never held
//!   across a network call, so moves of different items run concurrently.
//! - Each in-flight move is tracked per item id with a ticket. A later move
//!   of the same item takes a newer ticket and the older response is dropped
//!   when it arrives (last request wins).
//! - The grouping view is derived from the Collection on every read.
//! - Observers only see sanitized messages, never `ApiError` values.

mod grouping;
mod observer;
mod state;

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::ResourceApi;
use crate::error::ApiError;
use crate::resource::{Board, Record};
use crate::transport::Transport;

pub use grouping::{group_by_status, StatusGroup};
pub use observer::{BoardObserver, NoopObserver};
pub use state::{LoadState, MoveOutcome, TransitionState};

use grouping::{dedupe_by_id, order_newest_first};
use state::PendingMove;

struct BoardState<R: Board> {
    items: Vec<R::Item>,
    load: LoadState,
    in_flight: HashMap<Uuid, PendingMove<R::Status>>,
    next_ticket: u64,
}

impl<R: Board> BoardState<R> {
    fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn is_current(&self, id: Uuid, ticket: u64) -> bool {
        self.in_flight
            .get(&id)
            .is_some_and(|pending| pending.ticket == ticket)
    }
}

pub struct BoardController<R: Board, T, O = NoopObserver> {
    api: ResourceApi<R, T>,
    observer: O,
    state: RwLock<BoardState<R>>,
}

impl<R: Board, T: Transport> BoardController<R, T, NoopObserver> {
    pub fn new(api: ResourceApi<R, T>) -> Self {
        Self::with_observer(api, NoopObserver)
    }
}

impl<R: Board, T: Transport, O: BoardObserver<R>> BoardController<R, T, O> {
    pub fn with_observer(api: ResourceApi<R, T>, observer: O) -> Self {
        Self {
            api,
            observer,
            state: RwLock::new(BoardState {
                items: Vec::new(),
                load: LoadState::NotLoaded,
                in_flight: HashMap::new(),
                next_ticket: 0,
            }),
        }
    }

    pub fn api(&self) -> &ResourceApi<R, T> {
        &self.api
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Snapshot of the Collection in display order.
    pub async fn items(&self) -> Vec<R::Item> {
        self.state.read().await.items.clone()
    }

    pub async fn item(&self, id: Uuid) -> Option<R::Item> {
        let state = self.state.read().await;
        state.position(id).map(|index| state.items[index].clone())
    }

    /// Status columns recomputed from the current Collection.
    pub async fn grouped(&self) -> Vec<StatusGroup<R::Status, R::Item>> {
        group_by_status::<R>(&self.state.read().await.items)
    }

    pub async fn load_state(&self) -> LoadState {
        self.state.read().await.load.clone()
    }

    pub async fn transition(&self, id: Uuid) -> TransitionState<R::Status> {
        match self.state.read().await.in_flight.get(&id) {
            Some(pending) => TransitionState::Pending {
                from: pending.from,
                to: pending.to,
            },
            None => TransitionState::Idle,
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Initial load: fetches once, later calls are no-ops.
    pub async fn activate(&self) {
        {
            let mut state = self.state.write().await;
            if state.load != LoadState::NotLoaded {
                return;
            }
            state.load = LoadState::Loading;
        }
        self.fetch().await;
    }

    pub async fn retry(&self) {
        self.load().await;
    }

    /// Fetch the full list and replace the Collection with it. On failure
    /// the previous Collection is kept and the load state records a
    /// user-facing message.
    pub async fn load(&self) {
        self.state.write().await.load = LoadState::Loading;
        self.fetch().await;
    }

    async fn fetch(&self) {
        match self.api.list().await {
            Ok(mut items) => {
                let dropped = dedupe_by_id(&mut items);
                if dropped > 0 {
                    tracing::warn!(
                        dropped,
                        collection = R::COLLECTION,
                        "dropped duplicate ids from list"
                    );
                }
                order_newest_first::<R>(&mut items);

                let mut state = self.state.write().await;
                tracing::debug!(
                    count = items.len(),
                    collection = R::COLLECTION,
                    "collection replaced"
                );
                state.items = items;
                state.load = LoadState::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, collection = R::COLLECTION, "list fetch failed");
                self.state.write().await.load = LoadState::Failed {
                    message: format!("Failed to load {}", R::COLLECTION),
                };
            }
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Move one item to `to`, optimistically.
    pub async fn move_item(&self, id: Uuid, to: R::Status) -> MoveOutcome<R::Status> {
        let (from, ticket) = {
            let mut state = self.state.write().await;
            let Some(index) = state.position(id) else {
                return MoveOutcome::UnknownItem;
            };
            let from = R::status(&state.items[index]);
            if from == to {
                return MoveOutcome::Unchanged;
            }
            R::set_status(&mut state.items[index], to);

            let ticket = state.next_ticket;
            state.next_ticket += 1;
            state.in_flight.insert(id, PendingMove { from, to, ticket });
            (from, ticket)
        };
        tracing::debug!(%id, %from, %to, ticket, "move pending");

        let result = self.api.update(id, &R::status_update(to)).await;

        match result {
            Ok(item) => {
                {
                    let mut state = self.state.write().await;
                    if !state.is_current(id, ticket) {
                        return MoveOutcome::Superseded { to };
                    }
                    state.in_flight.remove(&id);
                    if let Some(index) = state.position(id) {
                        state.items[index] = item.clone();
                    }
                }
                tracing::debug!(%id, %from, %to, "move confirmed");
                self.observer.item_moved(&item, from, to);
                MoveOutcome::Confirmed { from, to }
            }
            Err(err) => {
                {
                    let mut state = self.state.write().await;
                    if !state.is_current(id, ticket) {
                        tracing::debug!(
                            %id,
                            error = %err,
                            "stale move failed; newer move in flight"
                        );
                        return MoveOutcome::Superseded { to };
                    }
                    state.in_flight.remove(&id);
                }
                tracing::warn!(%id, %from, %to, error = %err, "move rejected; re-fetching");
                let message = format!("Failed to update {} status", R::LABEL);
                self.observer.error(&message);
                self.load().await;
                MoveOutcome::RolledBack { from, to, message }
            }
        }
    }

    // ------------------------------------------------------------------
    // Other mutations
    // ------------------------------------------------------------------

    /// Create through the API and show the new item first.
    pub async fn create(&self, input: &R::Create) -> Result<R::Item, ApiError> {
        let item = self.api.create(input).await?;
        let mut state = self.state.write().await;
        match state.position(item.id()) {
            Some(index) => state.items[index] = item.clone(),
            None => state.items.insert(0, item.clone()),
        }
        Ok(item)
    }

    /// Delete through the API, then drop the item locally.
    pub async fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        self.api.delete(id).await?;
        let mut state = self.state.write().await;
        state.items.retain(|item| item.id() != id);
        state.in_flight.remove(&id);
        Ok(())
    }

    /// Ask the rendering layer to open an editor for `id`. Returns false
    /// when the item is not in the Collection.
    pub async fn edit(&self, id: Uuid) -> bool {
        match self.item(id).await {
            Some(item) => {
                self.observer.edit_requested(&item);
                true
            }
            None => false,
        }
    }
}
