//! Notification hooks consumed by the rendering layer.

use crate::resource::Board;

/// Receives board events. Every hook defaults to a no-op.
///
/// `error` only ever receives sanitized, user-facing text.
pub trait BoardObserver<R: Board>: Send + Sync {
    fn item_moved(&self, _item: &R::Item, _from: R::Status, _to: R::Status) {}

    fn error(&self, _message: &str) {}

    fn edit_requested(&self, _item: &R::Item) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<R: Board> BoardObserver<R> for NoopObserver {}
