//! Load and transition states of the board controller.

/// Progress of the full-list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Ready,
    /// The last fetch failed; `retry` re-runs it.
    Failed { message: String },
}

/// Per-item transition state. Items with nothing in flight are `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState<S> {
    Idle,
    Pending { from: S, to: S },
}

/// How a move request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome<S> {
    /// Target equals the current status; nothing was sent.
    Unchanged,
    /// No item with that id is in the Collection.
    UnknownItem,
    /// The server accepted the move.
    Confirmed { from: S, to: S },
    /// A later move of the same item was issued before this one resolved;
    /// this response was discarded.
    Superseded { to: S },
    /// The server rejected the move and the Collection was re-fetched.
    RolledBack { from: S, to: S, message: String },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingMove<S> {
    pub from: S,
    pub to: S,
    pub ticket: u64,
}
