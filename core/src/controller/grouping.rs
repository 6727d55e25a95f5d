//! Status-grouped view and Collection normalization.

use std::collections::HashSet;

use crate::resource::{Board, Record};

/// One board column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusGroup<S, I> {
    pub status: S,
    pub items: Vec<I>,
}

/// Partition `items` into one group per known status, in column order.
/// Every known status gets a group, empty or not.
pub fn group_by_status<R: Board>(items: &[R::Item]) -> Vec<StatusGroup<R::Status, R::Item>> {
    R::statuses()
        .iter()
        .map(|&status| StatusGroup {
            status,
            items: items
                .iter()
                .filter(|item| R::status(item) == status)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Keep the first item for each id. Returns the number of dropped duplicates.
pub(crate) fn dedupe_by_id<I: Record>(items: &mut Vec<I>) -> usize {
    let before = items.len();
    let mut seen = HashSet::with_capacity(before);
    items.retain(|item| seen.insert(item.id()));
    before - items.len()
}

/// Newest first by creation time. Items without a timestamp keep their
/// relative order and sort after timestamped ones.
pub(crate) fn order_newest_first<R: Board>(items: &mut [R::Item]) {
    items.sort_by(|a, b| R::created_at(b).cmp(&R::created_at(a)));
}
