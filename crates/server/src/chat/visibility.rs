//! Which messages a viewer is allowed to poll

use crate::models::Message;

/// Messages visible to `viewer`, in their original order.
///
/// Public and status messages are always visible. Private messages are
/// visible only to their sender and addressee; a `None` viewer sees none.
pub fn visible_to(messages: Vec<Message>, viewer: Option<&str>) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|m| m.is_visible_to(viewer))
        .collect()
}

/// Keep only the last `limit` entries.
pub fn last_n<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    let start = items.len().saturating_sub(limit);
    items.split_off(start)
}

/// Filter for `viewer`, then optionally truncate to the most recent `limit`.
pub fn filter_messages(
    messages: Vec<Message>,
    viewer: Option<&str>,
    limit: Option<usize>,
) -> Vec<Message> {
    let visible = visible_to(messages, viewer);
    match limit {
        Some(limit) => last_n(visible, limit),
        None => visible,
    }
}
