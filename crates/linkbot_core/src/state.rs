use crate::{Link, PendingLinks, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pending: PendingLinks,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_link(&self, user_id: UserId) -> Option<&Link> {
        self.pending.get(user_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn pending_mut(&mut self) -> &mut PendingLinks {
        &mut self.pending
    }
}
