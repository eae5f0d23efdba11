use std::collections::HashMap;

use crate::{Link, UserId};

/// Links waiting for the user to pick a category, at most one per user.
///
/// Entries live until classified or replaced; nothing expires them. The
/// cache is owned by [`crate::AppState`], so every mutation happens inside
/// [`crate::update`] on the single dispatcher task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingLinks {
    entries: HashMap<UserId, Link>,
}

impl PendingLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a link for `user_id`, returning the entry it replaced.
    pub fn stage(&mut self, user_id: UserId, link: Link) -> Option<Link> {
        self.entries.insert(user_id, link)
    }

    /// Put a link back only if nothing newer was staged meanwhile.
    pub fn restage(&mut self, user_id: UserId, link: Link) -> bool {
        match self.entries.entry(user_id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(Link {
                    category: None,
                    ..link
                });
                true
            }
        }
    }

    pub fn take(&mut self, user_id: UserId) -> Option<Link> {
        self.entries.remove(&user_id)
    }

    pub fn get(&self, user_id: UserId) -> Option<&Link> {
        self.entries.get(&user_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
