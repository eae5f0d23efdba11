use std::fmt;

use crate::Category;

/// Chat participant. Keys both the pending cache and the collection store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conversation a reply is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Where an inbound message came from and where its replies go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin {
    pub user_id: UserId,
    pub chat_id: ChatId,
}

impl Origin {
    pub fn new(user_id: u64, chat_id: i64) -> Self {
        Self {
            user_id: UserId(user_id),
            chat_id: ChatId(chat_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub title: String,
    /// `None` until the user picks a category.
    pub category: Option<Category>,
}

impl Link {
    pub fn unclassified(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            category: None,
        }
    }

    pub fn classified(self, category: Category) -> Self {
        Self {
            category: Some(category),
            ..self
        }
    }

    pub fn is_classified(&self) -> bool {
        self.category.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub user_id: UserId,
    pub name: String,
    pub links: Vec<Link>,
}

impl Collection {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            links: Vec::new(),
        }
    }
}

/// Collapse runs of newline, carriage return and tab into a single space.
pub fn normalize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for ch in raw.chars() {
        if matches!(ch, '\n' | '\r' | '\t') {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}
