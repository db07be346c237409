use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::settings::Settings;

/// Speaker of one chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sender {
    User,
    Bot,
    System,
}

/// Read-only message view as recorded by the host's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: String,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        sender: Sender,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sender,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Style overrides computed by the host; opaque to the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Styles(pub Map<String, Value>);

/// Copy-on-write list whose current version can be shared without cloning.
pub struct SnapshotList<T> {
    items: ArcSwap<Vec<T>>,
}

impl<T: Clone> SnapshotList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: ArcSwap::from_pointee(items),
        }
    }

    pub fn current(&self) -> Arc<Vec<T>> {
        self.items.load_full()
    }

    pub fn replace(&self, items: Vec<T>) {
        self.items.store(Arc::new(items));
    }

    /// Appends one item; earlier snapshots keep their old contents.
    pub fn push(&self, item: T) {
        self.items.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(item.clone());
            next
        });
    }

    pub fn len(&self) -> usize {
        self.items.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for SnapshotList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// State captured for one notification at dispatch time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub settings: Arc<Settings>,
    pub styles: Arc<Styles>,
    pub messages: Arc<Vec<Message>>,
    pub paths: Arc<Vec<String>>,
}
