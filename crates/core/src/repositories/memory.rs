//! Insertion-ordered in-memory repository keyed by id.

use crate::{RecordError, RecordResult};
use std::collections::HashMap;

/// Entities stored in a [`Repository`].
pub trait Identified {
    fn id(&self) -> &str;
}

/// In-memory collection keyed by entity id.
///
/// Entries are never removed, so the index positions stay valid for the lifetime of the
/// repository. Iteration follows insertion order.
#[derive(Clone, Debug)]
pub struct Repository<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Repository<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Identified> Repository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` and returns a reference to the stored copy.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::DuplicateId`] if an entry with the same id exists.
    pub fn insert(&mut self, item: T) -> RecordResult<&T> {
        let id = item.id().to_string();
        if self.index.contains_key(&id) {
            return Err(RecordError::DuplicateId(id));
        }

        let pos = self.items.len();
        self.items.push(item);
        self.index.insert(id, pos);
        Ok(&self.items[pos])
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.index.get(id).map(|&pos| &mut self.items[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
