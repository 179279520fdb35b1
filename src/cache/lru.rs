//! LRU List Module
//!
//! Access-ordered key/value storage backing the cache.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

// == Link ==
/// Neighbour indices of a slot in the recency list.
#[derive(Debug, Clone, Copy, Default)]
struct Link {
    /// More recently used neighbour
    prev: Option<usize>,
    /// Less recently used neighbour
    next: Option<usize>,
}

// == LRU List ==
/// Key/value pairs kept in access order.
///
/// Entries live in an arena of slots threaded by a doubly-linked list:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// A hash index maps each key to its slot, so lookup, promotion, removal and
/// eviction are all O(1). Freed slots are recycled.
///
/// Not synchronized; the cache wraps it in a lock.
#[derive(Debug)]
pub(crate) struct LruList<K, V> {
    /// Occupied slots hold `Some((key, value))`
    slots: Vec<Option<(K, V)>>,
    /// Recency links, parallel to `slots`
    links: Vec<Link>,
    /// Indices of vacant slots
    free: Vec<usize>,
    /// Key -> slot index
    index: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> Default for LruList<K, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            links: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }
}

impl<K, V> LruList<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].as_ref().map(|(_, v)| v)
    }

    // == Peek ==
    /// Returns the value for `key` without touching its position.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.slots[idx].as_ref().map(|(_, v)| v)
    }

    // == Insert ==
    /// Inserts or replaces `key`, making it the most recently used entry.
    ///
    /// Returns the previous value if the key was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.index.get(&key) {
            self.move_to_front(idx);
            return self.slots[idx]
                .as_mut()
                .map(|(_, v)| std::mem::replace(v, value));
        }

        let idx = self.alloc(key.clone(), value);
        self.index.insert(key, idx);
        self.push_front(idx);
        None
    }

    // == Remove ==
    /// Removes `key`, returning the stored pair.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        self.release(idx)
    }

    // == Pop LRU ==
    /// Removes and returns the least recently used pair.
    ///
    /// Returns None if the list is empty.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        self.unlink(idx);
        let entry = self.release(idx)?;
        self.index.remove(&entry.0);
        Some(entry)
    }

    // == Peek LRU ==
    /// Returns the least recently used pair without removing it.
    #[cfg(test)]
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let idx = self.tail?;
        self.slots[idx].as_ref().map(|(k, v)| (k, v))
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks membership without touching recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Keys ==
    /// Returns the keys from most to least recently used.
    pub fn keys_mru(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            if let Some((k, _)) = &self.slots[idx] {
                keys.push(k.clone());
            }
            cursor = self.links[idx].next;
        }
        keys
    }

    // == Clear ==
    /// Drops every entry and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.links.clear();
        self.free.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    // == Slot Management ==
    fn alloc(&mut self, key: K, value: V) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some((key, value));
                self.links[idx] = Link::default();
                idx
            }
            None => {
                self.slots.push(Some((key, value)));
                self.links.push(Link::default());
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        let entry = self.slots[idx].take();
        self.free.push(idx);
        entry
    }

    // == Linked List Operations ==
    /// Detaches a slot from the list, leaving its key indexed.
    fn unlink(&mut self, idx: usize) {
        let Link { prev, next } = self.links[idx];

        match prev {
            Some(p) => self.links[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.links[n].prev = prev,
            None => self.tail = prev,
        }

        self.links[idx] = Link::default();
    }

    fn push_front(&mut self, idx: usize) {
        self.links[idx] = Link {
            prev: None,
            next: self.head,
        };
        if let Some(old_head) = self.head {
            self.links[old_head].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }
}
