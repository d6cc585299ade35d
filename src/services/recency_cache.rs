//! Bounded LRU cache keyed by window handle.
//!
//! Recency order lives in an arena-backed doubly-linked list (`Vec` of nodes
//! linked by slot index, head = most recently used). The index maps every
//! cached handle to its value and to the slot of its list node, so a hit is
//! a constant-time splice to the head and eviction always pops the tail.
//!
//! This type is single-threaded; [`SharedRecencyCache`](super::SharedRecencyCache)
//! adds the locking and background population.

use crate::events::WindowHandle;
use std::collections::HashMap;

/// Пустая ссылка в списке
const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct RecencyNode {
    key: WindowHandle,
    prev: usize,
    next: usize,
}

/// Cached value plus the slot of its node in the recency list.
#[derive(Debug, Clone, Copy)]
struct CacheEntry<V> {
    value: V,
    slot: usize,
}

#[derive(Debug)]
pub struct BoundedRecencyCache<V> {
    capacity: usize,
    index: HashMap<WindowHandle, CacheEntry<V>>,
    nodes: Vec<RecencyNode>,
    free_slots: Vec<usize>,
    head: usize,
    tail: usize,
}

impl<V: Copy> BoundedRecencyCache<V> {
    /// Capacity 0 is accepted: every insert is dropped and every lookup misses.
    pub fn new(capacity: usize) -> Self {
        // Не резервируем больше разумного: capacity может прийти из конфигурации
        let reserve = capacity.min(1024);
        Self {
            capacity,
            index: HashMap::with_capacity(reserve),
            nodes: Vec::with_capacity(reserve),
            free_slots: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn size(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the cached value and promotes `key` to most recently used.
    pub fn try_get(&mut self, key: WindowHandle) -> Option<V> {
        let entry = *self.index.get(&key)?;
        self.promote(entry.slot);
        Some(entry.value)
    }

    /// Inserts or overwrites `key` as most recently used.
    ///
    /// Returns the handle evicted to stay within capacity, if any. Re-inserting
    /// an existing key never evicts.
    pub fn insert(&mut self, key: WindowHandle, value: V) -> Option<WindowHandle> {
        if let Some(entry) = self.index.get_mut(&key) {
            entry.value = value;
            let slot = entry.slot;
            self.promote(slot);
            return None;
        }

        if self.capacity == 0 {
            return None;
        }

        let slot = self.allocate(key);
        self.link_front(slot);
        self.index.insert(key, CacheEntry { value, slot });

        if self.index.len() > self.capacity {
            return self.evict_lru();
        }
        None
    }

    /// Handles from most to least recently used.
    pub fn recency_order(&self) -> Vec<WindowHandle> {
        let mut order = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while cursor != NIL {
            let node = &self.nodes[cursor];
            order.push(node.key);
            cursor = node.next;
        }
        order
    }

    /// Checks that the index and the recency list describe the same key set,
    /// that every index slot points at its own node, and that the bound holds.
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0usize;
        let mut prev = NIL;
        let mut cursor = self.head;

        while cursor != NIL {
            if seen > self.index.len() {
                // Цикл в списке
                return false;
            }
            let node = &self.nodes[cursor];
            if node.prev != prev {
                return false;
            }
            match self.index.get(&node.key) {
                Some(entry) if entry.slot == cursor => {}
                _ => return false,
            }
            seen += 1;
            prev = cursor;
            cursor = node.next;
        }

        prev == self.tail && seen == self.index.len() && seen <= self.capacity
    }

    fn allocate(&mut self, key: WindowHandle) -> usize {
        let node = RecencyNode {
            key,
            prev: NIL,
            next: NIL,
        };
        match self.free_slots.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn link_front(&mut self, slot: usize) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = slot;
        } else {
            self.tail = slot;
        }
        self.head = slot;
    }

    fn unlink(&mut self, slot: usize) {
        let RecencyNode { prev, next, .. } = self.nodes[slot];
        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = NIL;
    }

    fn promote(&mut self, slot: usize) {
        if slot == self.head {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    fn evict_lru(&mut self) -> Option<WindowHandle> {
        if self.tail == NIL {
            return None;
        }
        let slot = self.tail;
        self.unlink(slot);
        self.free_slots.push(slot);
        let key = self.nodes[slot].key;
        self.index.remove(&key);
        Some(key)
    }
}
