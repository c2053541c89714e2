use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use ahash::RandomState;
use indexmap::IndexMap;

use crate::LuaValue;

/// Insertion-ordered keyed segment, used for both the string part and the
/// generic part of a table.
///
/// Assigning nil to an existing key leaves a tombstone instead of removing
/// the entry, so positions stay stable for a running `pairs` traversal.
/// Tombstones are swept when a new key is inserted and they make up at
/// least half of the slots.
pub struct LuaHashTable<K> {
    map: IndexMap<K, LuaValue, RandomState>,
    dead: usize,
}

impl<K: Hash + Eq> LuaHashTable<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: IndexMap::with_capacity_and_hasher(capacity, RandomState::new()),
            dead: 0,
        }
    }

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&LuaValue>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key)
    }

    pub fn set(&mut self, key: K, value: LuaValue) {
        if let Some(slot) = self.map.get_mut(&key) {
            match (slot.is_nil(), value.is_nil()) {
                (false, true) => self.dead += 1,
                (true, false) => self.dead -= 1,
                _ => {}
            }
            *slot = value;
            return;
        }

        if value.is_nil() {
            return;
        }
        if self.dead > 0 && self.dead * 2 >= self.map.len() {
            self.sweep();
        }
        self.map.insert(key, value);
    }

    /// Remove a key outright, returning its value when it held one
    pub fn take<Q>(&mut self, key: &Q) -> Option<LuaValue>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.map.shift_remove(key)?;
        if value.is_nil() {
            self.dead -= 1;
            None
        } else {
            Some(value)
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.map.len() - self.dead
    }

    /// Slot at a position, tombstones included
    #[inline]
    pub fn entry_at(&self, index: usize) -> Option<(&K, &LuaValue)> {
        self.map.get_index(index)
    }

    pub fn slots(&self) -> usize {
        self.map.len()
    }

    fn sweep(&mut self) {
        self.map.retain(|_, v| !v.is_nil());
        self.dead = 0;
    }
}

/// Key of the generic segment.
///
/// Numbers, booleans and strings compare by value, tables, functions and
/// foreign values by identity. Nil and NaN never reach this type.
#[derive(Clone, Debug)]
pub struct HashKey(pub LuaValue);

impl PartialEq for HashKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.raw_equal(&other.0)
    }
}

impl Eq for HashKey {}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(&self.0).hash(state);
        match &self.0 {
            LuaValue::Nil => {}
            LuaValue::Boolean(b) => b.hash(state),
            // +0.0 and -0.0 are the same key
            LuaValue::Number(n) => (if *n == 0.0 { 0.0f64 } else { *n }).to_bits().hash(state),
            LuaValue::String(s) => s.hash(state),
            other => other.identity().hash(state),
        }
    }
}
