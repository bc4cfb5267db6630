//! Open-addressing hash table keyed by borrowed label bytes.
//!
//! Capacity is always a power of two. Collisions are resolved with triangular
//! probing (`h, h+1, h+3, h+6, ...` modulo the capacity), which visits every
//! slot exactly once. Entries are never removed, so no tombstones exist.

use log::debug;
use thiserror::Error;

/// Hash function used to place keys. Swappable per table.
pub type HashFn = fn(&[u8]) -> u32;

pub const MIN_CAPACITY: usize = 32;
pub const DEFAULT_CAPACITY: usize = 256;
pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;

/// Internal failures of the table. Not user errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("label table could not grow past {capacity} slots")]
    GrowthFailed { capacity: usize },
    #[error("label table has no free slot ({capacity} slots searched)")]
    Exhausted { capacity: usize },
}

/// 32-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Bernstein's `hash * 33 + c`.
pub fn djb2(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 5381;
    for &b in bytes {
        hash = hash.wrapping_add((hash << 5).wrapping_add(u32::from(b)));
    }
    hash
}

#[derive(Debug, Clone)]
struct Entry<'src, V> {
    key: &'src [u8],
    value: V,
    hash: u32,
}

enum Search {
    Found(usize),
    Vacant(usize),
    Exhausted,
}

/// Map from label bytes to `V`, supporting insert-or-update and lookup only.
#[derive(Debug, Clone)]
pub struct HashTable<'src, V> {
    hash_fn: HashFn,
    slots: Vec<Option<Entry<'src, V>>>,
    count: usize,
    load_factor: f64,
}

impl<V> Default for HashTable<'_, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'src, V> HashTable<'src, V> {
    /// 256 slots, load factor 0.7, FNV-1a.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, fnv1a)
    }

    /// Capacity is rounded up to a power of two, never below [`MIN_CAPACITY`].
    /// A load factor outside `(0, 1)` falls back to [`DEFAULT_LOAD_FACTOR`].
    pub fn with_capacity(requested: usize, load_factor: f64, hash_fn: HashFn) -> Self {
        let load_factor = if load_factor > 0.0 && load_factor < 1.0 {
            load_factor
        } else {
            DEFAULT_LOAD_FACTOR
        };
        let mut size = MIN_CAPACITY;
        while size < requested {
            match size.checked_mul(2) {
                Some(next) => size = next,
                None => break,
            }
        }
        let mut slots = Vec::with_capacity(size);
        slots.resize_with(size, || None);
        Self {
            hash_fn,
            slots,
            count: 0,
            load_factor,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Insert `value` under `key`, or overwrite the value of an equal key.
    /// Grows the table first when the insert would exceed the load factor.
    ///
    /// Returns the slot now holding the key.
    ///
    /// # Errors
    /// Fails only when the table cannot grow or no free slot is found, both of
    /// which indicate an internal fault.
    #[allow(clippy::cast_precision_loss)]
    pub fn put(&mut self, key: &'src [u8], value: V) -> Result<usize, TableError> {
        if (self.count + 1) as f64 > self.slots.len() as f64 * self.load_factor {
            self.resize()?;
        }

        let hash = (self.hash_fn)(key);
        match search(&self.slots, hash, key) {
            Search::Found(slot) => {
                if let Some(entry) = self.slots[slot].as_mut() {
                    entry.value = value;
                }
                Ok(slot)
            },
            Search::Vacant(slot) => {
                self.slots[slot] = Some(Entry { key, value, hash });
                self.count += 1;
                Ok(slot)
            },
            Search::Exhausted => Err(TableError::Exhausted {
                capacity: self.slots.len(),
            }),
        }
    }

    /// Slot index of `key`, if present.
    pub fn find(&self, key: &[u8]) -> Option<usize> {
        match search(&self.slots, (self.hash_fn)(key), key) {
            Search::Found(slot) => Some(slot),
            Search::Vacant(_) | Search::Exhausted => None,
        }
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.find(key).and_then(|slot| self.value_at(slot))
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let slot = self.find(key)?;
        self.value_at_mut(slot)
    }

    /// Key and value stored at `slot`, if it is occupied.
    pub fn entry_at(&self, slot: usize) -> Option<(&'src [u8], &V)> {
        self.slots.get(slot)?.as_ref().map(|e| (e.key, &e.value))
    }

    pub fn value_at(&self, slot: usize) -> Option<&V> {
        self.slots.get(slot)?.as_ref().map(|e| &e.value)
    }

    pub fn value_at_mut(&mut self, slot: usize) -> Option<&mut V> {
        self.slots.get_mut(slot)?.as_mut().map(|e| &mut e.value)
    }

    /// Occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&'src [u8], &V)> + '_ {
        self.slots.iter().flatten().map(|e| (e.key, &e.value))
    }

    /// Occupied keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &'src [u8]> + '_ {
        self.slots.iter().flatten().map(|e| e.key)
    }

    /// Double the capacity and re-insert every entry.
    ///
    /// New positions are computed before anything moves, so a failed resize
    /// leaves the table untouched.
    fn resize(&mut self) -> Result<(), TableError> {
        let old_size = self.slots.len();
        let new_size = old_size
            .checked_mul(2)
            .ok_or(TableError::GrowthFailed { capacity: old_size })?;

        let mask = new_size - 1;
        let mut taken = vec![false; new_size];
        let mut moves = Vec::with_capacity(self.count);
        for (old_slot, entry) in self.slots.iter().enumerate() {
            let Some(entry) = entry else { continue };
            let mut index = entry.hash as usize & mask;
            let mut placed = false;
            for step in 1..=new_size {
                if !taken[index] {
                    taken[index] = true;
                    moves.push((old_slot, index));
                    placed = true;
                    break;
                }
                index = (index + step) & mask;
            }
            if !placed {
                return Err(TableError::GrowthFailed { capacity: old_size });
            }
        }

        let mut slots = Vec::with_capacity(new_size);
        slots.resize_with(new_size, || None);
        for (old_slot, new_slot) in moves {
            slots[new_slot] = self.slots[old_slot].take();
        }
        self.slots = slots;
        debug!("label table resized {old_size} -> {new_size} ({} entries)", self.count);
        Ok(())
    }
}

fn search<V>(slots: &[Option<Entry<'_, V>>], hash: u32, key: &[u8]) -> Search {
    let mask = slots.len() - 1;
    let mut index = hash as usize & mask;
    for step in 1..=slots.len() {
        match &slots[index] {
            None => return Search::Vacant(index),
            Some(entry) if entry.hash == hash && entry.key == key => return Search::Found(index),
            Some(_) => index = (index + step) & mask,
        }
    }
    Search::Exhausted
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn constant_hash(_: &[u8]) -> u32 {
        7
    }

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn djb2_multiplies_by_33() {
        assert_eq!(djb2(b""), 5381);
        assert_eq!(djb2(b"a"), 5381 * 33 + 97);
    }

    #[test]
    fn capacity_rounds_up_to_power_of_two() {
        assert_eq!(HashTable::<()>::with_capacity(0, 0.7, fnv1a).capacity(), 32);
        assert_eq!(HashTable::<()>::with_capacity(33, 0.7, fnv1a).capacity(), 64);
        assert_eq!(HashTable::<()>::with_capacity(256, 0.7, fnv1a).capacity(), 256);
        assert_eq!(HashTable::<()>::new().capacity(), 256);
    }

    #[test]
    fn out_of_range_load_factor_falls_back() {
        assert!((HashTable::<()>::with_capacity(32, 1.5, fnv1a).load_factor() - 0.7).abs() < f64::EPSILON);
        assert!((HashTable::<()>::with_capacity(32, 0.0, fnv1a).load_factor() - 0.7).abs() < f64::EPSILON);
        assert!((HashTable::<()>::with_capacity(32, 0.5, fnv1a).load_factor() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn put_updates_existing_key_in_place() {
        let mut table = HashTable::new();
        let first = table.put(b"intro", 1).unwrap();
        let second = table.put(b"intro", 2).unwrap();
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b"intro"), Some(&2));
        assert_eq!(table.get(b"outro"), None);
    }

    #[test]
    fn resizes_keep_every_entry_with_latest_value() {
        let keys: Vec<String> = (0..1000).map(|i| format!("label_{i}")).collect();
        let mut table = HashTable::with_capacity(0, 0.7, fnv1a);
        for (i, key) in keys.iter().enumerate() {
            table.put(key.as_bytes(), i).unwrap();
        }
        for (i, key) in keys.iter().enumerate().step_by(3) {
            table.put(key.as_bytes(), i * 10).unwrap();
        }
        assert_eq!(table.len(), 1000);
        assert!(table.capacity() >= 2048);
        for (i, key) in keys.iter().enumerate() {
            let expected = if i % 3 == 0 { i * 10 } else { i };
            assert_eq!(table.get(key.as_bytes()), Some(&expected), "{key}");
        }
    }

    #[test]
    fn colliding_hashes_still_resolve() {
        let keys: Vec<String> = (0..100).map(|i| format!("k{i}")).collect();
        let mut table = HashTable::with_capacity(0, 0.7, constant_hash);
        for key in &keys {
            table.put(key.as_bytes(), key.len()).unwrap();
        }
        for key in &keys {
            assert_eq!(table.get(key.as_bytes()), Some(&key.len()));
        }
        assert!(!table.contains_key(b"absent"));
    }

    #[test]
    fn triangular_steps_visit_every_slot_once() {
        let size = 64usize;
        let mask = size - 1;
        let mut seen = HashSet::new();
        let mut index = 13 & mask;
        for step in 1..=size {
            seen.insert(index);
            index = (index + step) & mask;
        }
        assert_eq!(seen.len(), size);
    }

    #[test]
    fn slot_accessors_agree_with_lookup() {
        let mut table = HashTable::new();
        let slot = table.put(b"cave", "dark").unwrap();
        assert_eq!(table.find(b"cave"), Some(slot));
        assert_eq!(table.entry_at(slot), Some((&b"cave"[..], &"dark")));
        *table.value_at_mut(slot).unwrap() = "lit";
        assert_eq!(table.get(b"cave"), Some(&"lit"));
        assert_eq!(table.keys().collect::<Vec<_>>(), vec![&b"cave"[..]]);
    }
}
