//! Ordered integer sets and maps backed by an x-fast trie.
//!
//! Keys are `u64` values restricted to a width of `key_bits` bits, fixed when
//! the trie is built. Every prefix of every stored key is registered in a
//! per-depth hash map, so the deepest existing ancestor of any query is found
//! with a binary search over depths, and predecessor/successor queries cost
//! `O(log w)` hash lookups. Stored keys are threaded on a doubly-linked leaf
//! list, which makes minimum/maximum `O(1)` and ordered iteration trivial.
//!
//! ```
//! use xfast_rs::XFastSet;
//!
//! let mut set = XFastSet::with_key_bits(8).unwrap();
//! set.insert(5).unwrap();
//! set.insert(42).unwrap();
//! assert_eq!(set.successor(5).unwrap(), Some(42));
//! assert_eq!(set.predecessor(5).unwrap(), None);
//! assert!(set.insert(256).is_err());
//! ```

use ahash::AHashMap as HashMap;
use std::fmt;

mod error;
mod iter;
mod set;
mod tracing_helpers;

pub use error::{Error, Result};
pub use iter::{Iter, IterMut, Keys, Values, ValuesMut};
pub use set::XFastSet;

use tracing_helpers::{debug_log, trace_log};

pub const MIN_KEY_BITS: u32 = 1;
pub const MAX_KEY_BITS: u32 = 64;
pub const DEFAULT_KEY_BITS: u32 = 64;

const NIL: u32 = u32::MAX;
// Arena indices run below NIL.
const MAX_SLOTS: usize = NIL as usize;

/// Index for a slot pushed onto an arena of length `len`.
fn slot_index(len: usize) -> Result<u32> {
    match u32::try_from(len) {
        Ok(idx) if idx != NIL => Ok(idx),
        _ => Err(Error::CapacityExceeded),
    }
}

/// Whether `needed` more slots fit, counting free-list entries.
fn has_room(used: usize, free: usize, needed: usize) -> bool {
    free.saturating_add(MAX_SLOTS.saturating_sub(used)) >= needed
}

/// An insert takes one leaf and at most one node per internal level.
fn room_for_insert(
    nodes_used: usize,
    nodes_free: usize,
    leaves_used: usize,
    leaves_free: usize,
    key_bits: u32,
) -> Result<()> {
    if has_room(nodes_used, nodes_free, key_bits as usize) && has_room(leaves_used, leaves_free, 1)
    {
        Ok(())
    } else {
        Err(Error::CapacityExceeded)
    }
}

#[derive(Clone)]
struct InternalNode {
    // Children live in `arena`, or in `leaf_arena` for the last internal level.
    children: [u32; 2],
    // Set only while one child is missing: the largest leaf of the left
    // subtree when the right child is missing, the smallest leaf of the
    // right subtree when the left child is missing.
    descendant: u32,
}

impl InternalNode {
    fn new() -> Self {
        Self {
            children: [NIL; 2],
            descendant: NIL,
        }
    }
}

#[derive(Clone)]
pub(crate) struct LeafNode<V> {
    pub(crate) key: u64,
    pub(crate) prev_leaf: u32,
    pub(crate) next_leaf: u32,
    // `None` while the slot sits on the free list, or briefly inside `get_or_insert_with`.
    pub(crate) value: Option<V>,
}

/// Where a query key lands relative to the stored keys.
enum Approx {
    Empty,
    OnTarget(u32),
    /// The leaf holds the largest stored key below the query.
    Below(u32),
    /// The leaf holds the smallest stored key above the query.
    Above(u32),
}

/// An ordered map from `key_bits`-wide integer keys to values.
#[derive(Clone)]
pub struct XFastMap<V> {
    key_bits: u32,
    len: usize,
    min_leaf: u32,
    max_leaf: u32,

    // levels[d] maps d-bit prefixes to internal nodes, levels[key_bits]
    // maps full keys to leaves.
    levels: Vec<HashMap<u64, u32>>,

    arena: Vec<InternalNode>,
    free_list: Vec<u32>,

    leaf_arena: Vec<LeafNode<V>>,
    leaf_free_list: Vec<u32>,
}

impl<V> Default for XFastMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> XFastMap<V> {
    /// Creates an empty map over the full 64-bit key domain.
    pub fn new() -> Self {
        Self::build(DEFAULT_KEY_BITS, 0)
    }

    /// Creates an empty map whose keys must fit in `key_bits` bits.
    pub fn with_key_bits(key_bits: u32) -> Result<Self> {
        Self::with_capacity(key_bits, 0)
    }

    /// Like [`with_key_bits`](Self::with_key_bits), with room for `capacity`
    /// keys before the leaf storage reallocates.
    pub fn with_capacity(key_bits: u32, capacity: usize) -> Result<Self> {
        if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&key_bits) {
            return Err(Error::InvalidKeyBits(key_bits));
        }
        Ok(Self::build(key_bits, capacity))
    }

    fn build(key_bits: u32, capacity: usize) -> Self {
        let mut levels: Vec<HashMap<u64, u32>> =
            (0..key_bits).map(|_| HashMap::new()).collect();
        levels.push(HashMap::with_capacity(capacity));
        debug_log!(key_bits, capacity, "created x-fast trie");

        XFastMap {
            key_bits,
            len: 0,
            min_leaf: NIL,
            max_leaf: NIL,
            levels,
            arena: Vec::new(),
            free_list: Vec::new(),
            leaf_arena: Vec::with_capacity(capacity),
            leaf_free_list: Vec::new(),
        }
    }

    pub fn key_bits(&self) -> u32 {
        self.key_bits
    }

    /// The largest key this map accepts.
    pub fn max_key(&self) -> u64 {
        u64::MAX >> (MAX_KEY_BITS - self.key_bits)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        for level in &mut self.levels {
            level.clear();
        }
        self.arena.clear();
        self.free_list.clear();
        self.leaf_arena.clear();
        self.leaf_free_list.clear();
        self.min_leaf = NIL;
        self.max_leaf = NIL;
        self.len = 0;
        debug_log!(key_bits = self.key_bits, "cleared x-fast trie");
    }

    #[inline(always)]
    fn check_key(&self, key: u64) -> Result<()> {
        if key > self.max_key() {
            return Err(Error::KeyOutOfRange {
                key,
                bits: self.key_bits,
            });
        }
        Ok(())
    }

    /// The leading `depth` bits of `key`.
    #[inline(always)]
    fn prefix(&self, key: u64, depth: u32) -> u64 {
        if depth == 0 {
            0
        } else {
            key >> (self.key_bits - depth)
        }
    }

    /// The bit of `key` that selects the child below a node at `depth`.
    #[inline(always)]
    fn bit(&self, key: u64, depth: u32) -> usize {
        ((key >> (self.key_bits - 1 - depth)) & 1) as usize
    }

    #[inline(always)]
    fn root(&self) -> Option<u32> {
        self.levels[0].get(&0).copied()
    }

    #[inline(always)]
    fn leaf_lookup(&self, key: u64) -> Option<u32> {
        self.levels[self.key_bits as usize].get(&key).copied()
    }

    /// Binary search over depths for the longest stored prefix of `key`.
    fn approx(&self, key: u64) -> Approx {
        let Some(mut found) = self.root() else {
            return Approx::Empty;
        };

        let mut lo = 0u32;
        let mut hi = self.key_bits + 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if let Some(&idx) = self.levels[mid as usize].get(&self.prefix(key, mid)) {
                lo = mid;
                found = idx;
            } else {
                hi = mid;
            }
        }

        if lo == self.key_bits {
            return Approx::OnTarget(found);
        }
        // The child towards `key` is missing, so the node is one-sided and
        // its descendant faces the missing side.
        let descendant = self.arena[found as usize].descendant;
        if self.bit(key, lo) == 1 {
            Approx::Below(descendant)
        } else {
            Approx::Above(descendant)
        }
    }

    #[inline(always)]
    fn entry(&self, leaf_idx: u32) -> Option<(u64, &V)> {
        if leaf_idx == NIL {
            return None;
        }
        let leaf = &self.leaf_arena[leaf_idx as usize];
        leaf.value.as_ref().map(|v| (leaf.key, v))
    }

    #[inline(always)]
    fn prev_of(&self, leaf_idx: u32) -> u32 {
        self.leaf_arena[leaf_idx as usize].prev_leaf
    }

    #[inline(always)]
    fn next_of(&self, leaf_idx: u32) -> u32 {
        self.leaf_arena[leaf_idx as usize].next_leaf
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.leaf_lookup(key).is_some()
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        let leaf_idx = self.leaf_lookup(key)?;
        self.leaf_arena[leaf_idx as usize].value.as_ref()
    }

    pub fn get_mut(&mut self, key: u64) -> Option<&mut V> {
        let leaf_idx = self.leaf_lookup(key)?;
        self.leaf_arena[leaf_idx as usize].value.as_mut()
    }

    /// The entry with the smallest key.
    #[inline(always)]
    pub fn leftmost(&self) -> Option<(u64, &V)> {
        self.entry(self.min_leaf)
    }

    /// The entry with the largest key.
    #[inline(always)]
    pub fn rightmost(&self) -> Option<(u64, &V)> {
        self.entry(self.max_leaf)
    }

    /// The entry with the largest key strictly less than `key`.
    pub fn predecessor(&self, key: u64) -> Result<Option<(u64, &V)>> {
        self.check_key(key)?;
        let leaf_idx = match self.approx(key) {
            Approx::Empty => NIL,
            Approx::OnTarget(l) | Approx::Above(l) => self.prev_of(l),
            Approx::Below(l) => l,
        };
        Ok(self.entry(leaf_idx))
    }

    /// The entry with the smallest key strictly greater than `key`.
    pub fn successor(&self, key: u64) -> Result<Option<(u64, &V)>> {
        self.check_key(key)?;
        let leaf_idx = match self.approx(key) {
            Approx::Empty => NIL,
            Approx::OnTarget(l) | Approx::Below(l) => self.next_of(l),
            Approx::Above(l) => l,
        };
        Ok(self.entry(leaf_idx))
    }

    /// The entry with the largest key less than or equal to `key`.
    pub fn floor(&self, key: u64) -> Result<Option<(u64, &V)>> {
        self.check_key(key)?;
        let leaf_idx = match self.approx(key) {
            Approx::Empty => NIL,
            Approx::OnTarget(l) | Approx::Below(l) => l,
            Approx::Above(l) => self.prev_of(l),
        };
        Ok(self.entry(leaf_idx))
    }

    /// The entry with the smallest key greater than or equal to `key`.
    pub fn ceiling(&self, key: u64) -> Result<Option<(u64, &V)>> {
        self.check_key(key)?;
        let leaf_idx = match self.approx(key) {
            Approx::Empty => NIL,
            Approx::OnTarget(l) | Approx::Above(l) => l,
            Approx::Below(l) => self.next_of(l),
        };
        Ok(self.entry(leaf_idx))
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: u64, value: V) -> Result<Option<V>> {
        self.check_key(key)?;
        self.insert_in_domain(key, value)
    }

    /// Returns the value under `key`, first inserting `make()` if the key
    /// is absent.
    pub fn get_or_insert_with(&mut self, key: u64, make: impl FnOnce() -> V) -> Result<&mut V> {
        self.check_key(key)?;
        let leaf_idx = match self.approx(key) {
            Approx::OnTarget(l) => l,
            Approx::Empty => self.link_leaf(key, None, NIL, NIL)?,
            Approx::Below(l) => self.link_leaf(key, None, l, self.next_of(l))?,
            Approx::Above(l) => self.link_leaf(key, None, self.prev_of(l), l)?,
        };
        Ok(self.leaf_arena[leaf_idx as usize].value.get_or_insert_with(make))
    }

    fn insert_in_domain(&mut self, key: u64, value: V) -> Result<Option<V>> {
        let (prev_l, next_l) = match self.approx(key) {
            Approx::OnTarget(leaf_idx) => {
                return Ok(self.leaf_arena[leaf_idx as usize].value.replace(value));
            }
            Approx::Empty => (NIL, NIL),
            Approx::Below(l) => (l, self.next_of(l)),
            Approx::Above(l) => (self.prev_of(l), l),
        };
        self.link_leaf(key, Some(value), prev_l, next_l)?;
        Ok(None)
    }

    /// Allocates a leaf for the absent `key`, splices it between `prev_l`
    /// and `next_l` and builds its path.
    fn link_leaf(&mut self, key: u64, value: Option<V>, prev_l: u32, next_l: u32) -> Result<u32> {
        self.ensure_room()?;
        let leaf_idx = self.alloc_leaf(LeafNode {
            key,
            prev_leaf: prev_l,
            next_leaf: next_l,
            value,
        })?;
        if prev_l != NIL {
            self.leaf_arena[prev_l as usize].next_leaf = leaf_idx;
        } else {
            self.min_leaf = leaf_idx;
        }
        if next_l != NIL {
            self.leaf_arena[next_l as usize].prev_leaf = leaf_idx;
        } else {
            self.max_leaf = leaf_idx;
        }

        self.link_path(key, leaf_idx)?;
        self.len += 1;
        trace_log!(key, leaf = leaf_idx, len = self.len, "inserted key");
        Ok(leaf_idx)
    }

    /// Fails before anything is mutated when an insert could need more
    /// slots than `u32` indices address.
    fn ensure_room(&self) -> Result<()> {
        room_for_insert(
            self.arena.len(),
            self.free_list.len(),
            self.leaf_arena.len(),
            self.leaf_free_list.len(),
            self.key_bits,
        )
    }

    /// Creates the missing nodes along `key`'s path, registers them in the
    /// level maps and refreshes the descendant of every one-sided ancestor.
    fn link_path(&mut self, key: u64, leaf_idx: u32) -> Result<()> {
        let mut node_idx = match self.root() {
            Some(idx) => idx,
            None => {
                let idx = self.alloc_node()?;
                self.levels[0].insert(0, idx);
                trace_log!(depth = 0, node = idx, "created root");
                idx
            }
        };

        for depth in 0..self.key_bits {
            let slot = self.bit(key, depth);
            let child_depth = depth + 1;
            let existing = self.arena[node_idx as usize].children[slot];

            let child_idx = if existing != NIL {
                existing
            } else if child_depth == self.key_bits {
                leaf_idx
            } else {
                let idx = self.alloc_node()?;
                let prefix = self.prefix(key, child_depth);
                self.levels[child_depth as usize].insert(prefix, idx);
                trace_log!(depth = child_depth, prefix, node = idx, "created node");
                idx
            };

            let node = &mut self.arena[node_idx as usize];
            node.children[slot] = child_idx;
            if node.children[slot ^ 1] != NIL {
                node.descendant = NIL;
            } else if existing == NIL {
                node.descendant = leaf_idx;
            } else {
                let current = self.leaf_arena[node.descendant as usize].key;
                if (slot == 1 && key < current) || (slot == 0 && key > current) {
                    node.descendant = leaf_idx;
                }
            }
            node_idx = child_idx;
        }

        self.levels[self.key_bits as usize].insert(key, leaf_idx);
        Ok(())
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: u64) -> Result<Option<V>> {
        self.check_key(key)?;
        Ok(self.remove_in_domain(key))
    }

    fn remove_in_domain(&mut self, key: u64) -> Option<V> {
        let leaf_idx = self.leaf_lookup(key)?;
        let root = self.root()?;

        let mut path = [NIL; MAX_KEY_BITS as usize];
        let mut node_idx = root;
        for depth in 0..self.key_bits {
            path[depth as usize] = node_idx;
            node_idx = self.arena[node_idx as usize].children[self.bit(key, depth)];
        }

        let (prev_l, next_l) = {
            let leaf = &self.leaf_arena[leaf_idx as usize];
            (leaf.prev_leaf, leaf.next_leaf)
        };
        if prev_l != NIL {
            self.leaf_arena[prev_l as usize].next_leaf = next_l;
        } else {
            self.min_leaf = next_l;
        }
        if next_l != NIL {
            self.leaf_arena[next_l as usize].prev_leaf = prev_l;
        } else {
            self.max_leaf = prev_l;
        }
        self.levels[self.key_bits as usize].remove(&key);

        // Prune nodes left childless, then fix descendants that pointed at
        // the removed leaf.
        let mut subtree_removed = true;
        for depth in (0..self.key_bits).rev() {
            let node_idx = path[depth as usize];
            let slot = self.bit(key, depth);
            let prefix = self.prefix(key, depth);
            let node = &mut self.arena[node_idx as usize];

            if subtree_removed {
                node.children[slot] = NIL;
                if node.children[slot ^ 1] != NIL {
                    node.descendant = if slot == 1 { prev_l } else { next_l };
                    subtree_removed = false;
                } else {
                    self.levels[depth as usize].remove(&prefix);
                    self.free_list.push(node_idx);
                    trace_log!(depth, prefix, node = node_idx, "released node");
                }
            } else if node.descendant == leaf_idx {
                node.descendant = if node.children[0] == NIL { next_l } else { prev_l };
            }
        }

        let leaf = &mut self.leaf_arena[leaf_idx as usize];
        leaf.prev_leaf = NIL;
        leaf.next_leaf = NIL;
        let value = leaf.value.take();
        self.leaf_free_list.push(leaf_idx);
        self.len -= 1;
        trace_log!(key, leaf = leaf_idx, len = self.len, "removed key");
        value
    }

    fn alloc_node(&mut self) -> Result<u32> {
        if let Some(idx) = self.free_list.pop() {
            self.arena[idx as usize] = InternalNode::new();
            Ok(idx)
        } else {
            let idx = slot_index(self.arena.len())?;
            self.arena.push(InternalNode::new());
            Ok(idx)
        }
    }

    fn alloc_leaf(&mut self, leaf: LeafNode<V>) -> Result<u32> {
        if let Some(idx) = self.leaf_free_list.pop() {
            self.leaf_arena[idx as usize] = leaf;
            Ok(idx)
        } else {
            let idx = slot_index(self.leaf_arena.len())?;
            self.leaf_arena.push(leaf);
            Ok(idx)
        }
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.leaf_arena, self.min_leaf, self.max_leaf, self.len)
    }

    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Entries in ascending key order, with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut::new(&mut self.leaf_arena, self.min_leaf, self.max_leaf, self.len)
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }
}

impl<V: PartialEq> PartialEq for XFastMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.key_bits == other.key_bits && self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for XFastMap<V> {}

impl<V: fmt::Debug> fmt::Debug for XFastMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a XFastMap<V> {
    type Item = (u64, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut XFastMap<V> {
    type Item = (u64, &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Collects into a 64-bit map, where every key is in range.
impl<V> FromIterator<(u64, V)> for XFastMap<V> {
    fn from_iter<I: IntoIterator<Item = (u64, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            if let Err(err) = map.insert_in_domain(key, value) {
                panic!("{err}");
            }
        }
        map
    }
}

#[cfg(test)]
mod proptests;

include!("tests.rs");
