use std::fmt;

use crate::{Keys, Result, XFastMap};

/// An ordered set of `key_bits`-wide integers.
///
/// Inserting a present key or removing an absent one leaves the set unchanged
/// and is reported through the returned `bool`. Keys wider than the
/// configured width are rejected with [`Error::KeyOutOfRange`](crate::Error).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct XFastSet {
    pub(crate) map: XFastMap<()>,
}

impl XFastSet {
    pub fn new() -> Self {
        Self {
            map: XFastMap::new(),
        }
    }

    pub fn with_key_bits(key_bits: u32) -> Result<Self> {
        Ok(Self {
            map: XFastMap::with_key_bits(key_bits)?,
        })
    }

    pub fn with_capacity(key_bits: u32, capacity: usize) -> Result<Self> {
        Ok(Self {
            map: XFastMap::with_capacity(key_bits, capacity)?,
        })
    }

    pub fn key_bits(&self) -> u32 {
        self.map.key_bits()
    }

    pub fn max_key(&self) -> u64 {
        self.map.max_key()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns `true` if `key` was not already present.
    pub fn insert(&mut self, key: u64) -> Result<bool> {
        Ok(self.map.insert(key, ())?.is_none())
    }

    /// Returns `true` if `key` was present.
    pub fn remove(&mut self, key: u64) -> Result<bool> {
        Ok(self.map.remove(key)?.is_some())
    }

    pub fn contains(&self, key: u64) -> bool {
        self.map.contains_key(key)
    }

    pub fn leftmost(&self) -> Option<u64> {
        self.map.leftmost().map(|(k, _)| k)
    }

    pub fn rightmost(&self) -> Option<u64> {
        self.map.rightmost().map(|(k, _)| k)
    }

    pub fn predecessor(&self, key: u64) -> Result<Option<u64>> {
        Ok(self.map.predecessor(key)?.map(|(k, _)| k))
    }

    pub fn successor(&self, key: u64) -> Result<Option<u64>> {
        Ok(self.map.successor(key)?.map(|(k, _)| k))
    }

    pub fn floor(&self, key: u64) -> Result<Option<u64>> {
        Ok(self.map.floor(key)?.map(|(k, _)| k))
    }

    pub fn ceiling(&self, key: u64) -> Result<Option<u64>> {
        Ok(self.map.ceiling(key)?.map(|(k, _)| k))
    }

    pub fn iter(&self) -> Keys<'_, ()> {
        self.map.keys()
    }
}

impl fmt::Debug for XFastSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a XFastSet {
    type Item = u64;
    type IntoIter = Keys<'a, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<u64> for XFastSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|k| (k, ())).collect(),
        }
    }
}
