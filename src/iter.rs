use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::{LeafNode, NIL};

/// Walks the leaf list from both ends; `remaining` keeps the two cursors
/// from crossing.
pub struct Iter<'a, V> {
    leaves: &'a [LeafNode<V>],
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(leaves: &'a [LeafNode<V>], front: u32, back: u32, remaining: usize) -> Self {
        Self {
            leaves,
            front,
            back,
            remaining,
        }
    }
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            leaves: self.leaves,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.front == NIL {
            return None;
        }
        let leaf = &self.leaves[self.front as usize];
        self.front = leaf.next_leaf;
        self.remaining -= 1;
        leaf.value.as_ref().map(|v| (leaf.key, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.back == NIL {
            return None;
        }
        let leaf = &self.leaves[self.back as usize];
        self.back = leaf.prev_leaf;
        self.remaining -= 1;
        leaf.value.as_ref().map(|v| (leaf.key, v))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

pub struct Keys<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<V> Clone for Keys<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> Iterator for Keys<'_, V> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for Keys<'_, V> {
    fn next_back(&mut self) -> Option<u64> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

impl<V> FusedIterator for Keys<'_, V> {}

pub struct Values<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for Values<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> FusedIterator for Values<'_, V> {}

/// Mutable counterpart of [`Iter`].
pub struct IterMut<'a, V> {
    leaves: *mut LeafNode<V>,
    front: u32,
    back: u32,
    remaining: usize,
    _marker: PhantomData<&'a mut [LeafNode<V>]>,
}

impl<'a, V> IterMut<'a, V> {
    pub(crate) fn new(
        leaves: &'a mut [LeafNode<V>],
        front: u32,
        back: u32,
        remaining: usize,
    ) -> Self {
        Self {
            leaves: leaves.as_mut_ptr(),
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }

    // SAFETY: callers pass a live leaf index that no earlier call yielded.
    // Both cursors walk the same list and stop once `remaining` hits zero,
    // so every leaf is borrowed at most once.
    unsafe fn leaf(&mut self, idx: u32) -> &'a mut LeafNode<V> {
        unsafe { &mut *self.leaves.add(idx as usize) }
    }
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (u64, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.front == NIL {
            return None;
        }
        let leaf = unsafe { self.leaf(self.front) };
        self.front = leaf.next_leaf;
        self.remaining -= 1;
        let key = leaf.key;
        leaf.value.as_mut().map(|v| (key, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for IterMut<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.back == NIL {
            return None;
        }
        let leaf = unsafe { self.leaf(self.back) };
        self.back = leaf.prev_leaf;
        self.remaining -= 1;
        let key = leaf.key;
        leaf.value.as_mut().map(|v| (key, v))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}

pub struct ValuesMut<'a, V> {
    pub(crate) inner: IterMut<'a, V>,
}

impl<'a, V> Iterator for ValuesMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for ValuesMut<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<V> ExactSizeIterator for ValuesMut<'_, V> {}

impl<V> FusedIterator for ValuesMut<'_, V> {}
