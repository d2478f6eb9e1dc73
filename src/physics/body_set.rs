//! Dense body storage with stable handles.

use super::body::Body;

/// Stable identifier for a body. Handles are never reused within a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(u64);

impl BodyHandle {
    #[inline]
    pub fn index(self) -> u64 {
        self.0
    }
}

/// Bodies kept in insertion order.
///
/// Handles are issued in increasing order and removal keeps the vector
/// ordered, so lookup is a binary search and pair iteration is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    entries: Vec<(BodyHandle, Body)>,
    next: u64,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.next);
        self.next += 1;
        self.entries.push((handle, body));
        handle
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        let slot = self.slot(handle)?;
        Some(self.entries.remove(slot).1)
    }

    #[inline]
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.slot(handle).map(|i| &self.entries[i].1)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.slot(handle).map(move |i| &mut self.entries[i].1)
    }

    /// Mutable access to two distinct bodies at once.
    pub fn get_pair_mut(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Option<(&mut Body, &mut Body)> {
        let ia = self.slot(a)?;
        let ib = self.slot(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (head, tail) = self.entries.split_at_mut(ib);
            Some((&mut head[ia].1, &mut tail[0].1))
        } else {
            let (head, tail) = self.entries.split_at_mut(ia);
            Some((&mut tail[0].1, &mut head[ib].1))
        }
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.slot(handle).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.entries.iter().map(|(h, b)| (*h, b))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> {
        self.entries.iter_mut().map(|(h, b)| (*h, b))
    }

    fn slot(&self, handle: BodyHandle) -> Option<usize> {
        self.entries.binary_search_by_key(&handle, |(h, _)| *h).ok()
    }
}
