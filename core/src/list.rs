//! Generic singly linked list.
//!
//! # Design
//! Nodes live in a `Vec` and link to each other by index, so any payload
//! type can participate without a separate node allocation and without
//! pointer casts. The list keeps both `head` and `tail`, which makes
//! `append` O(1); `find` and `iterate` walk the `next` chain from `head`
//! and therefore always observe insertion order.
//!
//! `append_to`, `find_in` and `iterate_over` take the list through an
//! `Option` root, so the first append can create the list in place.

use tracing::trace;

/// Stable handle to a node, valid for the lifetime of the list that
/// returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    next: Option<usize>,
}

/// Singly linked, acyclic list. Traversal order equals append order.
#[derive(Debug, Clone)]
pub struct List<T> {
    nodes: Vec<Node<T>>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Link `value` after the current tail. The first append also sets the head.
    pub fn append(&mut self, value: T) -> NodeId {
        let idx = self.nodes.len();
        self.nodes.push(Node { value, next: None });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        trace!(len = self.nodes.len(), "list append");
        NodeId(idx)
    }

    /// Return the first element, in list order, for which `matches(element, key)`
    /// holds. The comparison is entirely up to the caller.
    pub fn find<K, F>(&self, key: &K, mut matches: F) -> Option<&T>
    where
        K: ?Sized,
        F: FnMut(&T, &K) -> bool,
    {
        self.iter().find(|value| matches(value, key))
    }

    /// Call `callback(element, uptr)` once per element in list order.
    /// Unlike `find` there is no early exit.
    pub fn iterate<U, F>(&self, uptr: &mut U, mut callback: F)
    where
        U: ?Sized,
        F: FnMut(&T, &mut U),
    {
        for value in self.iter() {
            callback(value, uptr);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0).map(|node| &node.value)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }
}

impl<T> std::ops::Index<NodeId> for List<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.nodes[id.0].value
    }
}

/// Borrowing iterator that follows the `next` links from the head.
pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.cursor?];
        self.cursor = node.next;
        Some(&node.value)
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator. Nodes are only ever pushed at the tail, so storage
/// order is list order.
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<Node<T>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| node.value)
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.nodes.into_iter(),
        }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        for value in iter {
            list.append(value);
        }
        list
    }
}

/// Append through a root reference, creating the list if the root is empty.
pub fn append_to<T>(root: &mut Option<List<T>>, value: T) -> NodeId {
    root.get_or_insert_with(List::new).append(value)
}

/// `List::find` over a possibly absent root.
pub fn find_in<'a, T, K, F>(root: Option<&'a List<T>>, key: &K, matches: F) -> Option<&'a T>
where
    K: ?Sized,
    F: FnMut(&T, &K) -> bool,
{
    root?.find(key, matches)
}

/// `List::iterate` over a possibly absent root. An absent root is a no-op.
pub fn iterate_over<T, U, F>(root: Option<&List<T>>, uptr: &mut U, callback: F)
where
    U: ?Sized,
    F: FnMut(&T, &mut U),
{
    if let Some(list) = root {
        list.iterate(uptr, callback);
    }
}
