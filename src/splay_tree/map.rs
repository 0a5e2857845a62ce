use crate::arena::Handle;
use crate::error::{Error, Result};
use crate::splay_tree::node::{Node, Side};
use crate::splay_tree::tree::Tree;
use log::debug;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Index;

/// The number of nodes allocated at a time by `SplayTree::new`.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An ordered map implemented using a splay tree.
///
/// A splay tree is a self-adjusting binary search tree with the additional property that recently
/// accessed items are quick to access again. Every operation that walks the tree finishes by
/// "splaying" the node it reached to the root. Operations run in amortized logarithmic time, but a
/// single operation may take linear time.
///
/// Nodes live in an arena and are addressed by `Handle`s. A handle returned by `insert` or
/// `search` stays valid until its key is removed or the tree is cleared.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplayTree;
/// use splay_collections::Error;
///
/// let mut tree = SplayTree::new();
/// tree.insert(0, 1).unwrap();
/// tree.insert(3, 4).unwrap();
/// assert_eq!(tree.insert(3, 5), Err(Error::DuplicateKey));
///
/// assert_eq!(tree[&0], 1);
/// assert_eq!(tree.get(&1), None);
/// assert_eq!(tree.len(), 2);
///
/// assert_eq!(tree.min(), Some(&0));
/// assert_eq!(tree.keys().collect::<Vec<&u32>>(), vec![&0, &3]);
///
/// assert_eq!(tree.remove(&0), Ok((0, 1)));
/// assert_eq!(tree.remove(&0), Err(Error::KeyNotFound));
/// ```
pub struct SplayTree<T, U> {
    tree: Tree<T, U>,
    len: usize,
}

impl<T, U> SplayTree<T, U> {
    /// Constructs a new, empty `SplayTree<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let tree: SplayTree<u32, u32> = SplayTree::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `SplayTree<T, U>` whose arena allocates `chunk_size` nodes at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let tree: SplayTree<u32, u32> = SplayTree::with_chunk_size(16);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        SplayTree {
            tree: Tree::new(chunk_size),
            len: 0,
        }
    }

    /// Inserts a key-value pair into the tree and splays the new node to the root. Returns the
    /// handle of the new root. If the key already exists, the tree is left untouched and
    /// `Error::DuplicateKey` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    /// use splay_collections::Error;
    ///
    /// let mut tree = SplayTree::new();
    /// let handle = tree.insert(1, 1).unwrap();
    /// assert_eq!(tree.root(), Some(handle));
    /// assert_eq!(tree.insert(1, 2), Err(Error::DuplicateKey));
    /// assert_eq!(tree.get(&1), Some(&1));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Result<Handle>
    where
        T: Ord,
    {
        match self.tree.insert(key, value) {
            Some(handle) => {
                self.len += 1;
                Ok(handle)
            },
            None => {
                debug!("rejected insert of duplicate key");
                Err(Error::DuplicateKey)
            },
        }
    }

    /// Searches for a key. If the key exists, its node is splayed to the root and its handle is
    /// returned. Otherwise the last node visited is splayed to the root and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// tree.insert(2, 2).unwrap();
    ///
    /// let handle = tree.search(&1).unwrap();
    /// assert_eq!(tree.root(), Some(handle));
    /// assert_eq!(tree.search(&3), None);
    /// assert_eq!(tree.node(tree.root().unwrap()).map(|node| *node.key()), Some(2));
    /// ```
    pub fn search<V>(&mut self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.search(key)
    }

    /// Removes a key-value pair from the tree and returns it. If the key does not exist,
    /// `Error::KeyNotFound` is returned. In both cases the search for the key splays the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    /// use splay_collections::Error;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// assert_eq!(tree.remove(&1), Ok((1, 1)));
    /// assert_eq!(tree.remove(&1), Err(Error::KeyNotFound));
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Result<(T, U)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self.tree.remove(key) {
            Some(entry) => {
                self.len -= 1;
                Ok(entry.into_pair())
            },
            None => {
                debug!("remove of absent key; tree may have been reshaped by the search");
                Err(Error::KeyNotFound)
            },
        }
    }

    /// Checks if a key exists in the tree. Note that `contains_key` does not splay the tree in
    /// order to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// assert!(!tree.contains_key(&0));
    /// assert!(tree.contains_key(&1));
    /// ```
    pub fn contains_key<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key, splaying
    /// the tree like `search`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// assert_eq!(tree.get(&0), None);
    /// assert_eq!(tree.get(&1), Some(&1));
    /// ```
    pub fn get<V>(&mut self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let handle = self.tree.search(key)?;
        self.tree.arena.get(&handle).map(Node::value)
    }

    /// Returns a mutable reference to the value associated with a particular key, splaying the
    /// tree like `search`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// *tree.get_mut(&1).unwrap() = 2;
    /// assert_eq!(tree.get(&1), Some(&2));
    /// ```
    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let handle = self.tree.search(key)?;
        self.tree.arena.get_mut(&handle).map(|node| &mut node.entry.value)
    }

    /// Returns an immutable reference to the value associated with a particular key without
    /// splaying the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// tree.insert(2, 2).unwrap();
    /// let root = tree.root();
    ///
    /// assert_eq!(tree.peek(&1), Some(&1));
    /// assert_eq!(tree.root(), root);
    /// ```
    pub fn peek<V>(&self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree
            .find(key)
            .and_then(|handle| self.tree.arena.get(&handle))
            .map(Node::value)
    }

    /// Returns the node a handle refers to. Returns `None` if the handle is stale.
    pub fn node(&self, handle: Handle) -> Option<&Node<T, U>> {
        self.tree.arena.get(&handle)
    }

    /// Returns the key-value pair a handle refers to. Returns `None` if the handle is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// let handle = tree.insert(1, "one").unwrap();
    /// assert_eq!(tree.entry(handle), Some((&1, &"one")));
    ///
    /// tree.remove(&1).unwrap();
    /// assert_eq!(tree.entry(handle), None);
    /// ```
    pub fn entry(&self, handle: Handle) -> Option<(&T, &U)> {
        self.node(handle).map(|node| (node.key(), node.value()))
    }

    /// Returns the handle of the root, or `None` if the tree is empty.
    pub fn root(&self) -> Option<Handle> {
        self.tree.root
    }

    /// Returns the number of elements in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let tree: SplayTree<u32, u32> = SplayTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.root.is_none()
    }

    /// Clears the tree, removing all key-value pairs. Every outstanding handle becomes stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// tree.insert(2, 2).unwrap();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Returns the node with the minimum key. Returns `None` if the tree is empty. Does not splay.
    pub fn min_node(&self) -> Option<Handle> {
        self.tree.root.and_then(|root| self.min_node_from(root))
    }

    /// Returns the node with the maximum key. Returns `None` if the tree is empty. Does not splay.
    pub fn max_node(&self) -> Option<Handle> {
        self.tree.root.and_then(|root| self.max_node_from(root))
    }

    /// Returns the node with the minimum key in the subtree rooted at `start`. Returns `None` if
    /// the handle is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// for key in &[2, 1, 3] {
    ///     tree.insert(*key, ()).unwrap();
    /// }
    /// let root = tree.search(&2).unwrap();
    /// let right = tree.node(root).and_then(|node| node.right()).unwrap();
    ///
    /// assert_eq!(tree.min_node_from(right), Some(right));
    /// assert_eq!(tree.min_node().and_then(|handle| tree.entry(handle)), Some((&1, &())));
    /// ```
    pub fn min_node_from(&self, start: Handle) -> Option<Handle> {
        if !self.tree.arena.contains(&start) {
            return None;
        }
        Some(self.tree.extreme_from(start, Side::Left))
    }

    /// Returns the node with the maximum key in the subtree rooted at `start`. Returns `None` if
    /// the handle is stale.
    pub fn max_node_from(&self, start: Handle) -> Option<Handle> {
        if !self.tree.arena.contains(&start) {
            return None;
        }
        Some(self.tree.extreme_from(start, Side::Right))
    }

    /// Returns the minimum key of the tree. Returns `None` if the tree is empty. Note that `min`
    /// does not splay the tree in order to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// tree.insert(3, 3).unwrap();
    /// assert_eq!(tree.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.min_node().and_then(|handle| self.node(handle)).map(Node::key)
    }

    /// Returns the maximum key of the tree. Returns `None` if the tree is empty. Note that `max`
    /// does not splay the tree in order to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// tree.insert(3, 3).unwrap();
    /// assert_eq!(tree.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.max_node().and_then(|handle| self.node(handle)).map(Node::key)
    }

    /// Returns an iterator over the keys of the tree in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(2, 2).unwrap();
    /// tree.insert(1, 1).unwrap();
    /// assert_eq!(tree.keys().collect::<Vec<&u32>>(), vec![&1, &2]);
    /// ```
    pub fn keys(&self) -> Keys<T, U> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the tree in ascending order of their keys.
    pub fn values(&self) -> Values<T, U> {
        Values { inner: self.iter() }
    }

    #[cfg(test)]
    pub(crate) fn assert_valid(&self)
    where
        T: Ord,
    {
        assert_eq!(self.tree.assert_valid(), self.len, "length out of sync");
        assert_eq!(self.is_empty(), self.len == 0);
    }

    /// Returns an iterator over the tree. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1, 1).unwrap();
    /// tree.insert(2, 2).unwrap();
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SplayTreeIter<T, U> {
        SplayTreeIter {
            tree: &self.tree,
            current: self.tree.root,
            stack: Vec::new(),
            remaining: self.len,
        }
    }
}

impl<T, U> IntoIterator for SplayTree<T, U> {
    type IntoIter = SplayTreeIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        let current = self.tree.root;
        Self::IntoIter {
            tree: self.tree,
            current,
            stack: Vec::new(),
            remaining: self.len,
        }
    }
}

impl<'a, T, U> IntoIterator for &'a SplayTree<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = SplayTreeIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `SplayTree<T, U>`.
///
/// This iterator traverses the elements of the tree in-order and yields owned entries.
pub struct SplayTreeIntoIter<T, U> {
    tree: Tree<T, U>,
    current: Option<Handle>,
    stack: Vec<Handle>,
    remaining: usize,
}

impl<T, U> Iterator for SplayTreeIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.current {
            self.stack.push(handle);
            self.current = self.tree.arena[handle].left;
        }
        self.stack.pop().map(|handle| {
            let node = self.tree.arena.free(&handle);
            self.current = node.right;
            self.remaining -= 1;
            node.entry.into_pair()
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, U> ExactSizeIterator for SplayTreeIntoIter<T, U> {}

/// An iterator for `SplayTree<T, U>`.
///
/// This iterator traverses the elements of the tree in-order with an explicit stack and yields
/// immutable references.
pub struct SplayTreeIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    tree: &'a Tree<T, U>,
    current: Option<Handle>,
    stack: Vec<Handle>,
    remaining: usize,
}

impl<'a, T, U> Iterator for SplayTreeIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some(handle) = self.current {
            self.stack.push(handle);
            self.current = tree.arena[handle].left;
        }
        self.stack.pop().map(|handle| {
            let node = &tree.arena[handle];
            self.current = node.right;
            self.remaining -= 1;
            (node.key(), node.value())
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, U> ExactSizeIterator for SplayTreeIter<'a, T, U> {}

/// An iterator over the keys of a `SplayTree<T, U>` in ascending order.
pub struct Keys<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    inner: SplayTreeIter<'a, T, U>,
}

impl<'a, T, U> Iterator for Keys<'a, T, U> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a `SplayTree<T, U>` in ascending order of their keys.
pub struct Values<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    inner: SplayTreeIter<'a, T, U>,
}

impl<'a, T, U> Iterator for Values<'a, T, U> {
    type Item = &'a U;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, U> Default for SplayTree<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> fmt::Debug for SplayTree<T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, T, U, V> Index<&'a V> for SplayTree<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    type Output = U;

    fn index(&self, key: &V) -> &Self::Output {
        self.peek(key).expect("Error: key does not exist.")
    }
}
