use crate::arena::{Handle, TypedArena};
use crate::entry::Entry;
use crate::splay_tree::node::{Node, Side};
use log::trace;
use std::borrow::Borrow;
use std::cmp::Ordering;

/// The structural half of a splay tree: the node arena and the root handle.
///
/// Every function that restructures the tree lives here. Callers are responsible for any
/// bookkeeping beyond the shape of the tree, such as the element count.
pub struct Tree<T, U> {
    pub arena: TypedArena<Node<T, U>>,
    pub root: Option<Handle>,
}

impl<T, U> Tree<T, U> {
    pub fn new(chunk_size: usize) -> Self {
        Tree {
            arena: TypedArena::new(chunk_size),
            root: None,
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    // Side of `child` under its parent, or `None` if `child` is a root.
    fn side_of(&self, child: Handle) -> Option<Side> {
        let parent = self.arena[child].parent?;
        if self.arena[parent].left == Some(child) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    fn link(&mut self, parent: Handle, child: Option<Handle>, side: Side) {
        *self.arena[parent].child_mut(side) = child;
        if let Some(child) = child {
            self.arena[child].parent = Some(parent);
        }
    }

    // Rotates `x` over its parent. `x` takes the parent's slot and the parent becomes the child
    // of `x` on the opposite side. The subtree of `x` that sits between them moves to the parent.
    fn rotate(&mut self, x: Handle) {
        let side = match self.side_of(x) {
            Some(side) => side,
            None => return,
        };
        let p = self.arena[x].parent.expect("Expected parent of non-root node to be `Some`.");
        let grandparent = self.arena[p].parent;
        let p_side = self.side_of(p);

        let inner = self.arena[x].child(side.opposite());
        self.link(p, inner, side);
        self.link(x, Some(p), side.opposite());

        match (grandparent, p_side) {
            (Some(grandparent), Some(p_side)) => self.link(grandparent, Some(x), p_side),
            _ => {
                self.arena[x].parent = None;
                self.root = Some(x);
            },
        }
    }

    /// Moves `x` to the root through a sequence of zig, zig-zig, and zig-zag steps.
    pub fn splay(&mut self, x: Handle) {
        let mut steps = 0;
        while let Some(side) = self.side_of(x) {
            let p = self.arena[x].parent.expect("Expected parent of non-root node to be `Some`.");
            match self.side_of(p) {
                // zig
                None => self.rotate(x),
                // zig-zig
                Some(p_side) if p_side == side => {
                    self.rotate(p);
                    self.rotate(x);
                },
                // zig-zag
                Some(_) => {
                    self.rotate(x);
                    self.rotate(x);
                },
            }
            steps += 1;
        }
        self.root = Some(x);
        trace!("splayed node to root in {} steps", steps);
    }

    // Walks from the root towards `key` and returns the last node visited together with how `key`
    // compares to it. `Ordering::Equal` means the key was found.
    fn descend<V>(&self, key: &V) -> Option<(Handle, Ordering)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root?;
        loop {
            let node = &self.arena[curr];
            let ordering = key.cmp(node.entry.key.borrow());
            let next = match ordering {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => None,
            };
            match next {
                Some(next) => curr = next,
                None => return Some((curr, ordering)),
            }
        }
    }

    /// Inserts a new node and splays it to the root. Returns `None` without touching the tree if
    /// the key already exists.
    pub fn insert(&mut self, key: T, value: U) -> Option<Handle>
    where
        T: Ord,
    {
        let (parent, side) = match self.descend(&key) {
            None => {
                let handle = self.arena.allocate(Node::new(key, value));
                self.root = Some(handle);
                return Some(handle);
            },
            Some((_, Ordering::Equal)) => return None,
            Some((parent, Ordering::Less)) => (parent, Side::Left),
            Some((parent, Ordering::Greater)) => (parent, Side::Right),
        };

        let handle = self.arena.allocate(Node::new(key, value));
        self.link(parent, Some(handle), side);
        self.splay(handle);
        Some(handle)
    }

    /// Looks up a key and splays the matching node, or the last node visited if there is no
    /// match, to the root.
    pub fn search<V>(&mut self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let (last, ordering) = self.descend(key)?;
        self.splay(last);
        if ordering == Ordering::Equal {
            Some(last)
        } else {
            None
        }
    }

    /// Looks up a key without restructuring the tree.
    pub fn find<V>(&self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.descend(key).and_then(|(last, ordering)| {
            if ordering == Ordering::Equal {
                Some(last)
            } else {
                None
            }
        })
    }

    /// Removes the node with a particular key. The search for the key splays the tree even if
    /// the key is absent.
    pub fn remove<V>(&mut self, key: &V) -> Option<Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let target = self.search(key)?;
        let Node { entry, left, right, .. } = self.arena.free(&target);
        self.root = None;

        match (left, right) {
            (None, None) => {},
            (Some(child), None) | (None, Some(child)) => {
                self.arena[child].parent = None;
                self.root = Some(child);
            },
            (Some(left), Some(right)) => {
                self.arena[left].parent = None;
                let predecessor = self.extreme_from(left, Side::Right);
                self.splay(predecessor);
                self.link(predecessor, Some(right), Side::Right);
            },
        }
        Some(entry)
    }

    /// Follows children on one side starting at `start` and returns the last node reached.
    pub fn extreme_from(&self, start: Handle, side: Side) -> Handle {
        let mut curr = start;
        while let Some(next) = self.arena[curr].child(side) {
            curr = next;
        }
        curr
    }

    /// Checks every structural invariant and returns the number of reachable nodes.
    #[cfg(test)]
    pub fn assert_valid(&self) -> usize
    where
        T: Ord,
    {
        let mut count = 0;
        let mut prev: Option<Handle> = None;
        let mut stack = Vec::new();
        let mut current = self.root;

        if let Some(root) = self.root {
            assert_eq!(self.arena[root].parent, None, "root must not have a parent");
        }

        while current.is_some() || !stack.is_empty() {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.arena[handle].left;
            }
            let handle = stack.pop().expect("Expected non-empty stack.");
            let node = &self.arena[handle];
            for child in node.left.iter().chain(node.right.iter()) {
                assert_eq!(self.arena[*child].parent, Some(handle), "inconsistent parent link");
            }
            if let Some(prev) = prev {
                assert!(self.arena[prev].entry.key < node.entry.key, "keys out of order");
            }
            prev = Some(handle);
            count += 1;
            current = node.right;
        }

        assert_eq!(count, self.arena.len(), "unreachable nodes in arena");
        count
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::arena::Handle;
    use crate::splay_tree::node::{Node, Side};

    fn key(tree: &Tree<u32, ()>, handle: Option<Handle>) -> Option<u32> {
        handle.map(|handle| tree.arena[handle].entry.key)
    }

    fn allocate(tree: &mut Tree<u32, ()>, key: u32) -> Handle {
        tree.arena.allocate(Node::new(key, ()))
    }

    #[test]
    fn test_insert_ascending_builds_left_path() {
        let mut tree = Tree::new(16);
        for i in 1..=3 {
            tree.insert(i, ());
        }
        tree.assert_valid();

        let root = tree.root.unwrap();
        assert_eq!(key(&tree, Some(root)), Some(3));
        let left = tree.arena[root].left;
        assert_eq!(key(&tree, left), Some(2));
        assert_eq!(key(&tree, tree.arena[left.unwrap()].left), Some(1));
    }

    #[test]
    fn test_zig() {
        let mut tree = Tree::new(16);
        let a = allocate(&mut tree, 1);
        let b = allocate(&mut tree, 2);
        let c = allocate(&mut tree, 3);
        tree.root = Some(b);
        tree.link(b, Some(a), Side::Left);
        tree.link(b, Some(c), Side::Right);

        tree.splay(a);
        tree.assert_valid();

        assert_eq!(tree.root, Some(a));
        assert_eq!(tree.arena[a].right, Some(b));
        assert_eq!(tree.arena[b].left, None);
        assert_eq!(tree.arena[b].right, Some(c));
    }

    #[test]
    fn test_zig_zig() {
        let mut tree = Tree::new(16);
        for i in 1..=3 {
            tree.insert(i, ());
        }
        let leaf = tree.find(&1).unwrap();
        tree.splay(leaf);
        tree.assert_valid();

        assert_eq!(tree.root, Some(leaf));
        assert_eq!(tree.arena[leaf].left, None);
        let right = tree.arena[leaf].right;
        assert_eq!(key(&tree, right), Some(2));
        assert_eq!(key(&tree, tree.arena[right.unwrap()].right), Some(3));
    }

    #[test]
    fn test_zig_zag() {
        let mut tree = Tree::new(16);
        let gp = allocate(&mut tree, 10);
        let p = allocate(&mut tree, 5);
        let x = allocate(&mut tree, 7);
        let inner_left = allocate(&mut tree, 6);
        let inner_right = allocate(&mut tree, 8);
        tree.root = Some(gp);
        tree.link(gp, Some(p), Side::Left);
        tree.link(p, Some(x), Side::Right);
        tree.link(x, Some(inner_left), Side::Left);
        tree.link(x, Some(inner_right), Side::Right);

        tree.splay(x);
        tree.assert_valid();

        assert_eq!(tree.root, Some(x));
        assert_eq!(tree.arena[x].left, Some(p));
        assert_eq!(tree.arena[x].right, Some(gp));
        assert_eq!(tree.arena[p].right, Some(inner_left));
        assert_eq!(tree.arena[gp].left, Some(inner_right));
    }

    #[test]
    fn test_splay_root_is_noop() {
        let mut tree = Tree::new(16);
        for i in &[2, 1, 3] {
            tree.insert(*i, ());
        }
        let root = tree.root.unwrap();
        let left = tree.arena[root].left;
        let right = tree.arena[root].right;

        tree.splay(root);

        assert_eq!(tree.root, Some(root));
        assert_eq!(tree.arena[root].left, left);
        assert_eq!(tree.arena[root].right, right);
    }

    #[test]
    fn test_insert_duplicate_leaves_tree_untouched() {
        let mut tree = Tree::new(16);
        for i in &[10, 5, 15] {
            tree.insert(*i, ());
        }
        let root = tree.root;

        assert_eq!(tree.insert(10, ()), None);
        assert_eq!(tree.insert(5, ()), None);
        assert_eq!(tree.root, root);
        assert_eq!(tree.assert_valid(), 3);
    }

    #[test]
    fn test_search_miss_splays_last_visited() {
        let mut tree = Tree::new(16);
        for i in &[10, 5, 15] {
            tree.insert(*i, ());
        }

        // 15 is the root with 10 below it on the left, so the walk for 12 ends at 10.
        assert_eq!(tree.search(&12), None);
        assert_eq!(key(&tree, tree.root), Some(10));
        tree.assert_valid();
    }

    #[test]
    fn test_remove_with_both_children() {
        let mut tree = Tree::new(16);
        for i in &[1, 3, 2, 5, 4] {
            tree.insert(*i, ());
        }
        tree.search(&3);

        let entry = tree.remove(&3).unwrap();
        assert_eq!(entry.key, 3);
        assert_eq!(key(&tree, tree.root), Some(2));
        assert_eq!(key(&tree, tree.arena[tree.root.unwrap()].right), Some(4));
        assert_eq!(tree.assert_valid(), 4);
    }

    #[test]
    fn test_extreme_from() {
        let mut tree = Tree::new(16);
        for i in &[4, 2, 6, 1, 3, 5, 7] {
            tree.insert(*i, ());
        }
        let root = tree.root.unwrap();
        assert_eq!(key(&tree, Some(tree.extreme_from(root, Side::Left))), Some(1));
        assert_eq!(key(&tree, Some(tree.extreme_from(root, Side::Right))), Some(7));
    }
}
