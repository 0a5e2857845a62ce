use crate::arena::Handle;
use crate::entry::Entry;

/// The side of a parent on which a child hangs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A struct representing a node of a splay tree.
///
/// Links between nodes are arena handles. The `parent` link is only used to walk upwards while
/// splaying and never owns anything.
#[derive(Debug)]
pub struct Node<T, U> {
    pub(crate) entry: Entry<T, U>,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<T, U> Node<T, U> {
    pub(crate) fn new(key: T, value: U) -> Self {
        Node {
            entry: Entry { key, value },
            parent: None,
            left: None,
            right: None,
        }
    }

    /// Returns the key stored in this node.
    pub fn key(&self) -> &T {
        &self.entry.key
    }

    /// Returns the value stored in this node.
    pub fn value(&self) -> &U {
        &self.entry.value
    }

    /// Returns the parent of this node, or `None` if this node is the root.
    pub fn parent(&self) -> Option<Handle> {
        self.parent
    }

    /// Returns the left child of this node.
    pub fn left(&self) -> Option<Handle> {
        self.left
    }

    /// Returns the right child of this node.
    pub fn right(&self) -> Option<Handle> {
        self.right
    }

    pub fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<Handle> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
