//! Self-adjusting binary search tree with the additional property that recently accessed elements
//! are quick to access again.

mod map;
mod node;
mod set;
mod tree;

#[cfg(test)]
mod proptests;

pub use self::map::{
    Keys, SplayTree, SplayTreeIntoIter, SplayTreeIter, Values, DEFAULT_CHUNK_SIZE,
};
pub use self::node::{Node, Side};
pub use self::set::{SplaySet, SplaySetIntoIter, SplaySetIter};
