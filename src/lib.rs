//! Ordered collections backed by an arena-allocated splay tree.
//!
//! # Examples
//!
//! ```
//! use splay_collections::{Error, SplayTree};
//!
//! let mut tree = SplayTree::new();
//! for key in &[10, 5, 15, 3] {
//!     tree.insert(*key, key.to_string()).unwrap();
//! }
//! assert_eq!(tree.keys().cloned().collect::<Vec<u32>>(), vec![3, 5, 10, 15]);
//!
//! tree.search(&15).unwrap();
//! assert_eq!(tree.remove(&10), Ok((10, String::from("10"))));
//! assert_eq!(tree.remove(&10), Err(Error::KeyNotFound));
//! ```

mod entry;
mod error;
pub mod arena;
pub mod splay_tree;

pub use crate::error::{Error, Result};
pub use crate::splay_tree::{SplaySet, SplayTree};
