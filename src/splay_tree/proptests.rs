use super::{SplaySet, SplayTree};
use crate::error::Error;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u8, u32),
    Search(u8),
    Get(u8),
    Remove(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<u32>()).prop_map(|(key, value)| Op::Insert(key, value)),
        any::<u8>().prop_map(Op::Search),
        any::<u8>().prop_map(Op::Get),
        any::<u8>().prop_map(Op::Remove),
    ]
}

fn root_key(tree: &SplayTree<u8, u32>) -> Option<u8> {
    tree.root().and_then(|handle| tree.entry(handle)).map(|(key, _)| *key)
}

proptest! {
    #[test]
    fn ops_match_btreemap(ops in prop::collection::vec(op(), 0..512)) {
        let mut tree = SplayTree::with_chunk_size(8);
        let mut expected = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let result = tree.insert(key, value);
                    if expected.contains_key(&key) {
                        prop_assert_eq!(result, Err(Error::DuplicateKey));
                    } else {
                        expected.insert(key, value);
                        prop_assert_eq!(result.map(|handle| tree.entry(handle).is_some()), Ok(true));
                        prop_assert_eq!(root_key(&tree), Some(key));
                    }
                },
                Op::Search(key) => {
                    let found = tree.search(&key);
                    prop_assert_eq!(found.is_some(), expected.contains_key(&key));
                    if found.is_some() {
                        prop_assert_eq!(tree.root(), found);
                    }
                },
                Op::Get(key) => {
                    prop_assert_eq!(tree.get(&key), expected.get(&key));
                },
                Op::Remove(key) => {
                    match expected.remove(&key) {
                        Some(value) => prop_assert_eq!(tree.remove(&key), Ok((key, value))),
                        None => prop_assert_eq!(tree.remove(&key), Err(Error::KeyNotFound)),
                    }
                },
            }

            tree.assert_valid();
            prop_assert_eq!(tree.len(), expected.len());
        }

        prop_assert_eq!(
            tree.iter().collect::<Vec<_>>(),
            expected.iter().collect::<Vec<_>>()
        );
        prop_assert_eq!(tree.min(), expected.keys().next());
        prop_assert_eq!(tree.max(), expected.keys().next_back());
    }

    #[test]
    fn duplicate_insert_keeps_value(keys in prop::collection::btree_set(any::<u16>(), 1..64)) {
        let mut tree = SplayTree::new();
        for key in &keys {
            tree.insert(*key, u32::from(*key)).unwrap();
        }

        for key in &keys {
            prop_assert_eq!(tree.insert(*key, 0), Err(Error::DuplicateKey));
            prop_assert_eq!(tree.peek(key), Some(&u32::from(*key)));
        }
        prop_assert_eq!(tree.len(), keys.len());
        tree.assert_valid();
    }

    #[test]
    fn remove_all_empties_tree(keys in prop::collection::vec(any::<u16>(), 0..128)) {
        let mut set = SplaySet::new();
        let mut expected = Vec::new();
        for key in keys {
            if set.insert(key).is_ok() {
                expected.push(key);
            }
        }

        for key in &expected {
            prop_assert_eq!(set.remove(key), Ok(*key));
            prop_assert!(!set.contains(key));
        }
        prop_assert!(set.is_empty());
        prop_assert_eq!(set.iter().count(), 0);
    }
}
