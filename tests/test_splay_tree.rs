use rand::Rng;
use splay_collections::arena::Handle;
use splay_collections::{Error, SplayTree};
use std::collections::BTreeMap;

const NUM_OF_OPERATIONS: usize = 100_000;

// Walks the tree through its public node accessors and checks ordering, parent links, and size.
fn check_structure<U>(tree: &SplayTree<u32, U>) {
    let mut stack: Vec<(Handle, Option<u32>, Option<u32>)> = Vec::new();
    let mut count = 0;
    if let Some(root) = tree.root() {
        assert_eq!(tree.node(root).and_then(|node| node.parent()), None);
        stack.push((root, None, None));
    }
    while let Some((handle, lower, upper)) = stack.pop() {
        let node = tree.node(handle).expect("reachable handle must be live");
        let key = *node.key();
        assert!(lower.map_or(true, |lower| lower < key));
        assert!(upper.map_or(true, |upper| key < upper));
        if let Some(left) = node.left() {
            assert_eq!(tree.node(left).and_then(|node| node.parent()), Some(handle));
            stack.push((left, lower, Some(key)));
        }
        if let Some(right) = node.right() {
            assert_eq!(tree.node(right).and_then(|node| node.parent()), Some(handle));
            stack.push((right, Some(key), upper));
        }
        count += 1;
    }
    assert_eq!(count, tree.len());
}

fn root_key<U>(tree: &SplayTree<u32, U>) -> Option<u32> {
    tree.root().and_then(|handle| tree.entry(handle)).map(|(key, _)| *key)
}

#[test]
fn int_test_scenarios() {
    let mut tree = SplayTree::new();
    for key in &[10, 5, 15, 3] {
        tree.insert(*key, format!("v{}", key)).unwrap();
    }
    assert_eq!(tree.keys().cloned().collect::<Vec<u32>>(), vec![3, 5, 10, 15]);
    assert_eq!(root_key(&tree), Some(3));

    let handle = tree.search(&15).unwrap();
    assert_eq!(tree.entry(handle).map(|(key, _)| *key), Some(15));
    assert_eq!(root_key(&tree), Some(15));
    assert_eq!(tree.len(), 4);

    assert_eq!(tree.remove(&10), Ok((10, String::from("v10"))));
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.keys().cloned().collect::<Vec<u32>>(), vec![3, 5, 15]);
    assert_eq!(tree.remove(&10), Err(Error::KeyNotFound));
    assert_eq!(tree.len(), 3);

    assert_eq!(tree.insert(5, String::from("x")), Err(Error::DuplicateKey));
    assert_eq!(tree.peek(&5), Some(&String::from("v5")));
    assert_eq!(tree.len(), 3);
    check_structure(&tree);

    let mut empty: SplayTree<u32, u32> = SplayTree::new();
    assert!(empty.is_empty());
    assert_eq!(empty.len(), 0);
    assert_eq!(empty.search(&1), None);
    assert_eq!(empty.remove(&1), Err(Error::KeyNotFound));
    assert_eq!(empty.keys().count(), 0);
}

#[test]
fn int_test_splay_tree() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut tree = SplayTree::new();
    let mut expected = BTreeMap::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 10_000u32);
        let val = rng.gen::<u32>();

        match (tree.insert(key, val), expected.contains_key(&key)) {
            (Ok(_), false) => {
                expected.insert(key, val);
                assert_eq!(root_key(&tree), Some(key));
            },
            (Err(Error::DuplicateKey), true) => {},
            (result, present) => panic!("insert {} returned {:?} with present = {}", key, result, present),
        }
    }

    assert_eq!(tree.len(), expected.len());
    assert_eq!(tree.min(), expected.keys().next());
    assert_eq!(tree.max(), expected.keys().next_back());
    assert_eq!(
        tree.iter().collect::<Vec<(&u32, &u32)>>(),
        expected.iter().collect::<Vec<(&u32, &u32)>>(),
    );
    check_structure(&tree);

    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 10_000u32);
        assert_eq!(tree.get(&key), expected.get(&key));
        if expected.contains_key(&key) {
            assert_eq!(root_key(&tree), Some(key));
        }
    }
    check_structure(&tree);

    let mut keys: Vec<u32> = (0..10_000).collect();
    rng.shuffle(&mut keys);
    for key in keys {
        match expected.remove(&key) {
            Some(val) => assert_eq!(tree.remove(&key), Ok((key, val))),
            None => assert_eq!(tree.remove(&key), Err(Error::KeyNotFound)),
        }
        assert_eq!(tree.len(), expected.len());
    }
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
}

#[test]
fn int_test_sequential_access() {
    let mut tree = SplayTree::with_chunk_size(128);
    for key in 0..1_000u32 {
        tree.insert(key, key).unwrap();
    }
    check_structure(&tree);

    for key in 0..1_000u32 {
        let handle = tree.search(&key).unwrap();
        assert_eq!(tree.root(), Some(handle));
        assert_eq!(tree.min_node(), tree.min_node_from(handle));
    }
    check_structure(&tree);

    for key in (0..1_000u32).rev() {
        assert_eq!(tree.remove(&key), Ok((key, key)));
    }
    assert!(tree.is_empty());
}
