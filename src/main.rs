use log::{info, warn, LevelFilter};
use simplelog::{Config, SimpleLogger, TermLogger};
use splay_collections::SplayTree;
use std::env;

fn init_logging() {
    let level = match env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or(LevelFilter::Info),
        None => LevelFilter::Info,
    };
    if TermLogger::init(level, Config::default()).is_err() {
        if let Err(err) = SimpleLogger::init(level, Config::default()) {
            eprintln!("failed to initialize logger: {}", err);
        }
    }
}

fn root_key(tree: &SplayTree<u32, &str>) -> Option<u32> {
    tree.root().and_then(|handle| tree.entry(handle)).map(|(key, _)| *key)
}

fn main() {
    init_logging();

    let mut tree = SplayTree::new();
    for key in &[10, 5, 15, 3] {
        if let Err(err) = tree.insert(*key, "value") {
            warn!("insert {}: {}", key, err);
        }
    }
    info!("keys {:?}, root {:?}", tree.keys().collect::<Vec<_>>(), root_key(&tree));

    let found = tree.search(&15).is_some();
    info!("search 15: found {}, root {:?}, len {}", found, root_key(&tree), tree.len());

    for _ in 0..2 {
        match tree.remove(&10) {
            Ok((key, _)) => info!("removed {}, len {}", key, tree.len()),
            Err(err) => warn!("remove 10: {}, len {}", err, tree.len()),
        }
    }

    if let Err(err) = tree.insert(5, "x") {
        warn!("insert 5: {}, value {:?}", err, tree.peek(&5));
    }
    info!("final tree {:?}", tree);
}
