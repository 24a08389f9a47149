//! Integration tests for the ordered tree.
//!
//! These exercise the public API only, including the bulk random workload
//! used to validate correctness and height growth.

use orderedtree::{Error, OrderedTree, TreeConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const BULK_KEYS: usize = 100_000;

fn shuffled_keys(count: usize, seed: u64) -> Vec<usize> {
    let mut keys: Vec<usize> = (0..count).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Worked example
// ============================================================================

/// Order 1 holds two keys per node; the third insert splits the root.
#[test]
fn test_order_one_three_keys() {
    init_tracing();
    let mut tree = OrderedTree::new(1);

    tree.insert("b", "B").unwrap();
    tree.insert("a", "A").unwrap();
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.levels(), vec![vec![vec!["a", "b"]]]);

    tree.insert("c", "C").unwrap();
    assert_eq!(tree.height(), 1);
    assert_eq!(
        tree.levels(),
        vec![vec![vec!["b"]], vec![vec!["a"], vec!["c"]]]
    );

    assert_eq!(tree.find("a"), Ok(&"A"));
    assert_eq!(tree.find("z"), Err(Error::NotFound("z".to_string())));
    assert_eq!(tree.verify(), Ok(()));
}

// ============================================================================
// Uniqueness
// ============================================================================

#[test]
fn test_duplicate_rejected_at_every_size() {
    let mut tree = OrderedTree::new(2);

    for i in 0..300 {
        let key = format!("key{:05}", i);
        tree.insert(key.as_str(), i).unwrap();

        let size = tree.size();
        let height = tree.height();
        let dump = tree.to_string();

        assert_eq!(
            tree.insert(key.as_str(), i + 1),
            Err(Error::DuplicateKey(key.clone()))
        );
        assert_eq!(tree.size(), size);
        assert_eq!(tree.height(), height);
        assert_eq!(tree.to_string(), dump);
        assert_eq!(tree.find(&key), Ok(&i));
    }

    assert_eq!(tree.stats().duplicate_rejections, 300);
}

#[test]
fn test_duplicate_of_every_stored_key() {
    let mut tree = OrderedTree::new(1);
    let keys = shuffled_keys(500, 7);
    for &k in &keys {
        tree.insert(k.to_string(), k).unwrap();
    }

    // Hits keys stored in internal nodes as well as leaves
    for &k in &keys {
        assert!(matches!(
            tree.insert(k.to_string(), 0),
            Err(Error::DuplicateKey(_))
        ));
    }
    assert_eq!(tree.size(), 500);
    assert_eq!(tree.verify(), Ok(()));
}

// ============================================================================
// Shape
// ============================================================================

#[test]
fn test_height_never_decreases_and_steps_by_one() {
    let mut tree = OrderedTree::new(1);
    let mut last_height = 0;

    for &k in &shuffled_keys(2_000, 11) {
        tree.insert(format!("{:06}", k), k).unwrap();
        let height = tree.height();
        assert!(height == last_height || height == last_height + 1);
        last_height = height;
    }

    assert_eq!(tree.stats().root_splits as usize, tree.height());
}

#[test]
fn test_sequential_and_reverse_inserts() {
    for order in 1..=4 {
        let mut ascending = OrderedTree::new(order);
        let mut descending = OrderedTree::new(order);
        for i in 0..1_000 {
            ascending.insert(format!("{:04}", i), i).unwrap();
            descending.insert(format!("{:04}", 999 - i), 999 - i).unwrap();
        }

        for tree in [&ascending, &descending] {
            assert_eq!(tree.verify(), Ok(()));
            assert_eq!(tree.size(), 1_000);
            for i in 0..1_000 {
                assert_eq!(tree.find(&format!("{:04}", i)), Ok(&i));
            }
        }
    }
}

#[test]
fn test_with_config() {
    let config = TreeConfig::new(3).unwrap();
    let mut tree = OrderedTree::with_config(config);
    for i in 0..7 {
        tree.insert(i.to_string(), i).unwrap();
    }

    // 7 keys overflow a 6-key root
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.config().max_keys(), 6);
    assert_eq!(tree.node_count(), 3);
}

// ============================================================================
// Bulk workload
// ============================================================================

/// Insert 100,000 shuffled keys, then find every one of them.
#[test]
fn test_bulk_random_insert_and_find() {
    init_tracing();
    let order = 4;
    let mut tree = OrderedTree::new(order);
    let keys = shuffled_keys(BULK_KEYS, 0xB7EE);

    for &k in &keys {
        tree.insert(k.to_string(), k).unwrap();
    }

    for &k in &keys {
        assert_eq!(tree.find(&k.to_string()), Ok(&k));
    }
    assert_eq!(tree.size(), BULK_KEYS);
    assert!(tree.find("not-a-number").is_err());

    // Non-root nodes hold between O and 2·O keys, which bounds the height
    // between log_(2O+1) N and log_(O+1) N.
    let n = BULK_KEYS as f64;
    let height = tree.height() as f64;
    let lowest = (n + 1.0).log((2 * order + 1) as f64) - 1.0;
    let highest = ((n + 1.0) / 2.0).log((order + 1) as f64);
    assert!(
        height >= lowest.floor() && height <= highest.ceil(),
        "height {} outside [{:.2}, {:.2}]",
        height,
        lowest,
        highest
    );

    assert_eq!(tree.verify(), Ok(()));
}
