use arena_collections::red_black_tree::RedBlackTree;
use rand::Rng;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 10_000;

#[test]
fn int_test_insert_search_remove() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut tree = RedBlackTree::new();
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let value = rng.next_u32();
        match tree.insert(value) {
            Ok(_) => assert!(expected.insert(value)),
            Err(_) => assert!(expected.contains(&value)),
        }
    }

    assert_eq!(tree.len(), expected.len());
    assert_eq!(
        tree.iter().collect::<Vec<&u32>>(),
        expected.iter().collect::<Vec<&u32>>(),
    );

    assert_eq!(tree.get(tree.min().unwrap()), expected.iter().next());
    assert_eq!(tree.get(tree.max().unwrap()), expected.iter().next_back());

    for value in expected.iter().cloned().collect::<Vec<u32>>() {
        assert!(tree.contains(&value));
        let handle = tree.search(&value).unwrap();
        assert_eq!(tree.remove(handle), Ok(value));
        expected.remove(&value);
        assert_eq!(tree.len(), expected.len());
        assert!(!tree.contains(&value));
    }

    assert!(tree.is_empty());
}

#[test]
fn int_test_interleaved_operations() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([2, 2, 2, 2]);
    let mut tree = RedBlackTree::new();
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let value = rng.gen_range(0, 1000);

        if rng.gen::<bool>() {
            match tree.insert(value) {
                Ok(handle) => {
                    assert!(expected.insert(value));
                    assert_eq!(tree.get(handle), Some(&value));
                }
                Err(_) => assert!(expected.contains(&value)),
            }
        } else {
            match tree.search(&value) {
                Some(handle) => {
                    assert_eq!(tree.remove(handle), Ok(value));
                    assert!(expected.remove(&value));
                }
                None => assert!(!expected.contains(&value)),
            }
        }

        assert_eq!(tree.len(), expected.len());
    }

    let mut traversed = Vec::new();
    tree.traverse(|value| traversed.push(*value));
    assert_eq!(traversed, expected.iter().cloned().collect::<Vec<u32>>());

    assert_eq!(
        tree.into_iter().collect::<Vec<u32>>(),
        expected.into_iter().collect::<Vec<u32>>(),
    );
}
