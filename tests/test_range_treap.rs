use rand::{Rng, SeedableRng, XorShiftRng};
use range_treap::treap::{Aggregator, Node, RangeTreap};

struct Sum;

impl Aggregator<i64> for Sum {
    fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
        *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
    }

    fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
        (data, None, None)
    }
}

// Checks the heap and aggregate-closure invariants and collects keys in order.
fn check_node(node: &Node<i64>, parent_priority: u32, keys: &mut Vec<i64>) -> i64 {
    assert!(node.priority >= parent_priority);
    let left_sum = node
        .left
        .as_ref()
        .map_or(0, |left_node| check_node(left_node, node.priority, keys));
    keys.push(node.key);
    let right_sum = node
        .right
        .as_ref()
        .map_or(0, |right_node| check_node(right_node, node.priority, keys));
    let sum = node.value + left_sum + right_sum;
    assert_eq!(node.data, sum);
    sum
}

fn check_invariants(treap: &mut RangeTreap<i64, Sum>) {
    treap.with_split(i64::min_value(), i64::max_value(), |root| {
        let node = root.expect("expected a non-empty treap");
        let mut keys = Vec::new();
        check_node(node, 0, &mut keys);
        assert!(keys.windows(2).all(|window| window[0] <= window[1]));
    });
}

#[test]
fn test_randomized_against_model() {
    let mut rng = XorShiftRng::from_seed([3, 1, 4, 1]);
    for _ in 0..10 {
        let count = rng.gen_range(1, 200);
        let mut keys: Vec<i64> = (0..count).map(|_| rng.gen_range(-1000, 1000)).collect();
        keys.sort();
        keys.dedup();
        let model: Vec<(i64, i64)> = keys
            .iter()
            .map(|&key| (key, rng.gen_range(-50, 50)))
            .collect();
        let values: Vec<i64> = model.iter().map(|&(_, value)| value).collect();
        let mut model = model;
        let mut treap = RangeTreap::from_sorted_with_rng(values, keys, Sum, &mut rng);

        for _ in 0..500 {
            let start = rng.gen_range(-1100, 1100);
            let end = rng.gen_range(-1100, 1100);
            match rng.gen_range(0, 3) {
                0 => {
                    let in_range: Vec<i64> = model
                        .iter()
                        .filter(|&&(key, _)| start <= key && key < end)
                        .map(|&(_, value)| value)
                        .collect();
                    let expected = if in_range.is_empty() {
                        None
                    } else {
                        Some(in_range.iter().sum::<i64>())
                    };
                    assert_eq!(treap.query(start, end), expected);
                }
                1 => {
                    let index = rng.gen_range(0, model.len());
                    let (key, _) = model[index];
                    let delta = rng.gen_range(-10, 10);
                    let ret = treap.change_at(key, |value| value + delta);
                    model[index].1 += delta;
                    assert_eq!(ret, Some(model[index].1));
                }
                _ => {
                    treap.with_split(start, end, |_| {});
                }
            }
        }

        let pairs: Vec<(i64, i64)> = treap.iter().map(|(key, value)| (key, *value)).collect();
        assert_eq!(pairs, model);
        check_invariants(&mut treap);
    }
}

#[test]
fn test_repartitioning_preserves_sequence() {
    let mut rng = XorShiftRng::from_seed([9, 8, 7, 6]);
    let values: Vec<i64> = (0..128).map(|index| index * 3 - 40).collect();
    let keys: Vec<i64> = (0..128).map(|index| index * 2).collect();
    let mut treap = RangeTreap::from_sorted_with_rng(values, keys, Sum, &mut rng);
    let before: Vec<(i64, i64)> = treap.iter().map(|(key, value)| (key, *value)).collect();
    let total = treap.query(0, 256);

    for start in (-10..260).step_by(7) {
        treap.with_split(start, start + 13, |_| {});
        check_invariants(&mut treap);
    }

    let after: Vec<(i64, i64)> = treap.iter().map(|(key, value)| (key, *value)).collect();
    assert_eq!(after, before);
    assert_eq!(treap.query(0, 256), total);
}

#[test]
fn test_query_does_not_change_content() {
    let mut rng = XorShiftRng::from_seed([5, 5, 5, 5]);
    let values: Vec<i64> = (0..64).collect();
    let keys: Vec<i64> = (0..64).collect();
    let mut treap = RangeTreap::from_sorted_with_rng(values, keys, Sum, &mut rng);
    let before: Vec<(i64, i64)> = treap.iter().map(|(key, value)| (key, *value)).collect();

    for start in 0..64 {
        treap.query(start, start + 16);
    }

    let after: Vec<(i64, i64)> = treap.iter().map(|(key, value)| (key, *value)).collect();
    assert_eq!(after, before);
    check_invariants(&mut treap);
}

#[test]
fn test_same_seed_same_shape() {
    let values: Vec<i64> = (0..50).collect();
    let keys: Vec<i64> = (0..50).collect();

    let mut shapes = Vec::new();
    for _ in 0..2 {
        let mut rng = XorShiftRng::from_seed([2, 7, 1, 8]);
        let mut treap =
            RangeTreap::from_sorted_with_rng(values.clone(), keys.clone(), Sum, &mut rng);
        let mut priorities = Vec::new();
        treap.with_split(0, 50, |root| {
            fn walk(node: &Node<i64>, out: &mut Vec<u32>) {
                if let Some(ref left_node) = node.left {
                    walk(left_node, out);
                }
                out.push(node.priority);
                if let Some(ref right_node) = node.right {
                    walk(right_node, out);
                }
            }
            walk(root.expect("expected a non-empty treap"), &mut priorities);
        });
        shapes.push(priorities);
    }
    assert_eq!(shapes[0], shapes[1]);
}
