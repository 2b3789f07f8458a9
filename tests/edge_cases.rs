use kdtable::tree::{CompositeKey, Node};
use kdtable::{Axis, Criteria, Extreme, KdTableError, KdTree, Point, Sample, SampleIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

const DEPARTMENTS: [&str; 4] = ["chimie", "math", "informatique", "physique"];

/// Random samples on a coarse grid so that many share one coordinate.
fn random_samples(rng: &mut StdRng, count: usize, grid: i32) -> Vec<Sample> {
    let mut seen = HashSet::new();
    let mut samples = Vec::with_capacity(count);
    while samples.len() < count {
        let x = rng.gen_range(-grid..=grid);
        let y = rng.gen_range(-grid..=grid);
        if seen.insert((x, y)) {
            let department = DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())];
            samples.push(Sample::new(
                Point::new(f64::from(x) * 0.5, f64::from(y) * 0.25),
                [department],
            ));
        }
    }
    samples
}

fn index_of(samples: &[Sample]) -> SampleIndex {
    let mut index = SampleIndex::new(Criteria::new(["x", "y", "department"]).unwrap());
    for sample in samples {
        index
            .insert(sample.point, sample.attributes.iter().cloned())
            .unwrap();
    }
    index
}

fn sorted_points<'a>(samples: impl IntoIterator<Item = &'a Sample>) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = samples
        .into_iter()
        .map(|s| (s.point.x(), s.point.y()))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    points
}

fn brute_range(samples: &[Sample], low: [f64; 2], high: [f64; 2]) -> Vec<(f64, f64)> {
    sorted_points(samples.iter().filter(|s| {
        Axis::ALL.iter().all(|&axis| {
            let v = s.point.coord(axis);
            low[axis.index()] <= v && v <= high[axis.index()]
        })
    }))
}

fn random_bounds(rng: &mut StdRng) -> ([f64; 2], [f64; 2]) {
    let x0 = f64::from(rng.gen_range(-24..=24)) * 0.5;
    let x1 = f64::from(rng.gen_range(-24..=24)) * 0.5;
    let y0 = f64::from(rng.gen_range(-24..=24)) * 0.25;
    let y1 = f64::from(rng.gen_range(-24..=24)) * 0.25;
    ([x0.min(x1), y0.min(y1)], [x0.max(x1), y0.max(y1)])
}

fn check_split_invariant(node: &Node) {
    if let Node::Internal(inner) = node {
        for sample in inner.left.leaves() {
            assert!(CompositeKey::for_point(sample.point, inner.axis) < inner.split);
        }
        for sample in inner.right.leaves() {
            assert!(CompositeKey::for_point(sample.point, inner.axis) >= inner.split);
        }
        check_split_invariant(&inner.left);
        check_split_invariant(&inner.right);
    }
}

#[test]
fn test_completeness_and_split_invariant() {
    let mut rng = StdRng::seed_from_u64(7);
    for count in [1, 2, 3, 17, 200] {
        let samples = random_samples(&mut rng, count, 20);
        let tree = KdTree::build(&samples);

        assert_eq!(sorted_points(tree.leaves()), sorted_points(&samples));
        let root = tree.root().unwrap();
        check_split_invariant(root);

        // Balanced: depth grows with log2 of the sample count.
        let bound = (usize::BITS - count.leading_zeros()) as usize + 1;
        assert!(tree.depth() <= bound, "depth {} for {}", tree.depth(), count);
    }
}

#[test]
fn test_extremes_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let samples = random_samples(&mut rng, 60, 6);
        let tree = KdTree::build(&samples);

        for axis in Axis::ALL {
            let key = |s: &&Sample| CompositeKey::for_point(s.point, axis);
            let min = samples.iter().min_by_key(key).map(|s| s.point);
            let max = samples.iter().max_by_key(key).map(|s| s.point);

            assert_eq!(tree.find_extreme(axis, Extreme::Min), min);
            assert_eq!(tree.find_extreme(axis, Extreme::Max), max);

            let coords: Vec<f64> = samples.iter().map(|s| s.point.coord(axis)).collect();
            let smallest = coords.iter().copied().fold(f64::INFINITY, f64::min);
            assert_eq!(tree.find_min(axis).map(|p| p.coord(axis)), Some(smallest));
        }
    }
}

#[test]
fn test_range_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(23);
    let samples = random_samples(&mut rng, 300, 24);
    let tree = KdTree::build(&samples);

    for _ in 0..200 {
        let (low, high) = random_bounds(&mut rng);
        assert_eq!(
            sorted_points(tree.range(low, high)),
            brute_range(&samples, low, high),
            "range {:?}..{:?}",
            low,
            high
        );
    }
}

#[test]
fn test_range_edge_cases() {
    let mut rng = StdRng::seed_from_u64(31);
    let samples = random_samples(&mut rng, 100, 10);
    let index = index_of(&samples);

    // A degenerate rectangle on an existing point returns exactly that point.
    for sample in samples.choose_multiple(&mut rng, 10) {
        let p = [sample.point.x(), sample.point.y()];
        let hits = index.range_query(p, p).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], sample);
    }

    // Entirely outside the data.
    assert!(index.range_query([100.0, 100.0], [200.0, 200.0]).unwrap().is_empty());
    assert!(index.range_query([-200.0, 0.0], [-100.0, 1.0]).unwrap().is_empty());

    // Inverted bounds select nothing.
    assert!(index.range_query([5.0, 5.0], [-5.0, -5.0]).unwrap().is_empty());

    // Infinite bounds select everything.
    let all = index
        .range_query([f64::NEG_INFINITY; 2], [f64::INFINITY; 2])
        .unwrap();
    assert_eq!(all.len(), samples.len());

    for bad in [[f64::NAN, 0.0], [0.0, f64::NAN]] {
        assert!(matches!(
            index.range_query(bad, [1.0, 1.0]),
            Err(KdTableError::Validation(_))
        ));
        assert!(index.range_query([0.0, 0.0], bad).is_err());
    }
}

#[test]
fn test_query_matches_range() {
    let mut rng = StdRng::seed_from_u64(47);
    let samples = random_samples(&mut rng, 150, 16);
    let index = index_of(&samples);

    for _ in 0..50 {
        let (low, high) = random_bounds(&mut rng);
        let query = format!(
            "SELECT x, y FROM t WHERE x >= {:?} AND x <= {:?} AND y in [{:?}, {:?}]",
            low[0], high[0], low[1], high[1]
        );
        let records = index.run_query(&query).unwrap();
        let mut from_query: Vec<(f64, f64)> = records
            .iter()
            .map(|r| (r["x"].parse().unwrap(), r["y"].parse().unwrap()))
            .collect();
        from_query.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let from_range = sorted_points(index.range_query(low, high).unwrap());
        assert_eq!(from_query, from_range, "query {}", query);
    }
}

#[test]
fn test_attribute_filter_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(53);
    let samples = random_samples(&mut rng, 120, 12);
    let index = index_of(&samples);

    for department in DEPARTMENTS {
        let query = format!("SELECT x, y FROM t WHERE y >= 0 AND department = {}", department);
        let records = index.run_query(&query).unwrap();
        let expected = samples
            .iter()
            .filter(|s| s.point.y() >= 0.0 && s.attributes[0] == department)
            .count();
        assert_eq!(records.len(), expected, "department {}", department);
    }
}

#[test]
fn test_queries_are_idempotent() {
    let mut rng = StdRng::seed_from_u64(59);
    let samples = random_samples(&mut rng, 80, 10);
    let index = index_of(&samples);
    let rebuilt = KdTree::build(index.samples());

    for _ in 0..20 {
        let (low, high) = random_bounds(&mut rng);
        let first = sorted_points(index.range_query(low, high).unwrap());
        let second = sorted_points(index.range_query(low, high).unwrap());
        assert_eq!(first, second);
        assert_eq!(first, sorted_points(rebuilt.range(low, high)));
    }
    for axis in Axis::ALL {
        assert_eq!(index.find_max(axis), rebuilt.find_max(axis));
        assert_eq!(index.find_min(axis), rebuilt.find_min(axis));
    }
}

#[test]
fn test_duplicates_are_always_rejected() {
    let mut rng = StdRng::seed_from_u64(61);
    let samples = random_samples(&mut rng, 50, 8);
    let mut index = index_of(&samples);

    for sample in &samples {
        let result = index.insert(sample.point, ["other"]);
        assert!(matches!(result, Err(KdTableError::Duplicate { .. })));
    }
    assert_eq!(index.len(), samples.len());
    assert_eq!(index.tree().len(), samples.len());

    // -0.0 and 0.0 are the same coordinate.
    let mut index = SampleIndex::new(Criteria::new(["x", "y"]).unwrap());
    index.insert(Point::new(0.0, 0.0), Vec::<String>::new()).unwrap();
    assert!(index.insert(Point::new(-0.0, -0.0), Vec::<String>::new()).is_err());
}

#[test]
fn test_failed_load_is_atomic() {
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(67);
    let samples = random_samples(&mut rng, 40, 8);
    let mut index = index_of(&samples);
    let before = sorted_points(index.samples());

    let mut text = String::from("3\nx\ny\ndepartment\n40\n");
    for sample in samples.iter().take(39) {
        text.push_str(&format!("{} {} {}\n", sample.point.x(), sample.point.y(), "math"));
    }
    // Last line repeats the first coordinates.
    text.push_str(&format!("{} {} physique\n", samples[0].point.x(), samples[0].point.y()));
    let path = dir.path().join("dup.txt");
    fs::write(&path, text).unwrap();

    assert!(matches!(index.load(&path), Err(KdTableError::Duplicate { .. })));
    assert_eq!(sorted_points(index.samples()), before);
    assert_eq!(sorted_points(index.tree().leaves()), before);
}

#[test]
fn test_single_sample_tree() {
    let samples = vec![Sample::new(Point::new(3.0, 182.0), ["informatique"])];
    let tree = KdTree::build(&samples);
    assert!(tree.root().unwrap().is_leaf());
    for axis in Axis::ALL {
        assert_eq!(tree.find_min(axis), Some(Point::new(3.0, 182.0)));
        assert_eq!(tree.find_max(axis), Some(Point::new(3.0, 182.0)));
    }
    assert_eq!(tree.range([3.0, 182.0], [3.0, 182.0]).len(), 1);
    assert!(tree.range([3.5, 0.0], [4.0, 200.0]).is_empty());
}
