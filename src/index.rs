//! The sample index: a sample store, its criteria and the k-d tree derived
//! from them.
//!
//! Every successful insert or load rebuilds the tree from the full store.
//! Failed operations leave the index exactly as it was.

use crate::builder::IndexBuilder;
use crate::config::Config;
use crate::error::{KdTableError, Result};
use crate::persistence::SampleFile;
use crate::query::{self, Record};
use crate::store::SampleStore;
use crate::tree::{Extreme, KdTree};
use crate::types::{Axis, Criteria, Point, Sample, validate_attribute};
use std::path::{Path, PathBuf};

/// Single-threaded sample index.
///
/// # Examples
///
/// ```rust
/// use kdtable::{Axis, Criteria, Point, SampleIndex};
///
/// # fn main() -> kdtable::Result<()> {
/// let mut index = SampleIndex::new(Criteria::new(["year", "height", "department"])?);
/// index.insert(Point::new(3.0, 182.0), ["informatique"])?;
/// index.insert(Point::new(4.0, 176.33), ["physique"])?;
///
/// assert_eq!(index.find_min(Axis::Y), Some(Point::new(4.0, 176.33)));
///
/// let rows = index.run_query("SELECT department FROM P WHERE year >= 4")?;
/// assert_eq!(rows[0]["department"], "physique");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SampleIndex {
    criteria: Criteria,
    store: SampleStore,
    tree: KdTree,
    config: Config,
}

impl SampleIndex {
    /// Create an empty index with default configuration.
    pub fn new(criteria: Criteria) -> Self {
        Self::from_parts(criteria, Config::default())
    }

    /// Create an empty index whose criteria come from `config.default_criteria`.
    pub fn with_config(config: Config) -> Result<Self> {
        IndexBuilder::new().config(config).build()
    }

    pub fn builder() -> IndexBuilder {
        IndexBuilder::new()
    }

    /// Open an index from a sample file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        IndexBuilder::new()
            .sample_path(path.as_ref())
            .build()
    }

    pub(crate) fn from_parts(criteria: Criteria, config: Config) -> Self {
        Self {
            criteria,
            store: SampleStore::new(),
            tree: KdTree::default(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Samples in insertion order.
    pub fn samples(&self) -> &[Sample] {
        self.store.as_slice()
    }

    pub fn tree(&self) -> &KdTree {
        &self.tree
    }

    /// Insert a sample and rebuild the tree.
    ///
    /// Fails without changing the index when a coordinate is not finite, the
    /// attribute count does not match the criteria, an attribute value is
    /// empty or contains whitespace, or a sample already exists at `point`.
    pub fn insert<I, S>(&mut self, point: Point, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        point.validate()?;
        let sample = Sample::new(point, attributes);

        let expected = self.criteria.attribute_count();
        if sample.attributes.len() != expected {
            return Err(KdTableError::Validation(format!(
                "Expected {} attributes, got {}",
                expected,
                sample.attributes.len()
            )));
        }
        for attribute in &sample.attributes {
            validate_attribute(attribute)?;
        }

        self.store.push(sample)?;
        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        self.tree = KdTree::build(self.store.as_slice());
    }

    pub fn find_extreme(&self, axis: Axis, extreme: Extreme) -> Option<Point> {
        self.tree.find_extreme(axis, extreme)
    }

    pub fn find_min(&self, axis: Axis) -> Option<Point> {
        self.tree.find_min(axis)
    }

    pub fn find_max(&self, axis: Axis) -> Option<Point> {
        self.tree.find_max(axis)
    }

    /// Samples with `low[i] <= p[i] <= high[i]` on both axes. Infinite
    /// bounds are allowed, NaN bounds are rejected.
    pub fn range_query(&self, low: [f64; 2], high: [f64; 2]) -> Result<Vec<&Sample>> {
        if low.iter().chain(high.iter()).any(|v| v.is_nan()) {
            log::warn!("Rejected range query {:?}..{:?}: NaN bound", low, high);
            return Err(KdTableError::validation("Range bounds must not be NaN"));
        }
        Ok(self.tree.range(low, high))
    }

    /// Evaluate a `SELECT ... FROM ... WHERE ...` query.
    pub fn run_query(&self, query: &str) -> Result<Vec<Record>> {
        query::run(query, &self.criteria, &self.tree)
            .inspect_err(|e| log::warn!("Rejected query {:?}: {}", query, e))
    }

    /// Sideways text view of the tree, labelled with the axis names.
    pub fn render(&self) -> Result<String> {
        let names = [
            self.criteria.axis_name(Axis::X),
            self.criteria.axis_name(Axis::Y),
        ];
        self.tree
            .render(names)
            .ok_or_else(|| KdTableError::State("Cannot render an empty index".to_string()))
    }

    /// Replace criteria and samples with the content of a sample file.
    ///
    /// The file is parsed, checked for duplicates and indexed before anything
    /// is swapped in, so a failed load leaves the index untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = self.resolve_path(path.as_ref());
        let set = SampleFile::new(&path).load()?;
        let store = SampleStore::from_samples(set.samples)?;
        let tree = KdTree::build(store.as_slice());

        self.criteria = set.criteria;
        self.store = store;
        self.tree = tree;
        log::info!("Loaded {} samples from {}", self.len(), path.display());
        Ok(())
    }

    /// Write criteria and samples to a sample file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if self.is_empty() {
            return Err(KdTableError::State("Cannot save an empty index".to_string()));
        }
        let path = self.resolve_path(path.as_ref());
        SampleFile::new(&path).save(&self.criteria, self.store.as_slice())?;
        log::info!("Saved {} samples to {}", self.len(), path.display());
        Ok(())
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        self.config.resolve_path(path)
    }
}
