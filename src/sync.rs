//! Thread-safe wrapper for concurrent index access.
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! kdtable = { version = "0.1", features = ["sync"] }
//! ```
//!
//! Readers take an `Arc` snapshot of the current index and query it without
//! holding any lock. Writers are serialized; each builds a complete
//! replacement index and publishes it with one short write lock.
//!
//! ```rust
//! use kdtable::{Axis, Criteria, Point, SyncIndex};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let index = SyncIndex::new(Criteria::new(["x", "y"])?);
//!
//! let writer = index.clone();
//! let handle = thread::spawn(move || writer.insert(Point::new(1.0, 2.0), Vec::<String>::new()));
//!
//! index.insert(Point::new(3.0, 4.0), Vec::<String>::new())?;
//! handle.join().unwrap()?;
//!
//! assert_eq!(index.find_max(Axis::X), Some(Point::new(3.0, 4.0)));
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::index::SampleIndex;
use crate::query::Record;
use crate::tree::Extreme;
use crate::types::{Axis, Criteria, Point, Sample};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;

/// Shared handle to a [`SampleIndex`]. Cloning shares the same index.
#[derive(Clone)]
pub struct SyncIndex {
    current: Arc<RwLock<Arc<SampleIndex>>>,
    writer: Arc<Mutex<()>>,
}

impl SyncIndex {
    pub fn new(criteria: Criteria) -> Self {
        Self::from_index(SampleIndex::new(criteria))
    }

    pub fn from_index(index: SampleIndex) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(index))),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Opens an index from a sample file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_index(SampleIndex::open(path)?))
    }

    /// The index as currently published. Later writes do not affect it.
    pub fn snapshot(&self) -> Arc<SampleIndex> {
        Arc::clone(&self.current.read())
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    // ===== Writes =====

    pub fn insert<I, S>(&self, point: Point, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.update(|index| index.insert(point, attributes))
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.update(|index| index.load(path))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.snapshot().save(path)
    }

    /// Apply `f` to a private copy and publish it only if `f` succeeds.
    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SampleIndex) -> Result<()>,
    {
        let _guard = self.writer.lock();
        let mut next = SampleIndex::clone(&self.snapshot());
        f(&mut next)?;
        *self.current.write() = Arc::new(next);
        Ok(())
    }

    // ===== Queries =====

    pub fn find_extreme(&self, axis: Axis, extreme: Extreme) -> Option<Point> {
        self.snapshot().find_extreme(axis, extreme)
    }

    pub fn find_min(&self, axis: Axis) -> Option<Point> {
        self.snapshot().find_min(axis)
    }

    pub fn find_max(&self, axis: Axis) -> Option<Point> {
        self.snapshot().find_max(axis)
    }

    /// Like [`SampleIndex::range_query`], returning owned samples.
    pub fn range_query(&self, low: [f64; 2], high: [f64; 2]) -> Result<Vec<Sample>> {
        let snapshot = self.snapshot();
        let hits = snapshot.range_query(low, high)?;
        Ok(hits.into_iter().cloned().collect())
    }

    pub fn run_query(&self, query: &str) -> Result<Vec<Record>> {
        self.snapshot().run_query(query)
    }

    pub fn render(&self) -> Result<String> {
        self.snapshot().render()
    }
}
