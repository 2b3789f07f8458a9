//! Append-only sample store, the source of truth the tree is derived from.

use crate::error::{KdTableError, Result};
use crate::types::{Point, Sample};
use rustc_hash::FxHashSet;

/// Samples in insertion order, unique by coordinates.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    samples: Vec<Sample>,
    coords: FxHashSet<(u64, u64)>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a batch, failing on the first duplicate coordinate.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        let mut store = Self {
            samples: Vec::with_capacity(samples.len()),
            coords: FxHashSet::default(),
        };
        for sample in samples {
            store.push(sample)?;
        }
        Ok(store)
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.coords.contains(&point.bits())
    }

    /// Append a sample. The store is unchanged when the coordinates are taken.
    pub fn push(&mut self, sample: Sample) -> Result<()> {
        if !self.coords.insert(sample.point.bits()) {
            return Err(KdTableError::Duplicate {
                x: sample.point.x(),
                y: sample.point.y(),
            });
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a SampleStore {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
