//! Two-dimensional k-d tree index over attributed samples, with per-axis
//! extreme-value queries, inclusive range queries and a small WHERE-clause
//! query language.
//!
//! ```rust
//! use kdtable::{Axis, Criteria, Point, SampleIndex};
//!
//! let mut index = SampleIndex::new(Criteria::new(["year", "height", "department"])?);
//! index.insert(Point::new(1.0, 164.63), ["chimie"])?;
//! index.insert(Point::new(3.0, 182.0), ["informatique"])?;
//! index.insert(Point::new(4.0, 176.33), ["physique"])?;
//!
//! assert_eq!(index.find_max(Axis::Y), Some(Point::new(3.0, 182.0)));
//! assert_eq!(index.range_query([3.0, 170.0], [4.0, 180.0])?.len(), 1);
//!
//! let rows = index.run_query("SELECT department FROM P WHERE year = 3 AND height in [170,190]")?;
//! assert_eq!(rows[0]["department"], "informatique");
//! # Ok::<(), kdtable::KdTableError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod index;
pub mod persistence;
pub mod query;
pub mod store;
pub mod tree;
pub mod types;

#[cfg(feature = "sync")]
pub mod sync;

pub use builder::IndexBuilder;
pub use config::Config;
pub use error::{KdTableError, Result};
pub use index::SampleIndex;
pub use persistence::{SampleFile, SampleSet};
pub use query::Record;
pub use store::SampleStore;
pub use tree::{Extreme, KdTree};
pub use types::{Attributes, Axis, Criteria, Criterion, Point, Sample};

#[cfg(feature = "sync")]
pub use sync::SyncIndex;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{Axis, Criteria, Extreme, Point, Record, Sample};

    pub use crate::{Config, IndexBuilder, KdTableError, Result, SampleIndex};

    #[cfg(feature = "sync")]
    pub use crate::SyncIndex;
}
