//! Index builder for flexible configuration
//!
//! Combines a [`Config`], explicit criteria names and an optional sample file
//! to load on startup.

use crate::config::Config;
use crate::error::{KdTableError, Result};
use crate::index::SampleIndex;
use crate::types::Criteria;
use std::path::PathBuf;

/// Builder for a [`SampleIndex`].
#[derive(Debug, Default)]
pub struct IndexBuilder {
    config: Config,
    criteria: Option<Vec<String>>,
    sample_path: Option<PathBuf>,
}

impl IndexBuilder {
    /// Create a builder with default configuration and no sample file.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Criteria names for the index. Overrides `Config::default_criteria`.
    pub fn criteria<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sample file loaded by [`build`](Self::build). Relative paths resolve
    /// against `Config::sample_dir`.
    pub fn sample_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.sample_path = Some(path.into());
        self
    }

    /// Build the index, loading the sample file if one was given. When
    /// criteria were also given they must match the file's.
    pub fn build(self) -> Result<SampleIndex> {
        let Self {
            config,
            criteria,
            sample_path,
        } = self;
        config.validate().map_err(KdTableError::Validation)?;

        let requested = match criteria {
            Some(names) => Some(Criteria::new(names)?),
            None => None,
        };
        let initial = match &requested {
            Some(criteria) => criteria.clone(),
            None => Criteria::new(config.default_criteria.clone())?,
        };
        let mut index = SampleIndex::from_parts(initial, config);

        if let Some(path) = sample_path {
            index.load(&path)?;
            if let Some(requested) = requested
                && index.criteria() != &requested
            {
                return Err(KdTableError::Validation(format!(
                    "Sample file criteria {:?} do not match {:?}",
                    index.criteria().names(),
                    requested.names()
                )));
            }
        }

        Ok(index)
    }
}
