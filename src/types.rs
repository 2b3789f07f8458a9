//! Core value types: points, axes, attributed samples and criteria names.

use crate::error::{KdTableError, Result};
use crate::query::lexer::{is_word_char, keyword};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Text attributes carried by a sample, positionally matching the criteria
/// names after the two axes.
pub type Attributes = SmallVec<[String; 4]>;

/// One of the two ordered numeric dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Position of the axis in a point and in the criteria list.
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            _ => None,
        }
    }

    /// Split axis used at a given tree depth.
    pub const fn at_depth(depth: usize) -> Self {
        if depth % 2 == 0 { Axis::X } else { Axis::Y }
    }

}

/// A point with two finite coordinates.
///
/// Negative zero is folded into positive zero on construction so that
/// coordinate equality and the key ordering agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        // -0.0 + 0.0 == +0.0
        Self {
            x: x + 0.0,
            y: y + 0.0,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Coordinate on the given axis.
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.is_finite() {
            return Err(KdTableError::Validation(format!(
                "Coordinates must be finite, got: {}",
                self
            )));
        }
        Ok(())
    }

    /// Bit pattern of both coordinates, used for duplicate detection.
    pub(crate) fn bits(&self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

/// A stored point together with its text attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub point: Point,
    pub attributes: Attributes,
}

impl Sample {
    pub fn new<I, S>(point: Point, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            point,
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.point)?;
        for attribute in &self.attributes {
            write!(f, " {}", attribute)?;
        }
        Ok(())
    }
}

/// Checks that an attribute value can be written to and read back from a
/// whitespace-delimited sample file.
pub(crate) fn validate_attribute(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(KdTableError::validation("Attribute values must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(KdTableError::Validation(format!(
            "Attribute value must not contain whitespace: {:?}",
            value
        )));
    }
    Ok(())
}

/// Checks that a criterion name survives a sample file round trip and can be
/// written as a single word in a query.
fn validate_criterion_name(idx: usize, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(KdTableError::Validation(format!(
            "Criterion {} has an empty name",
            idx + 1
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(KdTableError::Validation(format!(
            "Criterion name must not contain whitespace: {:?}",
            name
        )));
    }
    if !name.chars().all(is_word_char) {
        return Err(KdTableError::Validation(format!(
            "Criterion name may only contain letters, digits, '_', '.', '-' and '+': {:?}",
            name
        )));
    }
    if keyword(name).is_some() {
        return Err(KdTableError::Validation(format!(
            "Criterion name must not be a query keyword: {:?}",
            name
        )));
    }
    Ok(())
}

/// Ordered criteria names. The first two label the axes, the rest label the
/// attributes positionally.
#[derive(Debug, Clone)]
pub struct Criteria {
    names: Vec<String>,
    lookup: FxHashMap<String, usize>,
}

/// What a criteria name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Axis(Axis),
    /// Position within `Sample::attributes`.
    Attribute(usize),
}

impl Criteria {
    /// Build criteria from at least two unique names. Each name must be a
    /// single query word that is not a keyword.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() < 2 {
            return Err(KdTableError::Validation(format!(
                "At least 2 criteria are required, got {}",
                names.len()
            )));
        }

        let mut lookup = FxHashMap::default();
        for (idx, name) in names.iter().enumerate() {
            validate_criterion_name(idx, name)?;
            if lookup.insert(name.clone(), idx).is_some() {
                return Err(KdTableError::Validation(format!(
                    "Duplicate criterion name: {}",
                    name
                )));
            }
        }

        Ok(Self { names, lookup })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of text attributes each sample carries.
    pub fn attribute_count(&self) -> usize {
        self.names.len() - 2
    }

    pub fn axis_name(&self, axis: Axis) -> &str {
        &self.names[axis.index()]
    }

    pub fn attribute_name(&self, position: usize) -> Option<&str> {
        self.names.get(position + 2).map(String::as_str)
    }

    /// Resolve a name to the axis or attribute it labels.
    pub fn resolve(&self, name: &str) -> Option<Criterion> {
        let idx = *self.lookup.get(name)?;
        Some(match Axis::from_index(idx) {
            Some(axis) => Criterion::Axis(axis),
            None => Criterion::Attribute(idx - 2),
        })
    }
}

impl PartialEq for Criteria {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for Criteria {}
