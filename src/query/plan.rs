//! Translation of a parsed statement into a range search plus attribute
//! filters, and its evaluation against a tree.

use super::parser::{Condition, Operand, Operator, Projection, SelectStatement};
use crate::error::{KdTableError, Result};
use crate::tree::KdTree;
use crate::types::{Axis, Criteria, Criterion, Sample};
use std::collections::BTreeMap;

/// One projected result row, keyed by column name.
pub type Record = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    low: [f64; 2],
    high: [f64; 2],
    /// Attribute position and the exact value it must equal.
    filters: Vec<(usize, String)>,
    columns: Vec<(String, Criterion)>,
}

impl QueryPlan {
    /// Resolve every name in the statement and fold axis conditions into
    /// inclusive bounds. Repeated conditions on an axis intersect.
    pub fn new(statement: &SelectStatement, criteria: &Criteria) -> Result<Self> {
        let mut plan = Self {
            low: [f64::NEG_INFINITY; 2],
            high: [f64::INFINITY; 2],
            filters: Vec::new(),
            columns: Vec::new(),
        };

        for condition in &statement.conditions {
            match criteria.resolve(&condition.criterion) {
                Some(Criterion::Axis(axis)) => plan.tighten(axis, condition)?,
                Some(Criterion::Attribute(position)) => {
                    plan.filters.push((position, attribute_value(condition)?));
                }
                None => {
                    return Err(KdTableError::Validation(format!(
                        "Unknown criterion: {}",
                        condition.criterion
                    )));
                }
            }
        }

        plan.columns = match &statement.projection {
            Projection::All => criteria
                .names()
                .iter()
                .filter_map(|name| Some((name.clone(), criteria.resolve(name)?)))
                .collect(),
            Projection::Columns(names) => names
                .iter()
                .map(|name| match criteria.resolve(name) {
                    Some(criterion) => Ok((name.clone(), criterion)),
                    None => Err(KdTableError::Validation(format!("Unknown column: {}", name))),
                })
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(plan)
    }

    pub fn low(&self) -> [f64; 2] {
        self.low
    }

    pub fn high(&self) -> [f64; 2] {
        self.high
    }

    pub fn filters(&self) -> &[(usize, String)] {
        &self.filters
    }

    fn tighten(&mut self, axis: Axis, condition: &Condition) -> Result<()> {
        let i = axis.index();
        match (condition.op, &condition.value) {
            (Operator::Eq, Operand::Scalar(value)) => {
                let value = number(&condition.criterion, value)?;
                self.low[i] = self.low[i].max(value);
                self.high[i] = self.high[i].min(value);
            }
            (Operator::Ge, Operand::Scalar(value)) => {
                self.low[i] = self.low[i].max(number(&condition.criterion, value)?);
            }
            (Operator::Le, Operand::Scalar(value)) => {
                self.high[i] = self.high[i].min(number(&condition.criterion, value)?);
            }
            (Operator::In, Operand::Range(low, high)) => {
                self.low[i] = self.low[i].max(number(&condition.criterion, low)?);
                self.high[i] = self.high[i].min(number(&condition.criterion, high)?);
            }
            (op, _) => {
                return Err(KdTableError::Validation(format!(
                    "Operator '{}' is not supported on '{}', use =, <=, >= or in",
                    op, condition.criterion
                )));
            }
        }
        Ok(())
    }

    /// Matching samples projected onto the requested columns.
    pub fn execute(&self, tree: &KdTree) -> Vec<Record> {
        tree.range(self.low, self.high)
            .into_iter()
            .filter(|sample| self.matches(sample))
            .map(|sample| self.project(sample))
            .collect()
    }

    fn matches(&self, sample: &Sample) -> bool {
        self.filters
            .iter()
            .all(|(position, value)| sample.attributes.get(*position) == Some(value))
    }

    fn project(&self, sample: &Sample) -> Record {
        self.columns
            .iter()
            .map(|(name, criterion)| {
                let value = match criterion {
                    Criterion::Axis(axis) => format!("{:?}", sample.point.coord(*axis)),
                    Criterion::Attribute(position) => sample
                        .attributes
                        .get(*position)
                        .cloned()
                        .unwrap_or_default(),
                };
                (name.clone(), value)
            })
            .collect()
    }
}

fn attribute_value(condition: &Condition) -> Result<String> {
    match (condition.op, &condition.value) {
        (Operator::Eq, Operand::Scalar(value)) => Ok(value.clone()),
        (op, _) => Err(KdTableError::Validation(format!(
            "Operator '{}' is not supported on attribute '{}', use =",
            op, condition.criterion
        ))),
    }
}

fn number(criterion: &str, text: &str) -> Result<f64> {
    match text.parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(value),
        _ => Err(KdTableError::Validation(format!(
            "Expected a number for '{}', got {:?}",
            criterion, text
        ))),
    }
}
