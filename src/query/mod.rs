//! A small WHERE-clause language over the criteria of an index.
//!
//! ```text
//! SELECT <col>[, <col>...] | * FROM <table> [WHERE <cond> [AND <cond>...]] [;]
//! <cond> := <name> = <value> | <name> <= <number> | <name> >= <number>
//!         | <name> in [<number>, <number>]
//! ```
//!
//! Conditions on the two axis criteria narrow a range search; conditions on
//! attribute criteria are exact-match filters applied to its result.

pub mod lexer;
pub mod parser;
pub mod plan;

pub use lexer::{Token, tokenize};
pub use parser::{Condition, Operand, Operator, Projection, SelectStatement, parse};
pub use plan::{QueryPlan, Record};

use crate::error::Result;
use crate::tree::KdTree;
use crate::types::Criteria;

/// Parse, translate and evaluate a query in one step.
pub fn run(query: &str, criteria: &Criteria, tree: &KdTree) -> Result<Vec<Record>> {
    let statement = parse(query)?;
    let plan = QueryPlan::new(&statement, criteria)?;
    Ok(plan.execute(tree))
}
