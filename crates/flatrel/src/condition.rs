//! Condition clauses for query predicates.
//!
//! A [`Condition`] is one conjunctive predicate clause: an operator and a set
//! of column/expected-value pairs. A record satisfies the clause only if
//! every pair satisfies the operator.

use std::collections::HashMap;

use csv::StringRecord;

use crate::error::{Error, Result};

/// Comparison operator for a condition clause.
///
/// Field values are compared as raw text, never coerced. This mirrors the
/// flat-file model: every field is a string, and a predicate value is
/// captured in its string form at clause construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Field text equals the expected text.
    Eq,
    /// Field text differs from the expected text.
    Ne,
}

impl Op {
    /// Evaluates the operator against a raw field value.
    ///
    /// An absent field (`None`, from a record shorter than the schema) never
    /// equals anything and always differs from everything.
    pub fn eval(self, field: Option<&str>, expected: &str) -> bool {
        match self {
            Op::Eq => field == Some(expected),
            Op::Ne => field != Some(expected),
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One conjunctive predicate clause over named fields.
///
/// A clause holds an operator and one or more column/expected-value pairs.
/// Pairs are ANDed: the clause matches a record only if every pair's field
/// satisfies the operator. Conditions are immutable once constructed and are
/// owned by the [`Relation`](crate::Relation) that accumulated them.
///
/// # Example
///
/// ```
/// use flatrel::{Condition, Op};
///
/// let cond = Condition::equal([("age", "30"), ("name", "ksss")]);
/// assert_eq!(cond.op(), Op::Eq);
/// assert_eq!(cond.pairs().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    op: Op,
    pairs: Vec<(String, String)>,
}

impl Condition {
    /// Creates an equality clause from column/value pairs.
    ///
    /// Values are captured in their string form; comparison at execution is
    /// always text against text.
    pub fn equal<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        Condition::new(Op::Eq, pairs)
    }

    /// Creates a negated (not-equal) clause from column/value pairs.
    pub fn not_equal<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        Condition::new(Op::Ne, pairs)
    }

    fn new<I, K, V>(op: Op, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        Condition {
            op,
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        }
    }

    /// Returns the clause's operator.
    pub fn op(&self) -> Op {
        self.op
    }

    /// Returns the clause's column/expected-value pairs.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns `true` if the clause has no pairs (and so matches anything).
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Evaluates this clause against a raw record.
    ///
    /// `index` is the column-name lookup built once per execution from the
    /// table's declared column order. A pair naming a column the table does
    /// not declare is an [`Error::UnknownColumn`].
    pub(crate) fn matches(
        &self,
        record: &StringRecord,
        index: &HashMap<String, usize>,
    ) -> Result<bool> {
        for (column, expected) in &self.pairs {
            let i = *index.get(column).ok_or_else(|| Error::UnknownColumn {
                name: column.clone(),
            })?;
            if !self.op.eval(record.get(i), expected) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
