//! Ordering types for query result sorting.
//!
//! Provides [`Dir`] for sort direction and [`OrderBy`] for column-based
//! ordering terms, plus the multi-key comparator applied at materialization.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::Error;
use crate::row::Row;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dir {
    type Err = Error;

    /// Parses a direction token, case-insensitively.
    ///
    /// Only `"asc"` and `"desc"` are recognized; anything else fails with
    /// [`Error::InvalidDirection`] at construction time, before any query
    /// runs.
    fn from_str(token: &str) -> Result<Self, Error> {
        if token.eq_ignore_ascii_case("asc") {
            Ok(Dir::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Ok(Dir::Desc)
        } else {
            Err(Error::InvalidDirection {
                token: token.to_string(),
            })
        }
    }
}

/// A single ordering term specifying a column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The column to sort by.
    pub column: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given column.
    pub fn asc(column: impl Into<String>) -> Self {
        OrderBy {
            column: column.into(),
            dir: Dir::Asc,
        }
    }

    /// Creates a new descending ordering for the given column.
    pub fn desc(column: impl Into<String>) -> Self {
        OrderBy {
            column: column.into(),
            dir: Dir::Desc,
        }
    }

    /// Creates a new ordering with the given direction.
    pub fn new(column: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            column: column.into(),
            dir,
        }
    }
}

/// Compares two rows using a list of ordering terms.
///
/// Terms are evaluated left to right: the first term whose column values
/// differ decides the result (with the term's direction applied); equal
/// values fall through to the next term. Rows equal on every term compare
/// equal. Comparison is lexicographic over the raw field text; an absent
/// field sorts before any present one.
pub fn compare_rows(a: &Row, b: &Row, orderings: &[OrderBy]) -> Ordering {
    for term in orderings {
        let ordering = a.get(&term.column).cmp(&b.get(&term.column));
        if ordering != Ordering::Equal {
            return term.dir.apply(ordering);
        }
    }
    Ordering::Equal
}
