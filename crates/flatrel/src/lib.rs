//! Flatrel - ActiveRecord-style queries over delimiter-separated flat files.
//!
//! Flatrel gives a TSV file (or any single-byte-delimited flat file with a
//! header row) a small relational surface: build a [`Relation`] with
//! `filter`, `order`, and `group`, then execute it with `first`, `last`,
//! `take`, `count`, `exists`, or full materialization. Common accesses never
//! load the whole file:
//!
//! - Unordered `first`/`take`/`exists` pull a lazy stream and stop early.
//! - An unconditioned `last` finds the final record with a backward
//!   byte-scan from end-of-file.
//! - Anything touching an ordering materializes the filtered set and sorts
//!   it with a multi-key, left-to-right tie-breaking comparator.
//!
//! # Quick Start
//!
//! ```
//! use flatrel::{Dir, Table};
//!
//! # fn main() -> flatrel::Result<()> {
//! # use std::io::Write as _;
//! # let mut file = tempfile::NamedTempFile::new().unwrap();
//! # file.write_all(b"id\tname\tage\n1\tksss\t30\n2\tfoo\t25\n3\tbar\t30\n").unwrap();
//! let users = Table::open(file.path())?;
//!
//! // Branch one base query several ways; the base is never mutated.
//! let everyone = users.all();
//! let thirty = everyone.filter([("age", "30")]);
//! assert_eq!(thirty.count()?, 2usize);
//!
//! let oldest = everyone
//!     .order_by("age", Dir::Desc)
//!     .order("id")
//!     .first()?
//!     .unwrap();
//! assert_eq!(oldest.get("id"), Some("1"));
//!
//! // The final record comes from a backward byte-scan, not a full read.
//! let last = everyone.last()?.unwrap();
//! assert_eq!(last.get("name"), Some("bar"));
//!
//! // Negation via the two-call chain.
//! let others = everyone.where_chain().not([("age", "30")]);
//! assert_eq!(others.count()?, 1usize);
//! # Ok(())
//! # }
//! ```
//!
//! # Query semantics
//!
//! Conditions accumulate as a conjunction only:
//!
//! ```text
//! match = (every filter clause matches) ∧ (every negated clause matches)
//! ```
//!
//! where each clause's own column/value pairs are also ANDed. There is no
//! OR. Every field comparison is raw text against raw text - the engine
//! performs no numeric or other coercion, so `filter([("age", 30)])` matches
//! the literal field text `"30"`.
//!
//! Refinement methods take `&self` and return a fresh [`Relation`], so a
//! base query can be branched into independent refinements and reused
//! safely. Two relations are equal when their condition, ordering, and
//! grouping sequences are equal.

mod condition;
mod count;
mod error;
mod ordering;
mod relation;
mod row;
mod table;
mod tail;
mod where_chain;

// Re-export public API
pub use condition::{Condition, Op};
pub use count::{Count, GroupKey};
pub use error::{Error, Result};
pub use ordering::{compare_rows, Dir, OrderBy};
pub use relation::{Relation, Rows};
pub use row::Row;
pub use table::{Table, DEFAULT_SEPARATOR};
pub use where_chain::WhereChain;
