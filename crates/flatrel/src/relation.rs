//! Query builder and executor.
//!
//! A [`Relation`] accumulates conditions, ordering terms, and group columns
//! against one table, then executes on demand. Refinement never mutates:
//! every builder call branches a fresh `Relation`, so a base query can be
//! refined in several independent directions.
//!
//! Execution takes one of two paths: a lazy forward stream over the file
//! ([`Relation::rows`]) for unordered access, or materialize-then-sort for
//! anything touching an ordering. An unconditioned [`Relation::last`]
//! additionally short-cuts through a backward byte-scan of the file.

use std::collections::HashMap;
use std::fs::File;
use std::sync::Arc;

use csv::StringRecord;

use crate::condition::Condition;
use crate::count::{Count, GroupKey};
use crate::error::Result;
use crate::ordering::{compare_rows, Dir, OrderBy};
use crate::row::Row;
use crate::table::Table;
use crate::tail;
use crate::where_chain::WhereChain;

/// An immutable, branchable query over a table.
///
/// # Example
///
/// ```no_run
/// use flatrel::{Dir, Table};
///
/// # fn main() -> flatrel::Result<()> {
/// let users = Table::open("data/users.tsv")?;
///
/// let thirty = users.all().filter([("age", "30")]);
/// let oldest_first = thirty.order_by("age", Dir::Desc).order("id");
///
/// // `thirty` is untouched by the refinement above.
/// for row in thirty.rows()? {
///     println!("{:?}", row?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Relation {
    table: Arc<Table>,
    conditions: Vec<Condition>,
    orderings: Vec<OrderBy>,
    groupings: Vec<String>,
}

impl Relation {
    pub(crate) fn new(table: Arc<Table>) -> Relation {
        Relation {
            table,
            conditions: Vec::new(),
            orderings: Vec::new(),
            groupings: Vec::new(),
        }
    }

    /// Returns the table this relation queries.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Returns the accumulated condition clauses.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns the accumulated ordering terms.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    /// Returns the accumulated group columns.
    pub fn groupings(&self) -> &[String] {
        &self.groupings
    }

    // ========================================================================
    // Refinement
    // ========================================================================

    /// Branches with an equality clause over the given column/value pairs.
    ///
    /// Values are captured in string form and compared as text at execution.
    /// Pairs within one call are ANDed, as are successive `filter` calls;
    /// there is no OR. An empty pair set adds no clause.
    pub fn filter<I, K, V>(&self, pairs: I) -> Relation
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let condition = Condition::equal(pairs);
        if condition.is_empty() {
            return self.clone();
        }
        self.clone().push_condition(condition)
    }

    /// Branches into a [`WhereChain`] whose `not` call appends a negated
    /// clause.
    pub fn where_chain(&self) -> WhereChain {
        WhereChain::new(self.clone())
    }

    pub(crate) fn push_condition(mut self, condition: Condition) -> Relation {
        self.conditions.push(condition);
        self
    }

    /// Branches with an ascending ordering term for `column`.
    pub fn order(&self, column: impl Into<String>) -> Relation {
        self.order_by(column, Dir::Asc)
    }

    /// Branches with an ordering term for `column` in the given direction.
    ///
    /// Terms are deduplicated by value: adding an already-present term is a
    /// no-op and the original insertion order is kept.
    pub fn order_by(&self, column: impl Into<String>, dir: Dir) -> Relation {
        let term = OrderBy::new(column, dir);
        let mut branch = self.clone();
        if !branch.orderings.contains(&term) {
            branch.orderings.push(term);
        }
        branch
    }

    /// Branches with `column` appended to the group columns.
    ///
    /// Grouping only partitions the filtered set for [`count`]; it never
    /// filters. Duplicate additions are no-ops.
    ///
    /// [`count`]: Relation::count
    pub fn group(&self, column: impl Into<String>) -> Relation {
        let column = column.into();
        let mut branch = self.clone();
        if !branch.groupings.contains(&column) {
            branch.groupings.push(column);
        }
        branch
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Opens the lazy forward stream of matching rows.
    ///
    /// The stream reads the file on demand: pulling a bounded prefix reads a
    /// bounded amount of the file, and dropping the iterator closes the
    /// underlying handle. Rows come back in file order; orderings on this
    /// relation do not apply to the stream.
    pub fn rows(&self) -> Result<Rows> {
        Rows::open(self)
    }

    /// Materializes every matching row, sorted per the ordering terms.
    ///
    /// Without ordering terms the rows keep file order.
    pub fn to_vec(&self) -> Result<Vec<Row>> {
        let mut rows: Vec<Row> = self.rows()?.collect::<Result<_>>()?;
        if !self.orderings.is_empty() {
            rows.sort_by(|a, b| compare_rows(a, b, &self.orderings));
        }
        Ok(rows)
    }

    /// Returns the first matching row.
    ///
    /// Unordered, this pulls exactly one element from the lazy stream.
    /// With ordering terms the full set is materialized and sorted first;
    /// no element's rank is known until every match has been seen.
    pub fn first(&self) -> Result<Option<Row>> {
        if self.orderings.is_empty() {
            self.rows()?.next().transpose()
        } else {
            Ok(self.to_vec()?.into_iter().next())
        }
    }

    /// Returns at most `n` matching rows, with the same lazy-vs-materialize
    /// split as [`first`](Relation::first).
    pub fn take(&self, n: usize) -> Result<Vec<Row>> {
        if self.orderings.is_empty() {
            self.rows()?.take(n).collect()
        } else {
            let mut rows = self.to_vec()?;
            rows.truncate(n);
            Ok(rows)
        }
    }

    /// Returns the last matching row.
    ///
    /// With no conditions and no ordering terms, the final record is located
    /// by a backward byte-scan from end-of-file instead of a full read. The
    /// fast path steps aside for empty and header-only files, and any
    /// condition or ordering falls back to full materialization.
    pub fn last(&self) -> Result<Option<Row>> {
        if self.conditions.is_empty() && self.orderings.is_empty() {
            let mut file = File::open(self.table.path())?;
            if let Some(line) = tail::read_last_record(&mut file)? {
                let fields = self.parse_single_record(&line)?;
                return Ok(Some(Row::new(Arc::clone(&self.table), fields)));
            }
            // No complete record reachable from the end; the forward scan
            // below answers correctly for empty and header-only files.
        }
        Ok(self.to_vec()?.pop())
    }

    /// Returns `true` if any row matches.
    pub fn exists(&self) -> Result<bool> {
        Ok(self.first()?.is_some())
    }

    /// Counts matching rows.
    ///
    /// With no group columns the result is [`Count::Total`]. With group
    /// columns the result is [`Count::Grouped`], keyed by the single group
    /// column's value or by the sequence of group-column values in the order
    /// the columns were added.
    pub fn count(&self) -> Result<Count> {
        if self.groupings.is_empty() {
            let mut total = 0;
            for row in self.rows()? {
                row?;
                total += 1;
            }
            Ok(Count::Total(total))
        } else {
            let mut groups: HashMap<GroupKey, usize> = HashMap::new();
            for row in self.rows()? {
                let key = self.group_key(&row?);
                *groups.entry(key).or_insert(0) += 1;
            }
            Ok(Count::Grouped(groups))
        }
    }

    fn group_key(&self, row: &Row) -> GroupKey {
        let value = |column: &String| row.get(column).unwrap_or_default().to_string();
        match self.groupings.as_slice() {
            [single] => GroupKey::Value(value(single)),
            many => GroupKey::Values(many.iter().map(value).collect()),
        }
    }

    /// Parses one delimited line with the table's separator.
    fn parse_single_record(&self, line: &str) -> Result<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.table.separator())
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());
        let mut record = StringRecord::new();
        reader.read_record(&mut record)?;
        Ok(record.iter().map(String::from).collect())
    }
}

/// Two relations are equal when their condition, ordering, and grouping
/// sequences are equal; the table binding is not part of equality.
impl PartialEq for Relation {
    fn eq(&self, other: &Relation) -> bool {
        self.conditions == other.conditions
            && self.orderings == other.orderings
            && self.groupings == other.groupings
    }
}

impl Eq for Relation {}

/// Lazy forward stream of matching rows.
///
/// Yields `Result<Row>` in file order, testing every accumulated condition
/// against each record. The backing file handle closes when the stream is
/// dropped; an error fuses the stream.
pub struct Rows {
    table: Arc<Table>,
    conditions: Vec<Condition>,
    index: HashMap<String, usize>,
    records: csv::StringRecordsIntoIter<File>,
    done: bool,
}

impl Rows {
    fn open(relation: &Relation) -> Result<Rows> {
        let mut records = relation.table.reader()?.into_records();
        // The reader hands back the header row first; drop it.
        if let Some(header) = records.next() {
            header?;
        }
        Ok(Rows {
            table: Arc::clone(&relation.table),
            conditions: relation.conditions.clone(),
            index: relation.table.column_index(),
            records,
            done: false,
        })
    }

    fn matches(&self, record: &StringRecord) -> Result<bool> {
        for condition in &self.conditions {
            if !condition.matches(record, &self.index)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Iterator for Rows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        if self.done {
            return None;
        }
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            match self.matches(&record) {
                Ok(true) => {
                    return Some(Ok(Row::new(Arc::clone(&self.table), record.iter())));
                }
                Ok(false) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
