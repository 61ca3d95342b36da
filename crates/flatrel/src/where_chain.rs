//! Deferred negation for the two-call filter-not syntax.

use crate::condition::Condition;
use crate::relation::Relation;

/// A one-shot helper capturing "the next condition is negated".
///
/// Obtained from [`Relation::where_chain`]; consuming it with [`not`]
/// appends a not-equal clause to the branch it wraps. It supports no other
/// operation.
///
/// [`not`]: WhereChain::not
///
/// # Example
///
/// ```no_run
/// use flatrel::Table;
///
/// # fn main() -> flatrel::Result<()> {
/// let users = Table::open("data/users.tsv")?;
/// let others = users.all().where_chain().not([("age", "30")]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WhereChain {
    relation: Relation,
}

impl WhereChain {
    pub(crate) fn new(relation: Relation) -> Self {
        WhereChain { relation }
    }

    /// Finalizes the pending negation.
    ///
    /// Appends a not-equal clause over the given column/value pairs and
    /// returns the refined relation.
    pub fn not<I, K, V>(self, pairs: I) -> Relation
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.relation.push_condition(Condition::not_equal(pairs))
    }
}
