//! End-to-end tests over real on-disk tables.

use std::io::Write;
use std::sync::Arc;

use flatrel::{Dir, Error, GroupKey, Row, Table};

// ============================================================================
// Fixtures
// ============================================================================

fn table_from(contents: &str) -> (tempfile::NamedTempFile, Arc<Table>) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    let table = Table::open(file.path()).unwrap();
    (file, table)
}

fn users() -> (tempfile::NamedTempFile, Arc<Table>) {
    table_from("id\tname\tage\n1\tksss\t30\n2\tfoo\t25\n3\tbar\t30\n")
}

fn ids(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|r| r.get("id").unwrap().to_string())
        .collect()
}

// ============================================================================
// The reference scenario
// ============================================================================

#[test]
fn where_age_thirty_counts_two() {
    let (_file, table) = users();
    assert_eq!(table.all().filter([("age", 30)]).count().unwrap(), 2usize);
}

#[test]
fn ordered_first_breaks_ties_with_the_next_term() {
    let (_file, table) = users();

    let first = table
        .all()
        .order_by("age", Dir::Desc)
        .order("id")
        .first()
        .unwrap()
        .unwrap();
    assert_eq!(first.get("id"), Some("1"));

    // With only the age term, the tie keeps file-encountered order.
    let first = table
        .all()
        .order_by("age", Dir::Desc)
        .first()
        .unwrap()
        .unwrap();
    assert_eq!(first.get("id"), Some("1"));
}

#[test]
fn unconditioned_last_is_the_final_row() {
    let (_file, table) = users();
    let last = table.all().last().unwrap().unwrap();
    assert_eq!(last.get("id"), Some("3"));
}

#[test]
fn group_by_age_counts_per_value() {
    let (_file, table) = users();
    let count = table.all().group("age").count().unwrap();
    let groups = count.groups().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[&GroupKey::from("30")], 2);
    assert_eq!(groups[&GroupKey::from("25")], 1);
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn filter_returns_exactly_the_matching_subset() {
    let (_file, table) = users();
    let all = table.all().to_vec().unwrap();
    let thirty = table.all().filter([("age", "30")]).to_vec().unwrap();

    for row in &thirty {
        assert!(all.contains(row));
        assert_eq!(row.get("age"), Some("30"));
    }
    for row in &all {
        if row.get("age") == Some("30") {
            assert!(thirty.contains(row));
        }
    }
}

#[test]
fn chaining_restricts_and_never_expands() {
    let (_file, table) = users();
    let base = table.all().filter([("age", "30")]);
    let narrowed = base.filter([("name", "ksss")]);

    let base_rows = base.to_vec().unwrap();
    let narrowed_rows = narrowed.to_vec().unwrap();

    assert!(narrowed_rows.len() <= base_rows.len());
    for row in &narrowed_rows {
        assert!(base_rows.contains(row));
    }
    assert_eq!(ids(&narrowed_rows), ["1"]);
}

#[test]
fn one_clause_may_test_several_columns() {
    let (_file, table) = users();
    let rows = table
        .all()
        .filter([("age", "30"), ("name", "bar")])
        .to_vec()
        .unwrap();
    assert_eq!(ids(&rows), ["3"]);
}

#[test]
fn negated_rows_are_disjoint_from_the_unnegated_filter() {
    let (_file, table) = users();
    let matched = table.all().filter([("age", "30")]).to_vec().unwrap();
    let negated = table
        .all()
        .where_chain()
        .not([("age", "30")])
        .to_vec()
        .unwrap();

    for row in &negated {
        assert!(!matched.contains(row));
        assert_ne!(row.get("age"), Some("30"));
    }
    assert_eq!(matched.len() + negated.len(), 3);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn sorted_output_is_consistent_and_idempotent() {
    let (_file, table) = users();
    let rel = table.all().order_by("age", Dir::Desc).order("name");
    let rows = rel.to_vec().unwrap();

    for pair in rows.windows(2) {
        let ordering = flatrel::compare_rows(&pair[0], &pair[1], rel.orderings());
        assert_ne!(ordering, std::cmp::Ordering::Greater);
    }

    let mut resorted = rows.clone();
    resorted.sort_by(|a, b| flatrel::compare_rows(a, b, rel.orderings()));
    assert_eq!(rows, resorted);
}

#[test]
fn direction_tokens_parse_case_insensitively() {
    let (_file, table) = users();
    let dir: Dir = "DESC".parse().unwrap();
    let rows = table.all().order_by("id", dir).to_vec().unwrap();
    assert_eq!(ids(&rows), ["3", "2", "1"]);
}

#[test]
fn invalid_direction_token_fails_before_any_query_runs() {
    let err = "sideways".parse::<Dir>().unwrap_err();
    assert!(matches!(err, Error::InvalidDirection { .. }));
    assert_eq!(
        err.to_string(),
        "direction \"sideways\" is invalid; valid directions are: asc, desc"
    );
}

#[test]
fn ordering_does_not_change_count_structure() {
    let (_file, table) = users();
    let plain = table.all().group("age").count().unwrap();
    let ordered = table
        .all()
        .order_by("name", Dir::Desc)
        .group("age")
        .count()
        .unwrap();
    assert_eq!(plain, ordered);
}

// ============================================================================
// first / take / exists
// ============================================================================

#[test]
fn first_agrees_with_take_one() {
    let (_file, table) = users();

    let unordered = table.all().filter([("age", "30")]);
    assert_eq!(
        unordered.first().unwrap(),
        unordered.take(1).unwrap().into_iter().next()
    );

    let ordered = table.all().order_by("age", Dir::Desc).order("id");
    assert_eq!(
        ordered.first().unwrap(),
        ordered.take(1).unwrap().into_iter().next()
    );
}

#[test]
fn exists_is_first_is_some() {
    let (_file, table) = users();
    assert!(table.all().exists().unwrap());
    assert!(!table.all().filter([("name", "nobody")]).exists().unwrap());
}

// ============================================================================
// last: optimized vs naive
// ============================================================================

#[test]
fn optimized_last_agrees_with_full_materialization() {
    let (_file, table) = users();
    let fast = table.all().last().unwrap();
    let naive = table.all().to_vec().unwrap().pop();
    assert_eq!(fast, naive);
}

#[test]
fn last_without_trailing_newline() {
    let (_file, table) = table_from("id\tname\n1\tksss\n2\tfoo");
    let last = table.all().last().unwrap().unwrap();
    assert_eq!(last.get("name"), Some("foo"));
}

#[test]
fn last_on_filtered_or_ordered_relations_materializes() {
    let (_file, table) = users();

    let last = table.all().filter([("age", "30")]).last().unwrap().unwrap();
    assert_eq!(last.get("id"), Some("3"));

    let last = table.all().order_by("age", Dir::Desc).last().unwrap().unwrap();
    assert_eq!(last.get("age"), Some("25"));
}

// ============================================================================
// Empty and degenerate tables
// ============================================================================

#[test]
fn header_only_table_yields_absent_results() {
    let (_file, table) = table_from("id\tname\tage\n");

    assert!(table.all().first().unwrap().is_none());
    assert!(table.all().last().unwrap().is_none());
    assert!(!table.all().exists().unwrap());
    assert_eq!(table.all().count().unwrap(), 0usize);
    assert!(table.all().to_vec().unwrap().is_empty());
}

#[test]
fn no_match_is_empty_not_an_error() {
    let (_file, table) = users();
    let rel = table.all().filter([("age", "99")]);
    assert!(rel.to_vec().unwrap().is_empty());
    assert!(rel.first().unwrap().is_none());
    assert!(rel.last().unwrap().is_none());
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn group_sizes_sum_to_the_total() {
    let (_file, table) = users();
    let total = table.all().count().unwrap().total().unwrap();
    let count = table.all().group("age").count().unwrap();
    let summed: usize = count.groups().unwrap().values().sum();
    assert_eq!(summed, total);
}

#[test]
fn grouping_partitions_the_filtered_set_only() {
    let (_file, table) = users();
    let count = table
        .all()
        .filter([("age", "30")])
        .group("name")
        .count()
        .unwrap();
    let groups = count.groups().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[&GroupKey::from("ksss")], 1);
    assert_eq!(groups[&GroupKey::from("bar")], 1);
}

#[test]
fn composite_group_keys_follow_insertion_order() {
    let (_file, table) = users();
    let count = table.all().group("age").group("name").count().unwrap();
    let groups = count.groups().unwrap();
    assert!(groups.contains_key(&GroupKey::from(vec![
        "30".to_string(),
        "ksss".to_string()
    ])));
    assert!(!groups.contains_key(&GroupKey::from(vec![
        "ksss".to_string(),
        "30".to_string()
    ])));
}

// ============================================================================
// Alternate separators
// ============================================================================

#[test]
fn comma_separated_tables_work_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"sku,price\nA1,300\nB2,150\nC3,300\n")
        .unwrap();
    let table = Table::open_with_separator(file.path(), b',').unwrap();

    assert_eq!(table.all().filter([("price", 300)]).count().unwrap(), 2usize);
    let last = table.all().last().unwrap().unwrap();
    assert_eq!(last.get("sku"), Some("C3"));
}

// ============================================================================
// Rows as values
// ============================================================================

#[test]
fn rows_built_from_pairs_validate_names() {
    let (_file, table) = users();

    let row = Row::from_pairs(Arc::clone(&table), [("name", "zed"), ("age", "41")]).unwrap();
    assert_eq!(row.get("id"), None);
    assert_eq!(row.get("name"), Some("zed"));

    let err = Row::from_pairs(table, [("height", "180")]).unwrap_err();
    assert!(matches!(err, Error::UnknownAttribute { .. }));
}

#[test]
fn streamed_rows_equal_their_rebuilt_values() {
    let (_file, table) = users();
    let streamed = table.all().first().unwrap().unwrap();
    let rebuilt = Row::new(Arc::clone(&table), ["1", "ksss", "30"]);
    assert_eq!(streamed, rebuilt);
}
