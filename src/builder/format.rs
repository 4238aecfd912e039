//! Statement formatter
//!
//! Assembles clause items into one statement:
//!
//! ```text
//! SELECT
//! 	a,
//! 	b
//! FROM
//! 	t1
//! WHERE
//! 	x > 1 AND
//! 	y < 2
//! GROUP BY
//! 	a
//! ORDER BY
//! 	b
//! LIMIT 100;
//! ```

const LIST_SEPARATOR: &str = ",\n\t";
const WHERE_SEPARATOR: &str = " AND\n\t";

/// Format a statement from clause items.
///
/// Optional clauses are left out entirely when their items are empty or
/// absent. SELECT and FROM are always present, and an empty list leaves no
/// indentation behind. The statement always ends with `;`.
pub fn format_query(
    select_args: &[String],
    from_args: &[String],
    where_args: Option<&[String]>,
    group_by_args: Option<&[String]>,
    order_by_args: Option<&[String]>,
    row_limit: Option<u64>,
) -> String {
    let mut sections = vec![
        section("SELECT", select_args, LIST_SEPARATOR),
        section("FROM", from_args, LIST_SEPARATOR),
    ];

    if let Some(args) = where_args.filter(|a| !a.is_empty()) {
        sections.push(section("WHERE", args, WHERE_SEPARATOR));
    }
    if let Some(args) = group_by_args.filter(|a| !a.is_empty()) {
        sections.push(section("GROUP BY", args, LIST_SEPARATOR));
    }
    if let Some(args) = order_by_args.filter(|a| !a.is_empty()) {
        sections.push(section("ORDER BY", args, LIST_SEPARATOR));
    }
    if let Some(limit) = row_limit {
        sections.push(format!("LIMIT {}", limit));
    }

    format!("{};", sections.join("\n"))
}

/// An empty SELECT or FROM list leaves the bare keyword on its line
fn section(keyword: &str, args: &[String], separator: &str) -> String {
    if args.is_empty() {
        return keyword.to_string();
    }
    format!("{}\n\t{}", keyword, args.join(separator))
}
