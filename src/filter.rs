use sea_orm::{
    Condition, DatabaseBackend,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};

use crate::entity::composition::Column;

// Basic safety limit
const MAX_SEARCH_QUERY_LENGTH: usize = 1_000;

/// Escape LIKE wildcards so user text matches literally
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Name of the text type a number is cast to before substring matching
fn text_type(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::MySql => "CHAR",
        _ => "TEXT",
    }
}

/// `expr LIKE '%needle%'`, with the needle's wildcards escaped.
fn contains(expr: SimpleExpr, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(needle));
    Expr::expr(expr).like(LikeExpr::new(pattern).escape('\\'))
}

/// Build the free-text condition of a list request.
///
/// Keeps rows whose calorie count, rendered as text, contains the query, or
/// whose name contains it ignoring case.
///
/// SQLite's `LOWER` and `UPPER` fold ASCII letters only, so the name is
/// compared under both foldings, plus an ASCII-only folding of the query. A
/// name with upper-case non-ASCII letters then still matches its own text in
/// either case.
#[must_use]
pub fn build_query_condition(query: &str, backend: DatabaseBackend) -> Condition {
    let needle: String = query.chars().take(MAX_SEARCH_QUERY_LENGTH).collect();
    let lower = needle.to_lowercase();
    tracing::debug!(%needle, "building composition text filter");

    let calories_text = Expr::col(Column::Calories).cast_as(Alias::new(text_type(backend)));
    let mut condition = Condition::any()
        .add(contains(calories_text, &needle))
        .add(contains(Func::lower(Expr::col(Column::Name)).into(), &lower))
        .add(contains(Func::upper(Expr::col(Column::Name)).into(), &needle.to_uppercase()));

    let ascii_lower = needle.to_ascii_lowercase();
    if ascii_lower != lower {
        condition = condition.add(contains(Func::lower(Expr::col(Column::Name)).into(), &ascii_lower));
    }
    condition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::composition::Entity;
    use sea_orm::{EntityTrait, QueryFilter, QueryTrait};

    fn sqlite_sql(query: &str) -> String {
        Entity::find()
            .filter(build_query_condition(query, DatabaseBackend::Sqlite))
            .build(DatabaseBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_condition_matches_name_or_calories() {
        let sql = sqlite_sql("Soup");
        assert!(sql.contains("LOWER("), "name should be lower-cased: {sql}");
        assert!(sql.contains("CAST("), "calories should be cast to text: {sql}");
        assert!(sql.contains(" OR "), "fields should be alternatives: {sql}");
        assert!(sql.contains("'%soup%'"), "query should be lower-cased: {sql}");
        assert!(sql.contains("'%SOUP%'"), "query should be upper-cased: {sql}");
    }

    #[test]
    fn test_mysql_casts_to_char() {
        let sql = Entity::find()
            .filter(build_query_condition("12", DatabaseBackend::MySql))
            .build(DatabaseBackend::MySql)
            .to_string();
        assert!(sql.contains("AS CHAR"), "{sql}");
    }

    #[test]
    fn test_wildcard_escaping() {
        assert_eq!(escape_like_wildcards("soup"), "soup");
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("a_b"), "a\\_b");
        assert_eq!(escape_like_wildcards("\\"), "\\\\");
    }

    #[test]
    fn test_quotes_do_not_break_out_of_literal() {
        let sql = sqlite_sql("' OR '1'='1");
        assert!(sql.contains("''"), "single quotes should be escaped: {sql}");
    }

    #[test]
    fn test_long_queries_are_truncated() {
        let sql = sqlite_sql(&"a".repeat(5_000));
        assert!(!sql.contains(&"a".repeat(MAX_SEARCH_QUERY_LENGTH + 1)));
    }
}
