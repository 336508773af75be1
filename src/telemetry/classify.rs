//! Statement classification
//!
//! Two pure functions derive the aggregation keys from a statement's text:
//! [`statement_kind`] matches the leading operation keyword and
//! [`referenced_tables`] extracts the identifiers that follow the table
//! position keywords (FROM / INTO / UPDATE / JOIN). Both are total over
//! arbitrary input; anything unrecognizable falls back to
//! [`StatementKind::Unknown`] or an empty table list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation keywords, ordered by expected frequency
const KIND_KEYWORDS: [(&str, StatementKind); 7] = [
    ("SELECT", StatementKind::Select),
    ("INSERT", StatementKind::Insert),
    ("UPDATE", StatementKind::Update),
    ("DELETE", StatementKind::Delete),
    ("CREATE", StatementKind::Create),
    ("DROP", StatementKind::Drop),
    ("ALTER", StatementKind::Alter),
];

/// Keywords that position a table name immediately after them
const TABLE_KEYWORDS: [&str; 4] = ["FROM", "INTO", "UPDATE", "JOIN"];

/// Category of an instrumented statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    Unknown,
}

impl StatementKind {
    /// Canonical uppercase name, as it appears in summaries and headers
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Create => "CREATE",
            StatementKind::Drop => "DROP",
            StatementKind::Alter => "ALTER",
            StatementKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a statement by its leading keyword.
///
/// Leading whitespace is ignored and matching is case-insensitive. A
/// prefix match is enough; the keyword does not need to be followed by
/// whitespace, so `SELECTx` still classifies as SELECT.
pub fn statement_kind(description: &str) -> StatementKind {
    let head = description.trim_start();
    for (keyword, kind) in KIND_KEYWORDS {
        if starts_with_ignore_case(head, keyword) {
            return kind;
        }
    }
    StatementKind::Unknown
}

/// Extract the table names referenced by a statement.
///
/// Every identifier (`[A-Za-z_][A-Za-z0-9_]*`) that follows one of FROM,
/// INTO, UPDATE or JOIN (case-insensitive, separated by at least one
/// whitespace character) is collected. Duplicates are collapsed, first
/// occurrence order is preserved, and a statement may reference zero, one
/// or several tables.
pub fn referenced_tables(description: &str) -> Vec<String> {
    let bytes = description.as_bytes();
    let mut tables: Vec<String> = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(keyword_len) = match_table_keyword(bytes, pos) else {
            pos += 1;
            continue;
        };

        // At least one whitespace byte must separate keyword and name
        let mut cursor = pos + keyword_len;
        let ws_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor == ws_start {
            pos += keyword_len;
            continue;
        }

        if let Some(name) = parse_identifier(bytes, cursor) {
            pos = cursor + name.len();
            if !tables.iter().any(|t| t == &name) {
                tables.push(name);
            }
        } else {
            pos += keyword_len;
        }
    }

    tables
}

/// Match one of the table keywords at `pos`, returning its length
fn match_table_keyword(bytes: &[u8], pos: usize) -> Option<usize> {
    for keyword in TABLE_KEYWORDS {
        let kw = keyword.as_bytes();
        let end = pos + kw.len();
        if end <= bytes.len() && bytes[pos..end].eq_ignore_ascii_case(kw) {
            return Some(kw.len());
        }
    }
    None
}

/// Parse an identifier starting at `pos`, if one begins there
fn parse_identifier(bytes: &[u8], pos: usize) -> Option<String> {
    let first = *bytes.get(pos)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }

    let mut end = pos + 1;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        end += 1;
    }

    // Identifier bytes are ASCII, so this cannot fail
    String::from_utf8(bytes[pos..end].to_vec()).ok()
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let text = text.as_bytes();
    let prefix = prefix.as_bytes();
    text.len() >= prefix.len() && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_kind_of_common_statements() {
        assert_eq!(
            statement_kind("SELECT * FROM articles"),
            StatementKind::Select
        );
        assert_eq!(
            statement_kind("insert into tags (name) values (?)"),
            StatementKind::Insert
        );
        assert_eq!(
            statement_kind("  UPDATE articles SET title = ?"),
            StatementKind::Update
        );
        assert_eq!(
            statement_kind("\n\tdelete from comments"),
            StatementKind::Delete
        );
        assert_eq!(statement_kind("CREATE TABLE t (id int)"), StatementKind::Create);
        assert_eq!(statement_kind("drop table t"), StatementKind::Drop);
        assert_eq!(statement_kind("Alter Table t add c int"), StatementKind::Alter);
    }

    #[test]
    fn test_kind_falls_back_to_unknown() {
        assert_eq!(statement_kind(""), StatementKind::Unknown);
        assert_eq!(statement_kind("   "), StatementKind::Unknown);
        assert_eq!(statement_kind("EXPLAIN SELECT 1"), StatementKind::Unknown);
        assert_eq!(statement_kind("-- comment"), StatementKind::Unknown);
        assert_eq!(statement_kind("不是SQL"), StatementKind::Unknown);
    }

    #[test]
    fn test_kind_matches_by_prefix() {
        // No word boundary required after the keyword
        assert_eq!(statement_kind("SELECT*FROM t"), StatementKind::Select);
    }

    #[test]
    fn test_tables_from_simple_select() {
        assert_eq!(referenced_tables("SELECT * FROM articles"), vec!["articles"]);
    }

    #[test]
    fn test_tables_from_join() {
        let sql = "SELECT a.id FROM articles a JOIN article_tags at ON a.id = at.article_id";
        assert_eq!(referenced_tables(sql), vec!["articles", "article_tags"]);
    }

    #[test]
    fn test_tables_from_insert_and_update() {
        assert_eq!(
            referenced_tables("INSERT INTO email_subscribers (email) VALUES (?)"),
            vec!["email_subscribers"]
        );
        assert_eq!(
            referenced_tables("UPDATE categories SET name = ? WHERE id = ?"),
            vec!["categories"]
        );
    }

    #[test]
    fn test_tables_are_deduplicated() {
        let sql = "SELECT * FROM articles WHERE id IN (SELECT article_id FROM articles)";
        assert_eq!(referenced_tables(sql), vec!["articles"]);
    }

    #[test]
    fn test_tables_case_insensitive_keywords() {
        assert_eq!(referenced_tables("select id from Tags"), vec!["Tags"]);
    }

    #[test]
    fn test_tables_empty_for_malformed_input() {
        assert!(referenced_tables("").is_empty());
        assert!(referenced_tables("FROM").is_empty());
        assert!(referenced_tables("FROM 123abc").is_empty());
        assert!(referenced_tables("SELECT 1").is_empty());
    }

    #[test]
    fn test_tables_require_whitespace_after_keyword() {
        assert!(referenced_tables("FROMarticles").is_empty());
        assert_eq!(referenced_tables("FROM\n\tarticles"), vec!["articles"]);
    }

    proptest! {
        #[test]
        fn prop_classification_never_panics(input in "\\PC*") {
            let _ = statement_kind(&input);
            let _ = referenced_tables(&input);
        }

        #[test]
        fn prop_tables_have_no_duplicates(input in "\\PC*") {
            let tables = referenced_tables(&input);
            let mut deduped = tables.clone();
            deduped.sort();
            deduped.dedup();
            prop_assert_eq!(tables.len(), deduped.len());
        }
    }
}
