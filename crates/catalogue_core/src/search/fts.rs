//! SQLite FTS5-based product search.
//!
//! # Responsibility
//! - Turn free text into a safe FTS5 match expression.
//! - Return matching product documents in index rank order.
//!
//! # Invariants
//! - User text is never passed to FTS5 as raw syntax.
//! - A document matches when any of the query terms matches (text-index semantics).
//! - Ordering is deterministic by rank, then storage order.

use crate::model::product::Product;
use crate::store::{StoreError, StoreResult};
use rusqlite::{params, Connection, Row};

const SEARCH_SQL: &str = "SELECT products.document AS document
     FROM products_fts
     JOIN products ON products.seq = products_fts.rowid
     WHERE products_fts MATCH ?1
     ORDER BY bm25(products_fts), products.seq ASC";

/// Searches product name and description via FTS5.
///
/// Returns an empty list for blank text.
pub fn search_products(conn: &Connection, text: &str) -> StoreResult<Vec<Product>> {
    let Some(match_expr) = build_match_expression(text) else {
        return Ok(Vec::new());
    };

    let mut stmt = conn.prepare(SEARCH_SQL)?;
    let mut rows = stmt
        .query(params![match_expr.as_str()])
        .map_err(|err| map_query_error(err, &match_expr))?;
    let mut products = Vec::new();

    while let Some(row) = rows
        .next()
        .map_err(|err| map_query_error(err, &match_expr))?
    {
        products.push(parse_document_row(row)?);
    }

    Ok(products)
}

/// Decodes the `document` column of a product row.
pub(crate) fn parse_document_row(row: &Row<'_>) -> StoreResult<Product> {
    let document: String = row.get("document")?;
    serde_json::from_str(&document)
        .map_err(|err| StoreError::InvalidData(format!("products.document: {err}")))
}

/// Builds an FTS5 expression matching any whitespace-separated term.
pub fn build_match_expression(text: &str) -> Option<String> {
    let terms = text
        .split_whitespace()
        .map(escape_fts_term)
        .collect::<Vec<_>>();

    if terms.is_empty() {
        return None;
    }

    Some(terms.join(" OR "))
}

fn escape_fts_term(raw: &str) -> String {
    let escaped = raw.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

fn map_query_error(err: rusqlite::Error, query: &str) -> StoreError {
    if is_match_syntax_error(&err) {
        return StoreError::InvalidQuery {
            query: query.to_string(),
            message: err.to_string(),
        };
    }

    StoreError::from(err)
}

fn is_match_syntax_error(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            let msg = message.to_lowercase();
            (msg.contains("fts5") && msg.contains("syntax"))
                || msg.contains("malformed match expression")
                || msg.contains("unterminated")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::build_match_expression;

    #[test]
    fn blank_text_has_no_expression() {
        assert_eq!(build_match_expression(""), None);
        assert_eq!(build_match_expression(" \t "), None);
    }

    #[test]
    fn terms_are_quoted_and_joined_with_or() {
        assert_eq!(
            build_match_expression("red  robot").as_deref(),
            Some("\"red\" OR \"robot\"")
        );
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(
            build_match_expression("say\"hi").as_deref(),
            Some("\"say\"\"hi\"")
        );
    }
}
