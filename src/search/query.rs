//! Query construction for "search-as-you-type" lookups.
//!
//! A raw user-typed string becomes a boolean query in which every token
//! except the last must match a complete indexed term, while the last
//! (possibly still being typed) token matches as a prefix. Typing
//! "jane doe" therefore requires a term "jane" and any term starting with
//! "doe".

use tantivy::Term;
use tantivy::query::{BooleanQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption};

/// Build a last-token-prefix query against a single text field.
///
/// Tokens are lowercased and split on whitespace; empty tokens are dropped.
/// Returns `None` when the input yields no tokens — callers treat that as
/// "matches nothing" rather than executing an empty query.
pub fn last_token_prefix_query(term: &str, field: Field) -> Option<BooleanQuery> {
    let clauses = prefix_clauses(term, field)?;
    Some(BooleanQuery::new(clauses))
}

/// Build a last-token-prefix query across several fields, OR-combined.
///
/// Each field independently gets the full last-token-prefix treatment; a
/// document matches when any one field satisfies its query. Used by the
/// author index to search full name and pseudonym together.
pub fn multi_field_prefix_query(term: &str, fields: &[Field]) -> Option<BooleanQuery> {
    let mut field_queries: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(fields.len());
    for &field in fields {
        let clauses = prefix_clauses(term, field)?;
        field_queries.push((Occur::Should, Box::new(BooleanQuery::new(clauses))));
    }
    if field_queries.is_empty() {
        return None;
    }
    Some(BooleanQuery::new(field_queries))
}

fn prefix_clauses(term: &str, field: Field) -> Option<Vec<(Occur, Box<dyn Query>)>> {
    let normalized = term.to_lowercase();
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let (last, head) = tokens.split_last()?;

    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(tokens.len());
    for token in head {
        let term = Term::from_field_text(field, token);
        clauses.push((
            Occur::Must,
            Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
        ));
    }

    // Distance-0 prefix matching: any indexed term starting with the token.
    let last_term = Term::from_field_text(field, last);
    clauses.push((
        Occur::Must,
        Box::new(FuzzyTermQuery::new_prefix(last_term, 0, true)),
    ));

    Some(clauses)
}
