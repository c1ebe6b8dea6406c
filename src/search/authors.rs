//! Prefix-searchable index over author names.
//!
//! Same shape as the book title index, but a query runs against two fields
//! (full name and pseudonym) OR-combined: a match in either counts. Results
//! carry a display name derived from whichever of the two stored fields is
//! populated. Fixed top-20 cutoff, no pagination.

use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;
use tantivy::collector::TopDocs;
use tantivy::schema::{INDEXED, STORED, Schema, TEXT, TantivyDocument, Value};
use tantivy::{Index, IndexReader, IndexWriter, Term};
use tracing::debug;

use crate::search::WRITER_HEAP_SIZE;
use crate::search::error::{Result, SearchError};
use crate::search::query::multi_field_prefix_query;
use crate::utils::display_name;

/// Fixed result-set cutoff for author search.
const SEARCH_LIMIT: usize = 20;

/// An author's names to be indexed. Either field may be empty; the index
/// stores whatever it is given.
pub struct AuthorDocument {
    pub id: i64,
    pub full_name: String,
    pub pseudonym: String,
}

/// An author search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorHit {
    pub id: i64,
    pub display_name: String,
}

struct AuthorFields {
    id: tantivy::schema::Field,
    full_name: tantivy::schema::Field,
    pseudonym: tantivy::schema::Field,
}

fn author_schema() -> (Schema, AuthorFields) {
    let mut builder = Schema::builder();
    let id = builder.add_u64_field("id", INDEXED | STORED);
    let full_name = builder.add_text_field("full_name", TEXT | STORED);
    let pseudonym = builder.add_text_field("pseudonym", TEXT | STORED);
    (
        builder.build(),
        AuthorFields {
            id,
            full_name,
            pseudonym,
        },
    )
}

/// Tantivy-backed index over author names.
pub struct AuthorSearchIndex {
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    fields: AuthorFields,
}

impl AuthorSearchIndex {
    /// Open the index at the given directory, creating it on first use.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let (schema, fields) = author_schema();
        let index = Index::builder()
            .schema(schema)
            .create_in_dir(path)
            .or_else(|_| Index::open_in_dir(path))
            .map_err(|e| SearchError::OpenDirectory(format!("{}: {}", path.display(), e)))?;

        let writer = index.writer(WRITER_HEAP_SIZE)?;
        let reader = index.reader()?;

        debug!("Author search index ready at {}", path.display());
        Ok(Self {
            reader,
            writer: Mutex::new(writer),
            fields,
        })
    }

    /// Upsert the document for `id` with both name fields, and commit.
    pub fn add_or_update(&self, id: i64, full_name: &str, pseudonym: &str) -> Result<()> {
        let mut doc = TantivyDocument::new();
        doc.add_u64(self.fields.id, id as u64);
        doc.add_text(self.fields.full_name, full_name);
        doc.add_text(self.fields.pseudonym, pseudonym);

        let mut writer = self.writer.lock().unwrap();
        writer.delete_term(Term::from_field_u64(self.fields.id, id as u64));
        writer.add_document(doc)?;
        writer.commit()?;
        drop(writer);

        self.reader.reload()?;
        debug!("Indexed author {id}: {full_name:?} / {pseudonym:?}");
        Ok(())
    }

    /// Delete the document for `id` and commit.
    pub fn remove(&self, id: i64) -> Result<()> {
        let mut writer = self.writer.lock().unwrap();
        writer.delete_term(Term::from_field_u64(self.fields.id, id as u64));
        writer.commit()?;
        drop(writer);

        self.reader.reload()?;
        debug!("Removed author {id} from index");
        Ok(())
    }

    /// Top-20 authors whose full name or pseudonym matches the term.
    pub fn search(&self, term: &str) -> Result<Vec<AuthorHit>> {
        let search_fields = [self.fields.full_name, self.fields.pseudonym];
        let Some(query) = multi_field_prefix_query(term, &search_fields) else {
            return Ok(Vec::new());
        };

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(SEARCH_LIMIT))?;

        let mut scored = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            let id = get_u64(&doc, self.fields.id) as i64;
            let full_name = get_text(&doc, self.fields.full_name);
            let pseudonym = get_text(&doc, self.fields.pseudonym);
            scored.push((
                score,
                AuthorHit {
                    id,
                    display_name: display_name(&full_name, &pseudonym),
                },
            ));
        }

        // Score descending, id ascending on ties, for deterministic ordering.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
        Ok(scored.into_iter().map(|(_, hit)| hit).collect())
    }

    /// Drop every document and re-add the given ones in one commit.
    pub fn rebuild<I>(&self, docs: I) -> Result<()>
    where
        I: IntoIterator<Item = AuthorDocument>,
    {
        let mut writer = self.writer.lock().unwrap();
        writer.delete_all_documents()?;
        let mut count = 0u64;
        for author in docs {
            let mut doc = TantivyDocument::new();
            doc.add_u64(self.fields.id, author.id as u64);
            doc.add_text(self.fields.full_name, &author.full_name);
            doc.add_text(self.fields.pseudonym, &author.pseudonym);
            writer.add_document(doc)?;
            count += 1;
        }
        writer.commit()?;
        drop(writer);

        self.reader.reload()?;
        debug!("Rebuilt author index with {count} documents");
        Ok(())
    }

    /// Total number of indexed authors.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}

fn get_text(doc: &TantivyDocument, field: tantivy::schema::Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_default()
}

fn get_u64(doc: &TantivyDocument, field: tantivy::schema::Field) -> u64 {
    doc.get_first(field).and_then(|v| v.as_u64()).unwrap_or(0)
}
