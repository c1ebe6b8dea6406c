//! Prefix-searchable index over book titles.
//!
//! Indexes every book regardless of publication status; visibility is a
//! catalog-store concern applied after ID resolution (see `admin`). One
//! document exists per book id — an upsert deletes the prior document and
//! adds the replacement within a single commit.

use std::cmp::Reverse;
use std::path::Path;
use std::sync::Mutex;

use tantivy::collector::TopDocs;
use tantivy::schema::{FAST, INDEXED, STORED, Schema, TEXT, TantivyDocument};
use tantivy::{DocId, Index, IndexReader, IndexWriter, Score, SegmentReader, Term};
use tracing::debug;

use crate::search::error::{Result, SearchError};
use crate::search::query::last_token_prefix_query;
use crate::search::WRITER_HEAP_SIZE;
use crate::utils::remove_punctuation;

/// Fixed result-set / page size for book search.
const PAGE_SIZE: usize = 5;

/// A book title to be indexed.
pub struct BookDocument {
    pub id: i64,
    pub title: String,
}

/// One page of ranked book ids.
///
/// `has_next_page` is a heuristic: it is true when the fetch reached the
/// requested ceiling (`page * PAGE_SIZE` results), which can report `true`
/// when exactly that many matches exist in total. `has_previous_page` is
/// exact (`page > 1`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PaginatedBookSearch {
    pub ids: Vec<i64>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

struct BookFields {
    id: tantivy::schema::Field,
    title: tantivy::schema::Field,
}

fn book_schema() -> (Schema, BookFields) {
    let mut builder = Schema::builder();
    // FAST: the id is folded into the ranking sort key at collection time.
    let id = builder.add_u64_field("id", INDEXED | STORED | FAST);
    let title = builder.add_text_field("title", TEXT | STORED);
    (builder.build(), BookFields { id, title })
}

/// Tantivy-backed index over book titles.
///
/// The writer is created once and held for the lifetime of the index;
/// mutating calls serialize on its mutex while searches run against reader
/// snapshots that observe the most recently committed state.
pub struct BookSearchIndex {
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    fields: BookFields,
}

impl BookSearchIndex {
    /// Open the index at the given directory, creating it on first use.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let (schema, fields) = book_schema();
        let index = Index::builder()
            .schema(schema)
            .create_in_dir(path)
            .or_else(|_| Index::open_in_dir(path))
            .map_err(|e| SearchError::OpenDirectory(format!("{}: {}", path.display(), e)))?;

        let writer = index.writer(WRITER_HEAP_SIZE)?;
        let reader = index.reader()?;

        debug!("Book search index ready at {}", path.display());
        Ok(Self {
            reader,
            writer: Mutex::new(writer),
            fields,
        })
    }

    /// Upsert the document for `id`, replacing any prior one, and commit.
    ///
    /// A search issued after this returns observes the new title.
    pub fn add_or_update(&self, id: i64, title: &str) -> Result<()> {
        let mut doc = TantivyDocument::new();
        doc.add_u64(self.fields.id, id as u64);
        doc.add_text(self.fields.title, title);

        let mut writer = self.writer.lock().unwrap();
        writer.delete_term(Term::from_field_u64(self.fields.id, id as u64));
        writer.add_document(doc)?;
        writer.commit()?;
        drop(writer);

        self.reader.reload()?;
        debug!("Indexed book {id}: {title:?}");
        Ok(())
    }

    /// Delete the document for `id` and commit.
    pub fn remove(&self, id: i64) -> Result<()> {
        let mut writer = self.writer.lock().unwrap();
        writer.delete_term(Term::from_field_u64(self.fields.id, id as u64));
        writer.commit()?;
        drop(writer);

        self.reader.reload()?;
        debug!("Removed book {id} from index");
        Ok(())
    }

    /// Top-5 book ids matching the term, best score first.
    pub fn search(&self, term: &str) -> Result<Vec<i64>> {
        self.ranked_search(term, PAGE_SIZE)
    }

    /// One page (fixed size 5) of ranked book ids.
    ///
    /// Fetches the top `page * 5` scored results, then slices out the
    /// requested page; ranking is stable across calls for the same term as
    /// long as the index is unchanged.
    pub fn paginated_search(&self, term: &str, page: usize) -> Result<PaginatedBookSearch> {
        let page = page.max(1);
        let ceiling = page * PAGE_SIZE;

        let ranked = self.ranked_search(term, ceiling)?;
        let fetched = ranked.len();

        let ids = ranked
            .into_iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect();

        Ok(PaginatedBookSearch {
            ids,
            has_next_page: fetched >= ceiling,
            has_previous_page: page > 1,
        })
    }

    /// Drop every document and re-add the given ones in one commit.
    ///
    /// Recovery sweep for when the index has fallen behind the catalog
    /// store; the store is re-read in full and replayed here.
    pub fn rebuild<I>(&self, docs: I) -> Result<()>
    where
        I: IntoIterator<Item = BookDocument>,
    {
        let mut writer = self.writer.lock().unwrap();
        writer.delete_all_documents()?;
        let mut count = 0u64;
        for book in docs {
            let mut doc = TantivyDocument::new();
            doc.add_u64(self.fields.id, book.id as u64);
            doc.add_text(self.fields.title, &book.title);
            writer.add_document(doc)?;
            count += 1;
        }
        writer.commit()?;
        drop(writer);

        self.reader.reload()?;
        debug!("Rebuilt book index with {count} documents");
        Ok(())
    }

    /// Total number of indexed books.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Execute the prefix query, returning up to `limit` ids ordered by
    /// score descending with id ascending as tie-break.
    ///
    /// The id is part of the collector's sort key (read from the fast
    /// field), not a post-collection sort: equal-score documents must rank
    /// the same way for every fetch ceiling, or pages sliced from
    /// different ceilings would overlap.
    fn ranked_search(&self, term: &str, limit: usize) -> Result<Vec<i64>> {
        let cleaned = remove_punctuation(term);
        let Some(query) = last_token_prefix_query(&cleaned, self.fields.title) else {
            return Ok(Vec::new());
        };

        let collector =
            TopDocs::with_limit(limit).tweak_score(move |segment_reader: &SegmentReader| {
                let ids = segment_reader
                    .fast_fields()
                    .u64("id")
                    .expect("id fast field missing from book schema");
                move |doc: DocId, score: Score| (score, Reverse(ids.first(doc).unwrap_or(0)))
            });

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &collector)?;

        Ok(top_docs
            .into_iter()
            .map(|((_score, Reverse(id)), _)| id as i64)
            .collect())
    }
}
