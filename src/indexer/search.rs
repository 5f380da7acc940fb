use crate::catalog::{CourseRecord, TermKey};
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::indexer::query::prefix_terms;
use crate::indexer::schema::CourseSchema;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tantivy::collector::{DocSetCollector, TopDocs};
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::{doc, DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, Term};
use tracing::{debug, info, warn};

/// What to do with an index partition that already holds documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildPolicy {
    /// Build only if the partition is empty; otherwise serve it as-is, even if
    /// the course files changed since it was written.
    #[default]
    ReuseExisting,
    /// Delete every document and index the current records again
    Rebuild,
}

#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub policy: BuildPolicy,
    pub writer_memory_bytes: usize,
    pub max_prefix_expansions: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            policy: BuildPolicy::ReuseExisting,
            writer_memory_bytes: 50_000_000,
            max_prefix_expansions: 10_000,
        }
    }
}

impl From<&SearchConfig> for IndexOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            policy: if config.rebuild_on_start {
                BuildPolicy::Rebuild
            } else {
                BuildPolicy::ReuseExisting
            },
            writer_memory_bytes: config.writer_memory_bytes,
            max_prefix_expansions: config.max_prefix_expansions,
        }
    }
}

/// How a partition came to be ready for serving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Reused { documents: u64 },
    Built { indexed: usize, skipped: usize },
}

/// Full-text index over one term's courses
pub struct TermIndex {
    term: TermKey,
    index: Index,
    reader: IndexReader,
    schema: CourseSchema,
    max_prefix_expansions: usize,
}

impl TermIndex {
    /// Open the partition at `index_path`, populating it from `courses` when the
    /// build policy asks for it.
    pub fn open_or_build(
        index_path: impl AsRef<Path>,
        term: TermKey,
        courses: &[CourseRecord],
        options: &IndexOptions,
    ) -> Result<(Self, BuildOutcome)> {
        let path = index_path.as_ref();
        std::fs::create_dir_all(path)?;

        let index = if path.join("meta.json").exists() {
            Index::open_in_dir(path)
                .map_err(|e| Error::Search(format!("Failed to open index for {term}: {e}")))?
        } else {
            Index::create_in_dir(path, CourseSchema::new().schema)
                .map_err(|e| Error::Search(format!("Failed to create index for {term}: {e}")))?
        };
        let schema = CourseSchema::from_schema(index.schema())?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| Error::Search(format!("Failed to create reader: {e}")))?;

        let term_index = Self {
            term,
            index,
            reader,
            schema,
            max_prefix_expansions: options.max_prefix_expansions,
        };

        let existing = term_index.num_docs();
        let outcome = if existing > 0 && options.policy == BuildPolicy::ReuseExisting {
            info!(
                "Reusing index for {} at {:?} ({} documents)",
                term_index.term, path, existing
            );
            BuildOutcome::Reused {
                documents: existing,
            }
        } else {
            term_index.populate(courses, options.writer_memory_bytes)?
        };

        Ok((term_index, outcome))
    }

    pub fn term(&self) -> &TermKey {
        &self.term
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Replace the partition's contents with one document per course code
    fn populate(&self, courses: &[CourseRecord], writer_memory_bytes: usize) -> Result<BuildOutcome> {
        let mut writer: IndexWriter = self
            .index
            .writer(writer_memory_bytes)
            .map_err(|e| Error::Search(format!("Failed to create writer: {e}")))?;
        writer.delete_all_documents()?;

        // Last record per code wins, as in the graph builder
        let winners: HashMap<&str, usize> = courses
            .iter()
            .enumerate()
            .map(|(position, course)| (course.code.as_str(), position))
            .collect();
        let mut indexed = 0;
        let mut skipped = 0;

        for (position, course) in courses.iter().enumerate() {
            if winners.get(course.code.as_str()) != Some(&position) {
                warn!(
                    "Duplicate course code {} in {}, keeping the last record",
                    course.code, self.term
                );
                skipped += 1;
                continue;
            }

            let json_data = match serde_json::to_string(course) {
                Ok(json) => json,
                Err(e) => {
                    warn!("Skipping course {} in {}: {}", course.code, self.term, e);
                    skipped += 1;
                    continue;
                }
            };

            writer.add_document(doc!(
                self.schema.code => course.code.clone(),
                self.schema.code_with_space => course.code_with_space.clone(),
                self.schema.name => course.name.clone(),
                self.schema.description => course.description.clone(),
                self.schema.instructors => course.instructor_names(),
                self.schema.code_exact => course.code.clone(),
                self.schema.code_with_space_exact => course.code_with_space.clone(),
                self.schema.json_data => json_data,
            ))?;
            indexed += 1;
        }

        writer
            .commit()
            .map_err(|e| Error::Search(format!("Failed to commit: {e}")))?;
        self.reader.reload()?;

        info!(
            "Built index for {}: {} indexed, {} skipped",
            self.term, indexed, skipped
        );

        Ok(BuildOutcome::Built { indexed, skipped })
    }

    /// Ranked prefix search.
    ///
    /// Every whitespace-separated word must prefix-match a term in some indexed
    /// field. Courses whose code or spaced code equals the trimmed phrase come
    /// first, the rest follow by descending BM25 score.
    pub fn search(&self, phrase: &str, page_size: usize, offset: usize) -> Result<Vec<CourseRecord>> {
        let phrase = phrase.trim();
        if phrase.is_empty() || page_size == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();
        let num_docs = searcher.num_docs() as usize;
        if num_docs == 0 {
            return Ok(Vec::new());
        }

        let mut analyzer = self.index.tokenizer_for_field(self.schema.name)?;
        let Some(prefixes) = prefix_terms(&mut analyzer, phrase) else {
            debug!("Unmatchable word in {:?} for {}", phrase, self.term);
            return Ok(Vec::new());
        };
        if prefixes.is_empty() {
            return Ok(Vec::new());
        }

        let Some(query) = self.prefix_query(&searcher, &prefixes)? else {
            debug!("No index terms for {:?} in {}", phrase, self.term);
            return Ok(Vec::new());
        };

        let exact_matches = searcher.search(&self.exact_query(phrase), &DocSetCollector)?;

        let mut ranked: Vec<(u8, f32, DocAddress)> = searcher
            .search(&query, &TopDocs::with_limit(num_docs))?
            .into_iter()
            .map(|(score, address)| {
                let tier = if exact_matches.contains(&address) { 0 } else { 1 };
                (tier, score, address)
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.total_cmp(&a.1))
                .then_with(|| a.2.cmp(&b.2))
        });

        let results = ranked
            .into_iter()
            .skip(offset)
            .take(page_size)
            .filter_map(|(_, _, address)| self.load_course(&searcher, address))
            .collect();

        Ok(results)
    }

    /// Conjunction over the prefixes of a disjunction over their expansions.
    /// `None` when some prefix matches no indexed term at all.
    fn prefix_query(&self, searcher: &Searcher, prefixes: &[String]) -> Result<Option<BooleanQuery>> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(prefixes.len());

        for prefix in prefixes {
            let mut expansions: Vec<(Occur, Box<dyn Query>)> = Vec::new();
            for field in self.schema.text_fields() {
                for term in self.expand_prefix(searcher, field, prefix)? {
                    expansions.push((
                        Occur::Should,
                        Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)),
                    ));
                }
            }

            if expansions.is_empty() {
                return Ok(None);
            }
            clauses.push((Occur::Must, Box::new(BooleanQuery::new(expansions))));
        }

        Ok(Some(BooleanQuery::new(clauses)))
    }

    /// Distinct terms of `field` starting with `prefix`, across all segments
    fn expand_prefix(&self, searcher: &Searcher, field: Field, prefix: &str) -> Result<Vec<Term>> {
        let mut matches = BTreeSet::new();

        'segments: for segment_reader in searcher.segment_readers() {
            let inverted_index = segment_reader.inverted_index(field)?;
            let mut stream = inverted_index
                .terms()
                .range()
                .ge(prefix.as_bytes())
                .into_stream()?;

            while stream.advance() {
                let key = stream.key();
                if !key.starts_with(prefix.as_bytes()) {
                    break;
                }
                let Ok(text) = std::str::from_utf8(key) else {
                    continue;
                };
                if matches.contains(text) {
                    continue;
                }
                if matches.len() >= self.max_prefix_expansions {
                    warn!(
                        "Prefix {:?} expands to more than {} terms in {}, truncating",
                        prefix, self.max_prefix_expansions, self.term
                    );
                    break 'segments;
                }
                matches.insert(text.to_string());
            }
        }

        Ok(matches
            .into_iter()
            .map(|text| Term::from_field_text(field, &text))
            .collect())
    }

    fn exact_query(&self, phrase: &str) -> BooleanQuery {
        let clauses: Vec<(Occur, Box<dyn Query>)> = [self.schema.code_exact, self.schema.code_with_space_exact]
            .into_iter()
            .map(|field| {
                let query: Box<dyn Query> = Box::new(TermQuery::new(
                    Term::from_field_text(field, phrase),
                    IndexRecordOption::Basic,
                ));
                (Occur::Should, query)
            })
            .collect();
        BooleanQuery::new(clauses)
    }

    fn load_course(&self, searcher: &Searcher, address: DocAddress) -> Option<CourseRecord> {
        let doc = searcher.doc::<tantivy::TantivyDocument>(address).ok()?;

        let json_data = match doc.get_first(self.schema.json_data)? {
            tantivy::schema::OwnedValue::Str(s) => s,
            _ => return None,
        };

        match serde_json::from_str(json_data) {
            Ok(course) => Some(course),
            Err(e) => {
                warn!("Corrupt course snapshot in {}: {}", self.term, e);
                None
            }
        }
    }
}
