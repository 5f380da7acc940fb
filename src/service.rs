use crate::catalog::{discover_term_files, load_courses, CourseRecord, TermKey};
use crate::config::Settings;
use crate::error::Result;
use crate::graph::{MajorGraphMap, RenderedGraph};
use crate::indexer::{IndexOptions, TermIndex, TermIndexStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// A term available for search and graph requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermSummary {
    pub year: String,
    pub term: String,
    pub courses: u64,
    pub departments: Vec<String>,
}

/// Read-only catalog state shared by every request.
///
/// Everything is built by [`CatalogService::initialize`] (or
/// [`CatalogService::from_terms`]) before serving starts and never changes
/// afterwards, so handlers only need `&CatalogService`.
pub struct CatalogService {
    indexes: TermIndexStore,
    graphs: MajorGraphMap,
}

impl CatalogService {
    /// Discover every term in the configured courses directory and build its
    /// search index and department graphs.
    ///
    /// A term whose course file cannot be read is left out; index failures abort.
    pub fn initialize(settings: &Settings) -> Result<Self> {
        let files = discover_term_files(&settings.catalog.courses_dir, &settings.catalog.file_suffix)?;

        let mut terms = Vec::with_capacity(files.len());
        for file in files {
            match load_courses(&file.path) {
                Ok(loaded) => terms.push((file.term, loaded.courses)),
                Err(e) => error!(
                    "Failed to load {:?} for term {}, skipping term: {}",
                    file.path,
                    file.term,
                    e.log_safe()
                ),
            }
        }

        Self::from_terms(
            &settings.search.index_path,
            terms,
            &IndexOptions::from(&settings.search),
        )
    }

    /// Build the catalog from already loaded records
    pub fn from_terms(
        index_root: &Path,
        terms: Vec<(TermKey, Vec<CourseRecord>)>,
        options: &IndexOptions,
    ) -> Result<Self> {
        let mut indexes = TermIndexStore::new();
        let mut graphs = MajorGraphMap::new();

        for (term, courses) in terms {
            let (index, outcome) =
                TermIndex::open_or_build(partition_path(index_root, &term), term.clone(), &courses, options)?;
            info!("Index for {} ready: {:?}", term, outcome);
            indexes.insert(index);

            let departments = graphs.build_term(term.clone(), &courses);
            info!(
                "Built prerequisite graphs for {}: {} department(s)",
                term,
                departments.len()
            );
        }

        info!("Catalog initialized with {} term(s)", indexes.len());

        Ok(Self { indexes, graphs })
    }

    /// Ranked prefix search over one term's courses.
    /// An empty phrase returns nothing, even for an unknown term.
    pub fn search(
        &self,
        term: &TermKey,
        phrase: &str,
        page_size: usize,
        offset: usize,
    ) -> Result<Vec<CourseRecord>> {
        if phrase.trim().is_empty() {
            return Ok(Vec::new());
        }

        self.indexes.get_index(term)?.search(phrase, page_size, offset)
    }

    /// Prerequisite graph of a department with `completed` courses marked.
    /// Unknown terms or departments render as an empty graph.
    pub fn render_graph(&self, term: &TermKey, department: &str, completed: &[String]) -> RenderedGraph {
        self.graphs.render(term, department, completed)
    }

    pub fn terms(&self) -> Vec<TermSummary> {
        self.indexes
            .terms()
            .into_iter()
            .map(|term| TermSummary {
                year: term.year.clone(),
                term: term.term.clone(),
                courses: self
                    .indexes
                    .get_index(term)
                    .map(TermIndex::num_docs)
                    .unwrap_or_default(),
                departments: self
                    .graphs
                    .departments(term)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }

    pub fn term_count(&self) -> usize {
        self.indexes.len()
    }
}

/// Directory of a term's index partition under `index_root`
pub fn partition_path(index_root: &Path, term: &TermKey) -> PathBuf {
    index_root.join(term.partition_name())
}
