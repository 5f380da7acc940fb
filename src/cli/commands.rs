use crate::catalog::{discover_term_files, load_courses, CourseRecord, TermKey};
use crate::config::Settings;
use crate::graph::{RenderedGraph, CODE_SEPARATOR};
use crate::indexer::{BuildOutcome, BuildPolicy, IndexOptions, TermIndex};
use crate::service::{partition_path, CatalogService, TermSummary};
use crate::{Error, Result};
use tracing::info;

/// Search one term and print the results
pub fn search(settings: &Settings, term: TermKey, query: &str, limit: usize, offset: usize) -> Result<()> {
    let catalog = CatalogService::initialize(settings)?;
    let results = catalog.search(&term, query, limit, offset)?;

    print_search_results(&term, &results);
    Ok(())
}

/// Print a department's prerequisite graph
pub fn graph(settings: &Settings, term: TermKey, department: &str, completed: &[String]) -> Result<()> {
    let catalog = CatalogService::initialize(settings)?;
    let graph = catalog.render_graph(&term, department, completed);

    print_graph(department, &graph);
    Ok(())
}

/// Print every loaded term
pub fn terms(settings: &Settings) -> Result<()> {
    let catalog = CatalogService::initialize(settings)?;

    print_terms(&catalog.terms());
    Ok(())
}

/// Rebuild the index partitions of every term, or only `only`.
/// Returns the number of rebuilt terms.
pub fn reindex(settings: &Settings, only: Option<TermKey>) -> Result<usize> {
    let files = discover_term_files(&settings.catalog.courses_dir, &settings.catalog.file_suffix)?;
    let options = IndexOptions {
        policy: BuildPolicy::Rebuild,
        ..IndexOptions::from(&settings.search)
    };

    let mut rebuilt = 0;
    for file in files {
        if only.as_ref().is_some_and(|term| term != &file.term) {
            continue;
        }

        info!("Reindexing {} from {:?}", file.term, file.path);
        let loaded = load_courses(&file.path)?;
        let path = partition_path(&settings.search.index_path, &file.term);
        let (_, outcome) = TermIndex::open_or_build(&path, file.term.clone(), &loaded.courses, &options)?;

        if let BuildOutcome::Built { indexed, skipped } = outcome {
            println!(
                "\x1b[32m\u{2713}\x1b[0m {}: {} courses indexed, {} skipped",
                file.term,
                indexed,
                skipped + loaded.skipped
            );
        }
        rebuilt += 1;
    }

    match only {
        Some(term) if rebuilt == 0 => Err(Error::UnknownTerm(term)),
        _ => Ok(rebuilt),
    }
}

fn print_search_results(term: &TermKey, results: &[CourseRecord]) {
    if results.is_empty() {
        println!("No courses found in {term}");
        return;
    }

    println!("\nFound {} courses in {}:\n", results.len(), term);
    println!("{:<12} {:<45} {:<30}", "Code", "Name", "Department");
    println!("{}", "-".repeat(87));

    for course in results {
        println!(
            "{:<12} {:<45} {:<30}",
            course.code,
            truncate(&course.name, 43),
            truncate(course.department(), 28)
        );
    }
}

fn print_graph(department: &str, graph: &RenderedGraph) {
    if graph.nodes.is_empty() {
        println!("No prerequisite graph for {department:?}");
        return;
    }

    println!("\n{} ({} courses, {} prerequisites)\n", department, graph.nodes.len(), graph.edges.len());

    for node in &graph.nodes {
        let marker = if node.selected { "[x]" } else { "[ ]" };
        println!("{} {}", marker, display_code(&node.id));
    }

    if !graph.edges.is_empty() {
        println!();
        for edge in &graph.edges {
            println!("{} -> {}", display_code(&edge.source), display_code(&edge.target));
        }
    }
}

fn print_terms(terms: &[TermSummary]) {
    if terms.is_empty() {
        println!("No terms loaded");
        return;
    }

    println!("{:<6} {:<10} {:>8} {:>12}", "Year", "Term", "Courses", "Departments");
    println!("{}", "-".repeat(39));

    for summary in terms {
        println!(
            "{:<6} {:<10} {:>8} {:>12}",
            summary.year,
            summary.term,
            summary.courses,
            summary.departments.len()
        );
    }
}

fn display_code(id: &str) -> String {
    id.replace(CODE_SEPARATOR, " ")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Calculus", 10), "Calculus");
        assert_eq!(truncate("Programming Fundamentals", 10), "Program...");
    }

    #[test]
    fn test_display_code() {
        assert_eq!(display_code("COP\n3502"), "COP 3502");
    }

    #[test]
    fn test_reindex_unknown_term() {
        let dir = tempdir().unwrap();
        let mut settings = crate::config::test_settings();
        settings.catalog.courses_dir = dir.path().join("courses");
        settings.search.index_path = dir.path().join("index");

        let result = reindex(&settings, Some(TermKey::new("25", "fall")));
        assert!(matches!(result, Err(Error::UnknownTerm(_))));
    }

    #[test]
    fn test_reindex_rebuilds_existing_partition() {
        let dir = tempdir().unwrap();
        let courses_dir = dir.path().join("courses");
        std::fs::create_dir_all(&courses_dir).unwrap();
        let file = courses_dir.join("UF_25_fall_final.json");
        std::fs::write(&file, r#"[{"code": "COP3502C", "name": "Programming Fundamentals 1"}]"#).unwrap();

        let mut settings = crate::config::test_settings();
        settings.catalog.courses_dir = courses_dir;
        settings.search.index_path = dir.path().join("index");

        let catalog = CatalogService::initialize(&settings).unwrap();
        assert_eq!(catalog.search(&TermKey::new("25", "fall"), "prog", 20, 0).unwrap().len(), 1);
        drop(catalog);

        std::fs::write(&file, r#"[{"code": "MAC2311", "name": "Calculus 1"}]"#).unwrap();
        assert_eq!(reindex(&settings, None).unwrap(), 1);

        let catalog = CatalogService::initialize(&settings).unwrap();
        let term = TermKey::new("25", "fall");
        assert!(catalog.search(&term, "prog", 20, 0).unwrap().is_empty());
        assert_eq!(catalog.search(&term, "calc", 20, 0).unwrap().len(), 1);
    }
}
