use crate::catalog::{CourseRecord, TermKey};
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An ingestion file and the term it was derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFile {
    pub term: TermKey,
    pub path: PathBuf,
}

/// Records decoded from one ingestion file
#[derive(Debug, Clone, Default)]
pub struct LoadedCourses {
    pub courses: Vec<CourseRecord>,
    pub skipped: usize,
}

/// Find every ingestion file in `dir` ending with `suffix`.
///
/// Paths are visited in sorted order; when two files map to the same term the
/// later one wins. A missing directory yields no terms.
pub fn discover_term_files(dir: &Path, suffix: &str) -> Result<Vec<TermFile>> {
    if !dir.is_dir() {
        warn!("Courses directory {:?} does not exist, no terms discovered", dir);
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut by_term: BTreeMap<TermKey, PathBuf> = BTreeMap::new();
    for path in paths {
        let Some(term) = TermKey::from_filename(&path, suffix) else {
            debug!("Ignoring non-course file {:?}", path);
            continue;
        };

        if let Some(previous) = by_term.insert(term.clone(), path) {
            warn!(
                "Multiple course files for term {}: ignoring {:?}",
                term, previous
            );
        }
    }

    info!("Discovered {} term(s) in {:?}", by_term.len(), dir);

    Ok(by_term
        .into_iter()
        .map(|(term, path)| TermFile { term, path })
        .collect())
}

/// Load the course records of one ingestion file.
///
/// The file must hold a JSON array. Elements that fail to decode, or that have no
/// course code, are skipped so one bad record does not lose the whole term.
pub fn load_courses(path: &Path) -> Result<LoadedCourses> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    let Value::Array(items) = value else {
        return Err(Error::Validation(format!(
            "Course file {path:?} must contain a JSON array"
        )));
    };

    let mut loaded = LoadedCourses::default();
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<CourseRecord>(item) {
            Ok(course) if !course.code.trim().is_empty() => loaded.courses.push(course),
            Ok(_) => {
                warn!("Skipping record #{} in {:?}: missing course code", position, path);
                loaded.skipped += 1;
            }
            Err(e) => {
                warn!("Skipping record #{} in {:?}: {}", position, path, e);
                loaded.skipped += 1;
            }
        }
    }

    debug!(
        "Loaded {} course(s) from {:?} ({} skipped)",
        loaded.courses.len(),
        path,
        loaded.skipped
    );

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discover_term_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("UF_Jan-02-2025_25_spring_final.json"), "[]").unwrap();
        std::fs::write(dir.path().join("UF_Feb-21-2025_25_fall_final.json"), "[]").unwrap();
        std::fs::write(dir.path().join("UF_Feb-21-2025_25_fall_clean.json"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = discover_term_files(dir.path(), "_final.json").unwrap();
        let terms: Vec<_> = files.iter().map(|f| f.term.clone()).collect();

        assert_eq!(
            terms,
            vec![TermKey::new("25", "fall"), TermKey::new("25", "spring")]
        );
    }

    #[test]
    fn test_discover_last_file_wins_for_duplicate_term() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("A_25_fall_final.json"), "[]").unwrap();
        std::fs::write(dir.path().join("B_25_fall_final.json"), "[]").unwrap();

        let files = discover_term_files(dir.path(), "_final.json").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("B_25_fall_final.json"));
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempdir().unwrap();
        let files = discover_term_files(&dir.path().join("absent"), "_final.json").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_load_courses_skips_malformed_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("UF_25_fall_final.json");
        std::fs::write(
            &path,
            r#"[
                {"code": "COP3502C", "name": "Programming Fundamentals 1"},
                {"code": "COP3503C", "sections": "not-a-list"},
                {"name": "No code at all"},
                {"code": "MAC2311", "name": "Analytic Geometry and Calculus 1"}
            ]"#,
        )
        .unwrap();

        let loaded = load_courses(&path).unwrap();
        let codes: Vec<_> = loaded.courses.iter().map(|c| c.code.as_str()).collect();

        assert_eq!(codes, vec!["COP3502C", "MAC2311"]);
        assert_eq!(loaded.skipped, 2);
    }

    #[test]
    fn test_load_courses_requires_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("UF_25_fall_final.json");
        std::fs::write(&path, r#"{"code": "COP3502C"}"#).unwrap();

        assert!(matches!(load_courses(&path), Err(Error::Validation(_))));
    }
}
