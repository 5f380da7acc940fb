use once_cell::sync::Lazy;
use regex::Regex;

// Three uppercase letters, one whitespace character, four digits ("COP 3502").
// Ranges, "or" groups and other spellings yield no match.
static COURSE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]{3}\s\d{4}").expect("course code pattern is valid"));

/// Course codes mentioned in a free-text prerequisite description, in order of
/// appearance.
pub fn extract_prerequisites(text: &str) -> Vec<&str> {
    COURSE_CODE.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_spaced_codes() {
        let text = "Prereq: (COP 3502C or COP 3504C) and MAC 2311 with minimum grades of C.";
        assert_eq!(
            extract_prerequisites(text),
            vec!["COP 3502", "COP 3504", "MAC 2311"]
        );
    }

    #[test]
    fn test_ignores_other_shapes() {
        assert!(extract_prerequisites("COP3502C").is_empty());
        assert!(extract_prerequisites("cop 3502").is_empty());
        assert!(extract_prerequisites("COP  3502").is_empty());
        assert!(extract_prerequisites("Junior standing or instructor permission.").is_empty());
        assert!(extract_prerequisites("").is_empty());
    }
}
