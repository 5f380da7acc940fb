/// Separator placed between the subject prefix and the course number
pub const CODE_SEPARATOR: char = '\n';

const SUBJECT_LEN: usize = 3;

/// Canonical graph node id for a course code.
///
/// Whitespace and any trailing section-letter suffix are dropped, then the code is
/// split after its three-letter subject: `"COP3502C"`, `"COP 3502"` and
/// `"COP\n3502"` all become `"COP\n3502"`. Applying it twice is a no-op.
pub fn normalize_code(code: &str) -> String {
    let compact: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    let stem = compact.trim_end_matches(|c: char| c.is_ascii_uppercase());

    match stem.char_indices().nth(SUBJECT_LEN) {
        Some((split, _)) => {
            let (subject, number) = stem.split_at(split);
            format!("{subject}{CODE_SEPARATOR}{number}")
        }
        None => stem.to_string(),
    }
}
