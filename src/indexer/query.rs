use tantivy::tokenizer::{TextAnalyzer, TokenStream};

/// Split a search phrase on whitespace and run every word through `analyzer`.
///
/// Each produced token is one required prefix term. Pure punctuation words
/// contribute nothing. Returns `None` when a word with alphanumeric content
/// yields no token at all (e.g. longer than the analyzer's length limit): such
/// a word can never match, so neither can the whole conjunction.
pub fn prefix_terms(analyzer: &mut TextAnalyzer, phrase: &str) -> Option<Vec<String>> {
    let mut terms = Vec::new();
    for word in phrase.split_whitespace() {
        let before = terms.len();
        let mut stream = analyzer.token_stream(word);
        while stream.advance() {
            terms.push(stream.token().text.clone());
        }
        if terms.len() == before && word.chars().any(char::is_alphanumeric) {
            return None;
        }
    }
    Some(terms)
}
