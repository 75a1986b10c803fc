//! Text analysis for the in-memory index
//!
//! A term is a lowercased run of alphanumeric characters at least two
//! characters long. No stemming, no stopwords.

use std::collections::HashMap;

/// Lowercased terms of `text`, in order of appearance
fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|run| run.chars().nth(1).is_some())
        .map(str::to_lowercase)
}

/// Term frequencies and total term count of an indexed text
pub fn term_frequencies(text: &str) -> (HashMap<String, u32>, u32) {
    let mut freqs: HashMap<String, u32> = HashMap::new();
    let mut len = 0;
    for term in terms(text) {
        *freqs.entry(term).or_default() += 1;
        len += 1;
    }
    (freqs, len)
}

/// Every term of `text`, repeats included
///
/// # Example
///
/// ```
/// use nodestore_search::tokenizer::tokenize;
///
/// assert_eq!(tokenize("Quarterly Report, Q3!"), vec!["quarterly", "report", "q3"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    terms(text).collect()
}

/// Query terms with repeats dropped, keeping first-seen order
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut query: Vec<String> = Vec::new();
    for term in terms(text) {
        if !query.contains(&term) {
            query.push(term);
        }
    }
    query
}
