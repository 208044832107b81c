/// Split free-text query input into lowercase, whitespace-delimited terms.
///
/// Duplicates are kept: a term typed twice is scored twice. No stemming or
/// stopword removal is applied since the pre-built index was produced with
/// the same plain split.
pub fn query_terms(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
