use search_core::tokenizer::query_terms;
use search_core::canonical_doc_id;

#[test]
fn it_lowercases_and_splits() {
    let terms = query_terms("Harga  BBM\nNaik hari INI");
    assert_eq!(terms, vec!["harga", "bbm", "naik", "hari", "ini"]);
}

#[test]
fn it_keeps_duplicates_and_punctuation() {
    let terms = query_terms("Banjir banjir, Jakarta");
    assert_eq!(terms, vec!["banjir", "banjir,", "jakarta"]);
}

#[test]
fn numeric_ids_share_a_key() {
    assert_eq!(canonical_doc_id("5"), canonical_doc_id("005"));
    assert_ne!(canonical_doc_id("5a"), canonical_doc_id("5"));
}
