//! Checks on the bundled sample data in `data/`.

use std::sync::Arc;

use zhuyin_core::{LookupError, PhraseCatalog, PhraseMatcher, ReadingIndex, ReferenceData};

// Integration tests run from the crate directory (core), not the workspace root
const PHRASES: &str = "../data/phrases.json";
const INDEX: &str = "../data/readingIndex.json";

#[test]
fn shipped_index_matches_a_fresh_build() {
    let catalog = PhraseCatalog::load_json(PHRASES).unwrap();
    let shipped = ReadingIndex::load_json(INDEX).unwrap();
    let rebuilt = ReadingIndex::build(&catalog);

    assert_eq!(shipped.len(), rebuilt.len());
    for key in rebuilt.keys() {
        assert_eq!(shipped.get(key), rebuilt.get(key), "key {key}");
    }
}

#[test]
fn every_indexed_id_is_in_the_catalog() {
    let data = ReferenceData::load(PHRASES, INDEX).unwrap();
    for key in data.index.keys() {
        for entry in data.index.get(key) {
            assert!(
                data.catalog.get(&entry.phrase_id).is_some(),
                "{} under {key} has no phrase",
                entry.phrase_id
            );
        }
    }
}

#[test]
fn matcher_over_sample_data() {
    let matcher = PhraseMatcher::new(Arc::new(ReferenceData::load(PHRASES, INDEX).unwrap()));

    let hits = matcher.suggest("ㄨㄛ").unwrap();
    let ids: Vec<&str> = hits.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["p0001", "p0002", "p0009"]);

    let yi = matcher.suggest(" ㄧ ").unwrap();
    assert_eq!(yi[0].text, "一心一意");
    assert_eq!(yi[0].matches[0].char, "一");
    assert_eq!(yi[0].matches[0].positions, vec![0, 2]);
    assert_eq!(yi[0].matches[1].char, "意");
    assert_eq!(yi[0].matches[1].positions, vec![3]);

    assert_eq!(matcher.suggest("ㄅㄨ"), Err(LookupError::NoSuggestions));
    assert_eq!(matcher.suggest("ㄨㄛˇ"), Err(LookupError::BadInput));
}
