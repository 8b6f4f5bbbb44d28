mod common;

use news_digest::nlp::{
    embeddings::{cosine, Embedder, HashingEmbedder},
    index::VectorIndex,
};

#[test]
fn related_texts_score_higher() {
    let embedder = HashingEmbedder::default();
    let vectors = embedder
        .embed(&[
            "dental care prices rise".to_string(),
            "rising dental care prices".to_string(),
            "football club wins the cup".to_string(),
        ])
        .unwrap();
    assert!(cosine(&vectors[0], &vectors[1]) > cosine(&vectors[0], &vectors[2]));
}

#[test]
fn query_returns_most_relevant_chunk_first() {
    let embedder = HashingEmbedder::default();
    let index = VectorIndex::build("football", &common::sample_articles(), &embedder).unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.collection(), "football");

    let hits = index.query("football club cup", 2, &embedder).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk.title, "Local football club wins cup");
    assert!(hits[0].score >= hits[1].score);
}

#[test]
fn saved_index_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = HashingEmbedder::default();
    let index = VectorIndex::build("dental care", &common::sample_articles(), &embedder).unwrap();
    let path = index.save(dir.path()).unwrap();
    assert!(path.ends_with("dental_care/index.json"));

    let loaded = VectorIndex::load(dir.path(), "dental care").unwrap().unwrap();
    assert_eq!(loaded.len(), index.len());
    let hits = loaded.query("dental care", 1, &embedder).unwrap();
    assert_eq!(hits[0].chunk.title, "Dental care costs rise");

    assert!(VectorIndex::load(dir.path(), "unknown").unwrap().is_none());
}

#[test]
fn empty_article_list_builds_empty_index() {
    let embedder = HashingEmbedder::default();
    let index = VectorIndex::build("AI", &[], &embedder).unwrap();
    assert!(index.is_empty());
    assert!(index.query("AI", 3, &embedder).unwrap().is_empty());
}
