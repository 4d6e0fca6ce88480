//! Tests for search predicates

use slabkv::query::{cosine_similarity, mask_matches, SearchQuery};
use slabkv::record::{HeaderRecord, NEVER_EXPIRES};

fn header(key: &str, vector: Vec<f32>) -> HeaderRecord {
    HeaderRecord::new(key.as_bytes().to_vec(), 0, 0, NEVER_EXPIRES, vector)
}

#[test]
fn test_exact_match() {
    let query = SearchQuery::exact_match("document:1");

    assert!(query.matches(&header("document:1", vec![])));
    assert!(!query.matches(&header("document:10", vec![])));
    assert!(!query.matches(&header("document:2", vec![])));
}

#[test]
fn test_mask_match() {
    let query = SearchQuery::mask_search("document:?");

    assert!(query.matches(&header("document:1", vec![])));
    assert!(query.matches(&header("document:x", vec![])));
    assert!(!query.matches(&header("document:10", vec![])));
    assert!(!query.matches(&header("dokument:1", vec![])));
}

#[test]
fn test_mask_wildcards_anywhere() {
    assert!(mask_matches(b"?a?", b"bat"));
    assert!(mask_matches(b"???", b"xyz"));
    assert!(!mask_matches(b"?a?", b"bit"));
    assert!(!mask_matches(b"??", b"abc"));
    assert!(mask_matches(b"", b""));
}

#[test]
fn test_cosine_similarity() {
    assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
    assert!((cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]) - 1.0).abs() < 1e-6);
    assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
}

#[test]
fn test_cosine_similarity_undefined_cases() {
    assert_eq!(cosine_similarity(&[], &[1.0]), 0.0);
    assert_eq!(cosine_similarity(&[1.0], &[]), 0.0);
    assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
}

#[test]
fn test_vector_query_threshold() {
    let query = SearchQuery::vector_search(vec![1.0, 0.0], 0.7);

    assert!(query.matches(&header("a", vec![1.0, 0.0])));
    assert!(query.matches(&header("b", vec![0.8, 0.6])));
    assert!(!query.matches(&header("c", vec![0.6, 0.8])));
    assert!(!query.matches(&header("d", vec![])));
}
