//! Search predicates evaluated by [`Engine::find`](crate::Engine::find).
//!
//! `find` is a linear scan over every live header; there is no secondary
//! index behind any of these predicates.

use crate::record::HeaderRecord;

/// Mask byte that matches any key byte
pub const WILDCARD: u8 = b'?';

/// A predicate over header records
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    /// Byte-equal key
    Exact { key: Vec<u8> },

    /// Same-length key; [`WILDCARD`] positions match anything
    Mask { mask: Vec<u8> },

    /// Cosine similarity of the name vector at or above `threshold`
    Vector { vector: Vec<f32>, threshold: f64 },
}

impl SearchQuery {
    pub fn exact_match(key: impl Into<Vec<u8>>) -> Self {
        SearchQuery::Exact { key: key.into() }
    }

    pub fn mask_search(mask: impl Into<Vec<u8>>) -> Self {
        SearchQuery::Mask { mask: mask.into() }
    }

    pub fn vector_search(vector: Vec<f32>, threshold: f64) -> Self {
        SearchQuery::Vector { vector, threshold }
    }

    /// Evaluate against one header (liveness is the caller's concern)
    pub fn matches(&self, header: &HeaderRecord) -> bool {
        match self {
            SearchQuery::Exact { key } => header.key == *key,
            SearchQuery::Mask { mask } => mask_matches(mask, &header.key),
            SearchQuery::Vector { vector, threshold } => {
                cosine_similarity(&header.name_vector, vector) >= *threshold
            }
        }
    }
}

/// Wildcard comparison; a length mismatch never matches
pub fn mask_matches(mask: &[u8], key: &[u8]) -> bool {
    mask.len() == key.len()
        && mask
            .iter()
            .zip(key)
            .all(|(m, k)| *m == WILDCARD || m == k)
}

/// Cosine similarity, or 0.0 when either vector is empty, the lengths
/// differ or a norm is zero
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
