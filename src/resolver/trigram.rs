//! Trigram similarity compatible with PostgreSQL `pg_trgm`
//!
//! Each word (maximal run of alphanumeric characters, lower-cased) is padded
//! with two spaces in front and one behind, then cut into 3-character
//! windows. The score of two strings is the Jaccard index of their trigram
//! sets: shared / (total distinct).

use std::collections::BTreeSet;

type Trigram = [char; 3];

/// Extract the set of trigrams of `text`
pub fn trigrams(text: &str) -> BTreeSet<Trigram> {
    let mut set = BTreeSet::new();
    let lowered = text.to_lowercase();

    for word in lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let padded: Vec<char> = "  ".chars().chain(word.chars()).chain(" ".chars()).collect();
        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }

    set
}

/// Similarity in `0.0..=1.0`; two strings without any trigram score 0
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let total = left.len() + right.len() - shared;

    shared as f64 / total as f64
}
