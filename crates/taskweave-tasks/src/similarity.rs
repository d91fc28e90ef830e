//! Token-set Jaccard similarity.

use std::collections::HashSet;

/// Jaccard similarity over lower-cased whitespace tokens: |∩| / |∪|.
///
/// Either side tokenizing to the empty set yields 0.0.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let set_a: HashSet<&str> = a.split_whitespace().collect();
    let set_b: HashSet<&str> = b.split_whitespace().collect();

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}
