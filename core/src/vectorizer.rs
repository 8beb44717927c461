use crate::normalizer::normalize;
use crate::{IdfTable, SparseVector, Term};
use std::collections::HashMap;

/// Raw term counts, no length normalization.
pub fn term_frequencies(terms: Vec<Term>) -> HashMap<Term, u32> {
    let mut tf: HashMap<Term, u32> = HashMap::new();
    for term in terms {
        *tf.entry(term).or_insert(0) += 1;
    }
    tf
}

/// Build the query vector: `tf * idf` for every term the IDF table knows.
/// Unknown terms are dropped, so the result may be empty.
pub fn vectorize(query: &str, idf: &IdfTable) -> SparseVector {
    let terms = normalize(query);
    tracing::debug!(query, ?terms, "normalized query");
    let mut vector = SparseVector::new();
    for (term, count) in term_frequencies(terms) {
        match idf.get(&term) {
            Some(&weight) => vector.insert(term, count as f64 * weight),
            None => tracing::debug!(%term, "term absent from idf table"),
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idf() -> IdfTable {
        [("amoxicilline", 2.0), ("enfant", 0.5)].into_iter().map(|(t, w)| (t.to_string(), w)).collect()
    }

    #[test]
    fn weights_are_count_times_idf() {
        let v = vectorize("Amoxicilline amoxicilline pour enfant", &idf());
        assert_eq!(v.len(), 2);
        assert_eq!(v.get("amoxicilline"), Some(4.0));
        assert_eq!(v.get("enfant"), Some(0.5));
    }

    #[test]
    fn unknown_terms_are_dropped() {
        let v = vectorize("paracétamol enfant", &idf());
        assert_eq!(v.len(), 1);
        assert!(!v.contains("paracétamol"));
        assert!(vectorize("ibuprofène", &idf()).is_empty());
    }
}
