//! Offline model construction: raw documents in, TF-IDF artifacts out.

use crate::normalizer::normalize;
use crate::vectorizer::term_frequencies;
use crate::{DocId, IdfTable, InvertedIndex, SparseVector, VectorSpace};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Use `ln(1 + N/df)` instead of `ln(N/df)`.
    pub smoothed_idf: bool,
}

/// The three structures the search side consumes.
#[derive(Debug, Default)]
pub struct Model {
    pub vectors: HashMap<DocId, SparseVector>,
    pub idf: IdfTable,
    pub inverted_index: InvertedIndex,
}

impl Model {
    pub fn into_vector_space(self) -> VectorSpace {
        VectorSpace::new(self.vectors, self.idf, self.inverted_index)
    }
}

pub fn build_model<I>(docs: I, options: BuildOptions) -> Model
where
    I: IntoIterator<Item = (DocId, String)>,
{
    let mut counts: Vec<(DocId, HashMap<String, u32>)> = Vec::new();
    let mut df: HashMap<String, u32> = HashMap::new();
    let mut inverted_index = InvertedIndex::new();

    for (doc_id, text) in docs {
        let tf = term_frequencies(normalize(&text));
        for term in tf.keys() {
            *df.entry(term.clone()).or_insert(0) += 1;
            inverted_index.entry(term.clone()).or_default().push(doc_id.clone());
        }
        counts.push((doc_id, tf));
    }
    for postings in inverted_index.values_mut() {
        postings.sort();
    }

    let n = counts.len().max(1) as f64;
    let idf: IdfTable = df
        .into_iter()
        .map(|(term, df_t)| {
            let ratio = n / df_t.max(1) as f64;
            let weight = if options.smoothed_idf { (1.0 + ratio).ln() } else { ratio.ln() };
            (term, weight)
        })
        .collect();

    let vectors = counts
        .into_iter()
        .map(|(doc_id, tf)| {
            let vector: SparseVector = tf
                .into_iter()
                .map(|(term, count)| {
                    let weight = count as f64 * idf.get(&term).copied().unwrap_or(0.0);
                    (term, weight)
                })
                .collect();
            (doc_id, vector)
        })
        .collect();

    Model { vectors, idf, inverted_index }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_consistent_structures() {
        let model = build_model(
            vec![
                ("1.md".to_string(), "amoxicilline amoxicilline enfant".to_string()),
                ("2.md".to_string(), "paracétamol enfant".to_string()),
            ],
            BuildOptions::default(),
        );
        assert_eq!(model.vectors.len(), 2);
        assert_eq!(model.inverted_index["enfant"], vec!["1.md".to_string(), "2.md".to_string()]);
        // a term present in every document carries no weight
        assert_eq!(model.idf["enfant"], 0.0);
        let expected = 2.0 * 2f64.ln();
        assert!((model.vectors["1.md"].get("amoxicilline").unwrap() - expected).abs() < 1e-12);
        for vector in model.vectors.values() {
            assert!(vector.terms().all(|t| model.idf.contains_key(t)));
        }
    }

    #[test]
    fn smoothed_idf_stays_positive() {
        let model = build_model(
            vec![("1.md".to_string(), "enfant".to_string()), ("2.md".to_string(), "enfant".to_string())],
            BuildOptions { smoothed_idf: true },
        );
        assert!((model.idf["enfant"] - 2f64.ln()).abs() < 1e-12);
    }
}
