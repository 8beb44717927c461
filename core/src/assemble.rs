use crate::metadata::{MetadataStore, UNKNOWN_IMAGE_URL, UNKNOWN_NAME, UNKNOWN_SNIPPET, UNKNOWN_URL};
use crate::DocId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "doc_id")]
    pub document_id: DocId,
    #[serde(rename = "id")]
    pub metadata_key: String,
    pub score: f64,
    pub snippet: String,
    #[serde(rename = "nom")]
    pub name: String,
    pub url: String,
    pub image_url: String,
}

/// Strip the file extension from a document identifier: `"12.md"` -> `"12"`.
pub fn metadata_key(document_id: &str) -> &str {
    match document_id.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => document_id,
    }
}

pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

/// Join ranked documents with their metadata. Documents without a record get placeholder fields.
pub fn assemble(ranked: &[(DocId, f64)], metadata: &MetadataStore) -> Vec<ResultRecord> {
    ranked
        .iter()
        .map(|(document_id, score)| {
            let key = metadata_key(document_id);
            let (name, snippet, url, image_url) = match metadata.get(key) {
                Some(record) => (record.name(), record.snippet(), record.url(), record.image_url()),
                None => (UNKNOWN_NAME, UNKNOWN_SNIPPET, UNKNOWN_URL, UNKNOWN_IMAGE_URL),
            };
            ResultRecord {
                document_id: document_id.clone(),
                metadata_key: key.to_string(),
                score: round_score(*score),
                snippet: snippet.to_string(),
                name: name.to_string(),
                url: url.to_string(),
                image_url: image_url.to_string(),
            }
        })
        .collect()
}
