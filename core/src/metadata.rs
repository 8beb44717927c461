use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const UNKNOWN_NAME: &str = "Médicament inconnu";
pub const UNKNOWN_SNIPPET: &str = "Aucune description disponible.";
pub const UNKNOWN_URL: &str = "#";
pub const UNKNOWN_IMAGE_URL: &str = "";

/// One entry of the external metadata file. Fields are kept as raw JSON so a
/// record with an odd value still loads; display accessors fall back on non-strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataRecord {
    /// Lookup key: string ids as-is, numeric ids in their decimal form.
    /// `true` is keyed as `"True"`; empty, zero, null and `false` ids leave the record unkeyed.
    pub fn key(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("True".to_string()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str { text_or(&self.nom, UNKNOWN_NAME) }
    pub fn snippet(&self) -> &str { text_or(&self.snippet, UNKNOWN_SNIPPET) }
    pub fn url(&self) -> &str { text_or(&self.url, UNKNOWN_URL) }
    pub fn image_url(&self) -> &str { text_or(&self.image_url, UNKNOWN_IMAGE_URL) }
}

fn text_or<'a>(value: &'a Option<Value>, fallback: &'a str) -> &'a str {
    value.as_ref().and_then(Value::as_str).unwrap_or(fallback)
}

#[derive(Debug, Default)]
pub struct MetadataStore {
    records: Vec<MetadataRecord>,
    by_key: HashMap<String, usize>,
}

impl MetadataStore {
    pub fn new(records: Vec<MetadataRecord>) -> Self {
        let mut by_key = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            // later records win on duplicate ids
            if let Some(key) = record.key() {
                by_key.insert(key, i);
            }
        }
        Self { records, by_key }
    }

    /// Load a JSON array of records. A missing file gives an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "metadata file not found, results will use placeholders");
            return Ok(Self::default());
        }
        let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let records: Vec<MetadataRecord> = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing {}", path.display()))?;
        let store = Self::new(records);
        tracing::info!(records = store.len(), keyed = store.keyed_len(), "metadata loaded");
        Ok(store)
    }

    pub fn get(&self, key: &str) -> Option<&MetadataRecord> {
        self.by_key.get(key).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[MetadataRecord] { &self.records }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Number of distinct ids that can be looked up.
    pub fn keyed_len(&self) -> usize { self.by_key.len() }
}
