use crate::{DocId, IdfTable, InvertedIndex, SparseVector, VectorSpace};
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing model artifact: {}", .0.display())]
    MissingArtifact(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct ModelPaths {
    pub root: PathBuf,
}

impl ModelPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn tfidf_vectors(&self) -> PathBuf { self.root.join("tfidf_vectors.bin") }
    pub fn idf(&self) -> PathBuf { self.root.join("idf.bin") }
    pub fn inverted_index(&self) -> PathBuf { self.root.join("inverted_index.bin") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    fn artifacts(&self) -> [PathBuf; 3] { [self.tfidf_vectors(), self.idf(), self.inverted_index()] }
}

fn write_bincode<T: Serialize>(paths: &ModelPaths, file: PathBuf, value: &T) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(file)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bincode<T: DeserializeOwned>(path: PathBuf) -> Result<T, LoadError> {
    let mut buf = Vec::new();
    File::open(&path)
        .and_then(|mut f| f.read_to_end(&mut buf))
        .map_err(|source| LoadError::Io { path: path.clone(), source })?;
    bincode::deserialize(&buf).map_err(|source| LoadError::Decode { path, source })
}

pub fn save_document_vectors(paths: &ModelPaths, vectors: &HashMap<DocId, SparseVector>) -> Result<()> {
    write_bincode(paths, paths.tfidf_vectors(), vectors)
}

pub fn save_idf(paths: &ModelPaths, idf: &IdfTable) -> Result<()> {
    write_bincode(paths, paths.idf(), idf)
}

pub fn save_inverted_index(paths: &ModelPaths, index: &InvertedIndex) -> Result<()> {
    write_bincode(paths, paths.inverted_index(), index)
}

pub fn save_meta(paths: &ModelPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

/// Read `meta.json` if the indexer wrote one.
pub fn load_meta(paths: &ModelPaths) -> Result<Option<MetaFile>> {
    let path = paths.meta();
    if !path.exists() {
        return Ok(None);
    }
    let mut buf = String::new();
    File::open(path)?.read_to_string(&mut buf)?;
    Ok(Some(serde_json::from_str(&buf)?))
}

/// Load the three model artifacts. All of them must be present; nothing is read otherwise.
pub fn load_vector_space(paths: &ModelPaths) -> Result<VectorSpace, LoadError> {
    if let Some(missing) = paths.artifacts().into_iter().find(|p| !p.is_file()) {
        return Err(LoadError::MissingArtifact(missing));
    }
    let vectors: HashMap<DocId, SparseVector> = read_bincode(paths.tfidf_vectors())?;
    let idf: IdfTable = read_bincode(paths.idf())?;
    let inverted_index: InvertedIndex = read_bincode(paths.inverted_index())?;
    tracing::info!(
        root = %paths.root.display(),
        documents = vectors.len(),
        idf_terms = idf.len(),
        index_terms = inverted_index.len(),
        "model artifacts loaded"
    );
    Ok(VectorSpace::new(vectors, idf, inverted_index))
}
