use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::models::{CatalogRecord, Title};

/// Failures while loading the catalog artifacts
///
/// All of these are fatal: nothing can be served without a catalog.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog is empty")]
    Empty,

    #[error("Catalog has {titles} titles but the similarity matrix has {rows} rows")]
    DimensionMismatch { titles: usize, rows: usize },

    #[error("Similarity row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Immutable title list and pairwise similarity matrix
///
/// Built once at startup and shared read-only for the life of the process.
#[derive(Debug)]
pub struct CatalogStore {
    titles: Vec<Title>,
    similarity: Vec<Vec<f64>>,
    /// Name -> index of the first title carrying that name
    index_by_name: HashMap<String, usize>,
}

impl CatalogStore {
    /// Loads the catalog and similarity matrix from their JSON artifacts
    pub fn load(
        catalog_path: impl AsRef<Path>,
        similarity_path: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let records: Vec<CatalogRecord> = read_json(catalog_path.as_ref())?;
        let similarity: Vec<Vec<f64>> = read_json(similarity_path.as_ref())?;

        let store = Self::from_parts(records, similarity)?;

        tracing::info!(
            titles = store.len(),
            catalog = %catalog_path.as_ref().display(),
            similarity = %similarity_path.as_ref().display(),
            "Catalog loaded"
        );

        Ok(store)
    }

    /// Builds a store from in-memory records and matrix rows
    pub fn from_parts(
        records: Vec<CatalogRecord>,
        similarity: Vec<Vec<f64>>,
    ) -> Result<Self, CatalogError> {
        let n = records.len();
        if n == 0 {
            return Err(CatalogError::Empty);
        }
        if similarity.len() != n {
            return Err(CatalogError::DimensionMismatch {
                titles: n,
                rows: similarity.len(),
            });
        }
        if let Some((row, cols)) = similarity
            .iter()
            .enumerate()
            .find(|(_, cols)| cols.len() != n)
        {
            return Err(CatalogError::RaggedRow {
                row,
                expected: n,
                actual: cols.len(),
            });
        }

        let titles: Vec<Title> = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_title(index))
            .collect();

        let mut index_by_name = HashMap::with_capacity(n);
        for title in &titles {
            index_by_name.entry(title.name.clone()).or_insert(title.index);
        }

        if index_by_name.len() < n {
            tracing::warn!(
                duplicates = n - index_by_name.len(),
                "Catalog contains duplicate names, first occurrence wins"
            );
        }

        Ok(Self {
            titles,
            similarity,
            index_by_name,
        })
    }

    /// Exact-match lookup of a title name
    pub fn resolve_index(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    /// Returns the title at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Indices come from this store, so
    /// that only happens on a broken invariant.
    pub fn title_at(&self, index: usize) -> &Title {
        self.titles.get(index).unwrap_or_else(|| {
            panic!(
                "title index {} out of range for catalog of {}",
                index,
                self.titles.len()
            )
        })
    }

    /// Similarity scores of `index` against every title, in catalog order
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn similarity_row(&self, index: usize) -> &[f64] {
        &self.similarity[index]
    }

    /// All title names in catalog order
    pub fn all_titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.titles.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let bytes = fs::read(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn records(names: &[&str]) -> Vec<CatalogRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| CatalogRecord::new(i as u64 + 1, *name))
            .collect()
    }

    fn square(n: usize) -> Vec<Vec<f64>> {
        vec![vec![0.5; n]; n]
    }

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_parts_assigns_indices() {
        let store = CatalogStore::from_parts(records(&["A", "B", "C"]), square(3)).unwrap();
        assert_eq!(store.len(), 3);
        let b = store.title_at(1);
        assert_eq!(b.name, "B");
        assert_eq!(b.id, 2);
        assert_eq!(b.index, 1);
    }

    #[test]
    fn test_dimension_mismatch() {
        let names: Vec<String> = (0..100).map(|i| format!("Movie {}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let matrix = vec![vec![0.0; 100]; 99];

        let err = CatalogStore::from_parts(records(&names), matrix).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DimensionMismatch {
                titles: 100,
                rows: 99
            }
        ));
    }

    #[test]
    fn test_ragged_row() {
        let mut matrix = square(3);
        matrix[2].pop();
        let err = CatalogStore::from_parts(records(&["A", "B", "C"]), matrix).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::RaggedRow {
                row: 2,
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = CatalogStore::from_parts(vec![], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn test_resolve_index_first_match_wins() {
        let store =
            CatalogStore::from_parts(records(&["Heat", "Alien", "Heat"]), square(3)).unwrap();
        assert_eq!(store.resolve_index("Heat"), Some(0));
        assert_eq!(store.resolve_index("Alien"), Some(1));
    }

    #[test]
    fn test_resolve_index_is_exact() {
        let store = CatalogStore::from_parts(records(&["Alien"]), square(1)).unwrap();
        assert_eq!(store.resolve_index("alien"), None);
        assert_eq!(store.resolve_index("Alien "), None);
    }

    #[test]
    fn test_all_titles_in_catalog_order() {
        let store = CatalogStore::from_parts(records(&["C", "A", "B"]), square(3)).unwrap();
        let names: Vec<&str> = store.all_titles().collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_title_at_out_of_range_panics() {
        let store = CatalogStore::from_parts(records(&["A"]), square(1)).unwrap();
        store.title_at(5);
    }

    #[test]
    fn test_load_from_files() {
        let catalog = write_temp(
            r#"[{"movie_id": 19995, "title": "Avatar"}, {"movie_id": 285, "title": "Pirates"}]"#,
        );
        let similarity = write_temp("[[1.0, 0.2], [0.2, 1.0]]");

        let store = CatalogStore::load(catalog.path(), similarity.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.title_at(0).id, 19995);
        assert_eq!(store.similarity_row(1), &[0.2, 1.0]);
    }

    #[test]
    fn test_load_missing_file() {
        let similarity = write_temp("[[1.0]]");
        let err = CatalogStore::load("/nonexistent/movie_list.json", similarity.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_load_corrupt_file() {
        let catalog = write_temp(r#"[{"movie_id": 1, "title": "A"}]"#);
        let similarity = write_temp("not json");
        let err = CatalogStore::load(catalog.path(), similarity.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }
}
