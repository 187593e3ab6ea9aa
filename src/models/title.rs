use serde::{Deserialize, Serialize};

/// A recommendable movie as held by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    /// External catalog identifier, used for poster lookups
    pub id: u64,
    /// Display name, also the lookup key
    pub name: String,
    /// Row/column of this title in the similarity matrix
    pub index: usize,
}

/// One row of the serialized title list
///
/// Field names follow the artifact produced by the offline build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub movie_id: u64,
    pub title: String,
}

impl CatalogRecord {
    pub fn new(movie_id: u64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }

    /// Converts the record into a catalog title at the given position
    pub fn into_title(self, index: usize) -> Title {
        Title {
            id: self.movie_id,
            name: self.title,
            index,
        }
    }
}
