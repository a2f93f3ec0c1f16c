//! The metadata table: every book the artifacts describe, in matrix row order.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::types::BookRecord;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<BookRecord>,
}

impl Catalog {
    /// Read a JSON array of book records.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|e| LoadError::io(path, &e))?;
        let books: Vec<BookRecord> = serde_json::from_str(&raw).map_err(|e| LoadError::malformed(path, e))?;
        let catalog = Self::from_records(books)?;
        if catalog.is_empty() {
            tracing::warn!(path = %path.display(), "metadata table is empty");
        } else {
            tracing::info!(path = %path.display(), books = catalog.len(), "loaded metadata table");
        }
        Ok(catalog)
    }

    pub fn from_records(books: Vec<BookRecord>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(books.len());
        for b in &books {
            if !seen.insert(b.id.as_str()) {
                return Err(LoadError::Inconsistent(format!("duplicate book id '{}' in metadata", b.id)));
            }
        }
        Ok(Self { books })
    }

    pub fn len(&self) -> usize { self.books.len() }
    pub fn is_empty(&self) -> bool { self.books.is_empty() }
    pub fn get(&self, index: usize) -> Option<&BookRecord> { self.books.get(index) }
    pub fn iter(&self) -> std::slice::Iter<'_, BookRecord> { self.books.iter() }
    pub fn as_slice(&self) -> &[BookRecord] { &self.books }
}
