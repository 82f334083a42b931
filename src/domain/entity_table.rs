use serde::{Deserialize, Serialize};

/// Ordered, in-memory collection of same-shaped records for one entity.
///
/// Rows are kept in insertion order and are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityTable<T> {
    rows: Vec<T>,
}

impl<T> Default for EntityTable<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T> EntityTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<T>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, rows: I) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    /// Keep rows matching `keep`, returning how many were removed
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) -> usize {
        let before = self.rows.len();
        self.rows.retain(keep);
        before - self.rows.len()
    }
}

impl<T> FromIterator<T> for EntityTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { rows: iter.into_iter().collect() }
    }
}

impl<T> IntoIterator for EntityTable<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a EntityTable<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
