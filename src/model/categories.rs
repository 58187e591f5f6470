// Category ordering — the one piece of process-wide state in a build.
//
// Every dense vector slot is owned by exactly one category, so the
// category→index mapping must exist before any vector is assembled and must
// not change for the duration of the run. It is built once from the
// category registry and shared read-only afterwards.

use std::collections::HashMap;

use crate::relation::Relation;

use super::error::ModelError;

/// Immutable categoryId → dense index mapping, 0..N-1.
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    index: HashMap<String, usize>,
    ordered: Vec<String>,
}

impl CategoryIndex {
    /// Build the index from the category registry, in first-seen order.
    /// Repeated registry rows for the same category keep the first slot.
    pub fn from_registry(categories: &Relation<String, u64>) -> Self {
        let mut index = HashMap::new();
        let mut ordered = Vec::new();
        for (category, _product_count) in categories.iter() {
            if !index.contains_key(category) {
                index.insert(category.clone(), ordered.len());
                ordered.push(category.clone());
            }
        }
        Self { index, ordered }
    }

    /// Number of known categories — the length of every dense vector.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Dense index of a category. Unregistered categories are an error, not
    /// a default slot.
    pub fn index_of(&self, category: &str) -> Result<usize, ModelError> {
        self.index
            .get(category)
            .copied()
            .ok_or_else(|| ModelError::UnknownCategory(category.to_string()))
    }

    /// Category occupying a given slot.
    pub fn category_at(&self, index: usize) -> Option<&str> {
        self.ordered.get(index).map(|s| s.as_str())
    }

    /// All categories in slot order.
    pub fn categories(&self) -> &[String] {
        &self.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(ids: &[&str]) -> Relation<String, u64> {
        ids.iter()
            .map(|id| (id.to_string(), 1u64))
            .collect()
    }

    #[test]
    fn test_indices_are_dense_and_distinct() {
        let index = CategoryIndex::from_registry(&registry(&["books", "games", "garden"]));
        assert_eq!(index.len(), 3);
        let mut seen: Vec<usize> = index
            .categories()
            .iter()
            .map(|c| index.index_of(c).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_registration_keeps_first_slot() {
        let index = CategoryIndex::from_registry(&registry(&["books", "games", "books"]));
        assert_eq!(index.len(), 2);
        assert_eq!(index.index_of("books").unwrap(), 0);
        assert_eq!(index.index_of("games").unwrap(), 1);
    }

    #[test]
    fn test_unknown_category_errors() {
        let index = CategoryIndex::from_registry(&registry(&["books"]));
        let err = index.index_of("toys").unwrap_err();
        assert_eq!(err, ModelError::UnknownCategory("toys".to_string()));
    }

    #[test]
    fn test_category_at_round_trips() {
        let index = CategoryIndex::from_registry(&registry(&["books", "games"]));
        assert_eq!(index.category_at(1), Some("games"));
        assert_eq!(index.category_at(5), None);
    }
}
