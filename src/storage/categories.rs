use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    constants::{DEFAULT_CATEGORIES, STORAGE_KEYS},
    domain::{Category, timestamp_id, validate_category_name},
    error::{StorageError, ValidationError},
};

use super::{SharedStore, read_json_key, write_json_key};

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct CategoryRegistry {
    store: SharedStore,
}

impl CategoryRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn defaults() -> Vec<Category> {
        let base = Utc::now().timestamp_millis();
        DEFAULT_CATEGORIES
            .iter()
            .enumerate()
            .map(|(offset, name)| Category {
                id: (base + offset as i64).to_string(),
                name: name.to_string(),
            })
            .collect()
    }

    fn load(&self) -> Result<Vec<Category>, StorageError> {
        if let Some(categories) = read_json_key(self.store.as_ref(), STORAGE_KEYS.categories)? {
            return Ok(categories);
        }

        let seeded = Self::defaults();
        match write_json_key(self.store.as_ref(), STORAGE_KEYS.categories, &seeded) {
            Ok(()) => info!(count = seeded.len(), "seeded default categories"),
            Err(e) => warn!(error = %e, "could not persist default categories"),
        }
        Ok(seeded)
    }

    fn save(&self, categories: &[Category]) -> Result<(), StorageError> {
        write_json_key(self.store.as_ref(), STORAGE_KEYS.categories, categories)
    }

    pub fn list(&self) -> Vec<Category> {
        self.load().unwrap_or_else(|e| {
            warn!(error = %e, "could not read categories, showing none");
            Vec::new()
        })
    }

    pub fn find_by_name(&self, name: &str) -> Option<Category> {
        self.list().into_iter().find(|c| c.name == name)
    }

    pub fn add(&self, name: &str) -> Result<Category, CategoryError> {
        let name = validate_category_name(name)?;
        let mut categories = self.load()?;
        let id = timestamp_id(Utc::now().timestamp_millis(), |candidate| {
            categories.iter().any(|c| c.id == candidate)
        });
        let category = Category { id, name };
        categories.push(category.clone());
        self.save(&categories)
            .inspect_err(|e| error!(error = %e, "adding category failed"))?;
        info!(id = %category.id, name = %category.name, "category added");
        Ok(category)
    }

    pub fn update(&self, id: &str, new_name: &str) -> Result<bool, CategoryError> {
        let name = validate_category_name(new_name)?;
        let mut categories = self.load()?;
        let Some(category) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        category.name = name;
        self.save(&categories)
            .inspect_err(|e| error!(id, error = %e, "renaming category failed"))?;
        Ok(true)
    }

    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut categories = self.load()?;
        categories.retain(|c| c.id != id);
        self.save(&categories)
            .inspect_err(|e| error!(id, error = %e, "deleting category failed"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, test_support::FailingStore};

    fn memory() -> (Arc<MemoryStore>, CategoryRegistry) {
        let backing = Arc::new(MemoryStore::new());
        (backing.clone(), CategoryRegistry::new(backing))
    }

    fn names(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_pristine_store_seeds_five_defaults_once() {
        let (backing, registry) = memory();

        let first = registry.list();
        assert_eq!(names(&first), DEFAULT_CATEGORIES);
        assert!(backing.get(STORAGE_KEYS.categories).unwrap().is_some());

        let second = registry.list();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_ids_are_unique() {
        let (_, registry) = memory();
        let categories = registry.list();
        let mut ids: Vec<_> = categories.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn test_empty_stored_list_is_not_reseeded() {
        let (backing, registry) = memory();
        backing.set(STORAGE_KEYS.categories, "[]").unwrap();
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_add_trims_and_appends() {
        let (_, registry) = memory();
        let added = registry.add("  Writing  ").unwrap();

        assert_eq!(added.name, "Writing");
        let listed = registry.list();
        assert_eq!(listed.len(), DEFAULT_CATEGORIES.len() + 1);
        assert_eq!(listed.last(), Some(&added));
        assert!(listed[..listed.len() - 1].iter().all(|c| c.id != added.id));
    }

    #[test]
    fn test_add_rejects_blank_names() {
        let (_, registry) = memory();
        let before = registry.list();
        let err = registry.add("   ").unwrap_err();
        assert!(matches!(
            err,
            CategoryError::Invalid(ValidationError::EmptyCategoryName)
        ));
        assert_eq!(registry.list(), before);
    }

    #[test]
    fn test_update_renames_by_id() {
        let (_, registry) = memory();
        let target = registry.list()[1].clone();

        assert!(registry.update(&target.id, " Rust ").unwrap());
        assert_eq!(registry.list()[1].name, "Rust");
        assert!(!registry.update("nope", "Other").unwrap());
        assert!(registry.update(&target.id, "").is_err());
        assert_eq!(registry.list()[1].name, "Rust");
    }

    #[test]
    fn test_delete_removes_by_id() {
        let (_, registry) = memory();
        let target = registry.list()[0].clone();

        registry.delete(&target.id).unwrap();
        let listed = registry.list();
        assert_eq!(listed.len(), DEFAULT_CATEGORIES.len() - 1);
        assert!(listed.iter().all(|c| c.id != target.id));

        registry.delete("missing").unwrap();
        assert_eq!(registry.list(), listed);
    }

    #[test]
    fn test_find_by_name() {
        let (_, registry) = memory();
        assert_eq!(
            registry.find_by_name("Reading").map(|c| c.name),
            Some("Reading".to_string())
        );
        assert!(registry.find_by_name("reading").is_none());
    }

    #[test]
    fn test_unwritable_store_still_lists_defaults() {
        let registry = CategoryRegistry::new(Arc::new(FailingStore::writes()));
        assert_eq!(names(&registry.list()), DEFAULT_CATEGORIES);
        assert!(matches!(
            registry.add("New"),
            Err(CategoryError::Storage(_))
        ));
    }

    #[test]
    fn test_malformed_categories_are_left_alone() {
        let (backing, registry) = memory();
        backing.set(STORAGE_KEYS.categories, "oops").unwrap();

        assert!(registry.list().is_empty());
        assert!(registry.add("New").is_err());
        assert_eq!(
            backing.get(STORAGE_KEYS.categories).unwrap().as_deref(),
            Some("oops")
        );
    }
}
