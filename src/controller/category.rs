//! The category controller and default category seeding.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    EntityId, Outcome, Variant,
    adapter::ServiceAdapter,
    alert::Notifier,
    controller::Controller,
    models::{Category, CategoryChanges, NewCategory, default_categories},
};

/// Manages categories and seeds the default ones for variants that have them.
pub struct CategoryController {
    categories: Controller<Category>,
    seed_on_empty: bool,
    seeded: AtomicBool,
}

impl CategoryController {
    /// Create a controller that persists through `adapter` and reports to `notifier`.
    ///
    /// `variant` decides whether an empty category list triggers seeding.
    pub fn new(
        adapter: Arc<dyn ServiceAdapter<Category>>,
        notifier: Arc<dyn Notifier>,
        variant: Variant,
    ) -> Self {
        Self {
            categories: Controller::new(adapter, notifier),
            seed_on_empty: variant.seeds_default_categories(),
            seeded: AtomicBool::new(false),
        }
    }

    /// The fixed, ordered list of categories used for seeding.
    pub fn default_categories(&self) -> Vec<Category> {
        default_categories()
    }

    /// Get every category.
    ///
    /// When the collection is empty and the variant seeds default categories,
    /// the defaults are created first and the seeded list is returned. A failed
    /// read returns an empty list and never seeds.
    pub async fn list(&self) -> Vec<Category> {
        match self.categories.load().await {
            Some(categories) if categories.is_empty() && self.seed_on_empty => {
                self.seed_defaults().await
            }
            Some(categories) => categories,
            None => Vec::new(),
        }
    }

    /// Create the default categories if there are no categories yet.
    ///
    /// Meant to run once at start-up; later calls on the same controller only
    /// re-read the list. Categories are created one at a time, a failure is
    /// logged and does not stop the others. Returns the list as re-read after
    /// seeding.
    pub async fn seed_defaults(&self) -> Vec<Category> {
        if self.seeded.swap(true, Ordering::SeqCst) {
            tracing::debug!("default categories already seeded, skipping");
            return self.categories.list().await;
        }

        let Some(existing) = self.categories.load().await else {
            // Allow a later call to retry once the backend is reachable.
            self.seeded.store(false, Ordering::SeqCst);
            return Vec::new();
        };

        if !existing.is_empty() {
            tracing::debug!("categories exist, not seeding defaults");
            return existing;
        }

        tracing::info!("seeding default categories");
        for category in default_categories() {
            let id = category.id.clone();

            if let Err(error) = self.categories.adapter().create(category).await.into_result() {
                tracing::error!("could not seed default category \"{id}\": {error}");
            }
        }

        self.categories.list().await
    }

    /// Get the category with identity `id`.
    pub async fn get_by_id(&self, id: &EntityId) -> Option<Category> {
        self.categories.get_by_id(id).await
    }

    /// Create a category.
    pub async fn create(&self, draft: NewCategory) -> Outcome<Category> {
        self.categories.create(draft).await
    }

    /// Overwrite the fields present in `changes` on a category.
    pub async fn update(&self, id: &EntityId, changes: CategoryChanges) -> Outcome<Category> {
        self.categories.update(id, changes).await
    }

    /// Delete a category.
    ///
    /// Records that reference the category are left as they are.
    pub async fn delete(&self, id: &EntityId) -> Outcome {
        self.categories.delete(id).await
    }
}
