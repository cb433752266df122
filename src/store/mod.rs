//! Persistence collaborators of the recipe service.
//!
//! The service only talks to the [`RecipeStore`] and [`IngredientStore`]
//! traits. [`TableStore`] implements both, in memory or backed by a YAML
//! data file.

use crate::model::{Ingredient, Recipe, RecipeId};
use thiserror::Error;

mod file;
mod model;
mod pattern;
mod table;

pub use pattern::LikePattern;
pub use table::TableStore;

/// Errors raised by store implementations.
///
/// The service hands these back to its caller unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize data file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid title pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Recipe {0} does not exist")]
    MissingRecipe(RecipeId),

    #[error("Recipe {0} still has ingredients")]
    RecipeInUse(RecipeId),

    #[error("Recipe has no id")]
    Unidentified,

    #[error("Data file is inconsistent: {0}")]
    Corrupt(String),

    #[error("No recipe ids left to assign")]
    IdsExhausted,

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence of recipe rows.
///
/// Recipes returned by a store never carry ingredients; the service
/// attaches them when needed.
pub trait RecipeStore {
    /// Returns every recipe.
    fn find_all(&self) -> Result<Vec<Recipe>, StoreError>;

    /// Returns the recipe with `id`, or `None` if there is none.
    fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError>;

    /// Persists a new recipe and writes the generated id back into it.
    fn insert(&self, recipe: &mut Recipe) -> Result<RecipeId, StoreError>;

    /// Overwrites every mutable field of the stored recipe with the same id.
    ///
    /// Updating an id that is not stored changes nothing.
    fn update(&self, recipe: &Recipe) -> Result<(), StoreError>;

    fn delete_by_id(&self, id: RecipeId) -> Result<(), StoreError>;

    /// Returns the recipes whose whole title matches `pattern`.
    fn find_by_title_like(&self, pattern: &LikePattern) -> Result<Vec<Recipe>, StoreError>;

    /// Opens a transaction covering every store sharing this backend.
    ///
    /// Stores without transactions keep the no-op defaults.
    fn begin(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn rollback(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Persistence of ingredient rows, always addressed through their recipe.
pub trait IngredientStore {
    fn find_ingredients_by_recipe_id(&self, id: RecipeId) -> Result<Vec<Ingredient>, StoreError>;

    fn insert_ingredient(
        &self,
        name: &str,
        quantity: Option<&str>,
        recipe_id: RecipeId,
    ) -> Result<(), StoreError>;

    fn delete_by_recipe_id(&self, id: RecipeId) -> Result<(), StoreError>;
}
