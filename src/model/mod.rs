//! Recipe and ingredient entities plus their boundary forms.
//!
//! Entities are what the stores persist. Forms are what callers hand in and
//! get back at the edges of the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

mod form;

pub use form::{IngredientForm, RecipeForm};

/// Store-assigned identifier of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub i64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecipeId {
    fn from(id: i64) -> Self {
        RecipeId(id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recipe {
    /// Identifier, `None` until the store assigns one on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecipeId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Stamped by the service on every create and update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Owned ingredients, `None` when they were not loaded
    #[serde(skip)]
    pub ingredients: Option<Vec<Ingredient>>,
}

impl Recipe {
    /// Creates an unsaved recipe with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Recipe {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Returns the loaded ingredients, or an empty slice when none were loaded.
    pub fn ingredients(&self) -> &[Ingredient] {
        self.ingredients.as_deref().unwrap_or_default()
    }
}

/// An ingredient row. It only exists as part of its owning recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub recipe_id: RecipeId,
}
