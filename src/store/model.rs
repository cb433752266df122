use super::StoreError;
use crate::model::{Ingredient, Recipe, RecipeId};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The two tables behind a [`super::TableStore`].
///
/// Recipes are kept sorted by id, ingredients in insertion order. Every
/// mutating method validates before it writes, so a failed call leaves the
/// tables untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Tables {
    /// Next identifier to hand out
    #[serde(default = "first_id")]
    pub(crate) next_id: i64,
    #[serde(default)]
    pub(crate) recipes: Vec<Recipe>,
    #[serde(default)]
    pub(crate) ingredients: Vec<Ingredient>,
}

fn first_id() -> i64 {
    1
}

impl Default for Tables {
    fn default() -> Self {
        Tables {
            next_id: first_id(),
            recipes: Vec::new(),
            ingredients: Vec::new(),
        }
    }
}

impl Tables {
    /// Checks tables read from disk and restores their id ordering and counter.
    ///
    /// Rejects recipes without an id, duplicate ids, ingredients whose recipe
    /// is missing, and counters that leave no id to hand out.
    pub(crate) fn validate(&mut self) -> Result<(), StoreError> {
        let mut ids = Vec::with_capacity(self.recipes.len());
        for recipe in &self.recipes {
            let id = recipe.id.ok_or_else(|| {
                StoreError::Corrupt(format!("recipe {:?} has no id", recipe.title))
            })?;
            ids.push(id);
        }
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(StoreError::Corrupt(format!(
                "recipe id {} is used more than once",
                pair[0]
            )));
        }
        if let Some(orphan) = self
            .ingredients
            .iter()
            .find(|i| ids.binary_search(&i.recipe_id).is_err())
        {
            return Err(StoreError::Corrupt(format!(
                "ingredient {:?} belongs to missing recipe {}",
                orphan.name, orphan.recipe_id
            )));
        }

        let after_highest = match ids.last() {
            Some(highest) => highest.0.checked_add(1).ok_or(StoreError::IdsExhausted)?,
            None => first_id(),
        };
        if self.next_id == i64::MAX {
            return Err(StoreError::IdsExhausted);
        }
        self.recipes.sort_by_key(|r| r.id);
        self.next_id = self.next_id.max(after_highest);
        Ok(())
    }

    fn position(&self, id: RecipeId) -> Option<usize> {
        self.recipes
            .binary_search_by_key(&Some(id), |r| r.id)
            .ok()
    }

    pub(crate) fn find_all(&self) -> Vec<Recipe> {
        self.recipes.clone()
    }

    pub(crate) fn find_by_id(&self, id: RecipeId) -> Option<Recipe> {
        self.position(id).map(|pos| self.recipes[pos].clone())
    }

    pub(crate) fn insert(&mut self, recipe: &mut Recipe) -> Result<RecipeId, StoreError> {
        let id = RecipeId(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        recipe.id = Some(id);

        let mut row = recipe.clone();
        row.ingredients = None;
        self.recipes.push(row);
        Ok(id)
    }

    /// Returns whether a row was changed.
    pub(crate) fn update(&mut self, recipe: &Recipe) -> Result<bool, StoreError> {
        let id = recipe.id.ok_or(StoreError::Unidentified)?;
        let Some(pos) = self.position(id) else {
            return Ok(false);
        };

        let row = &mut self.recipes[pos];
        row.title = recipe.title.clone();
        row.description = recipe.description.clone();
        row.instructions = recipe.instructions.clone();
        row.created_at = recipe.created_at;
        Ok(true)
    }

    /// Returns whether a row was removed.
    pub(crate) fn delete_recipe(&mut self, id: RecipeId) -> Result<bool, StoreError> {
        if self.ingredients.iter().any(|i| i.recipe_id == id) {
            return Err(StoreError::RecipeInUse(id));
        }
        Ok(match self.position(id) {
            Some(pos) => {
                self.recipes.remove(pos);
                true
            }
            None => false,
        })
    }

    pub(crate) fn find_by_title(&self, title: &Regex) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|r| title.is_match(&r.title))
            .cloned()
            .collect()
    }

    pub(crate) fn find_ingredients(&self, id: RecipeId) -> Vec<Ingredient> {
        self.ingredients
            .iter()
            .filter(|i| i.recipe_id == id)
            .cloned()
            .collect()
    }

    pub(crate) fn insert_ingredient(
        &mut self,
        name: &str,
        quantity: Option<&str>,
        recipe_id: RecipeId,
    ) -> Result<(), StoreError> {
        if self.position(recipe_id).is_none() {
            return Err(StoreError::MissingRecipe(recipe_id));
        }
        self.ingredients.push(Ingredient {
            name: name.to_string(),
            quantity: quantity.map(str::to_string),
            recipe_id,
        });
        Ok(())
    }

    /// Returns the number of removed rows.
    pub(crate) fn delete_ingredients(&mut self, id: RecipeId) -> usize {
        let before = self.ingredients.len();
        self.ingredients.retain(|i| i.recipe_id != id);
        before - self.ingredients.len()
    }
}
