//! Recipe CRUD and search on top of the store and converter collaborators.

use crate::convert::RecipeConverter;
use crate::model::{Ingredient, IngredientForm, Recipe, RecipeForm, RecipeId};
use crate::store::{IngredientStore, LikePattern, RecipeStore, StoreError};
use chrono::{DateTime, Utc};

/// Coordinates recipe and ingredient persistence.
///
/// Ingredients have no lifecycle of their own: they are written and removed
/// only while creating, updating or deleting their recipe. Every multi-step
/// mutation runs inside the recipe store's transaction hooks, and any store
/// error is returned to the caller unchanged.
///
/// # Examples
///
/// ```
/// use recipe_book::{DefaultConverter, RecipeForm, RecipeService, TableStore};
///
/// let store = TableStore::in_memory();
/// let service = RecipeService::new(store.clone(), store, DefaultConverter);
///
/// let form = RecipeForm::new("Soup")
///     .with_ingredient("Salt", "1tsp")
///     .with_ingredient("", "2");
/// let id = service.create(&form)?;
///
/// let recipe = service.get_by_id(id)?.expect("just created");
/// assert_eq!(recipe.ingredients().len(), 1);
/// # Ok::<(), recipe_book::StoreError>(())
/// ```
pub struct RecipeService<R, I, C> {
    recipes: R,
    ingredients: I,
    converter: C,
    clock: fn() -> DateTime<Utc>,
}

impl<R, I, C> RecipeService<R, I, C>
where
    R: RecipeStore,
    I: IngredientStore,
    C: RecipeConverter,
{
    pub fn new(recipes: R, ingredients: I, converter: C) -> Self {
        RecipeService {
            recipes,
            ingredients,
            converter,
            clock: Utc::now,
        }
    }

    /// Replaces the source of the timestamps stamped on create and update.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns every recipe, without ingredients.
    pub fn list_all(&self) -> Result<Vec<Recipe>, StoreError> {
        self.recipes.find_all()
    }

    /// Returns the recipe with its ingredients, or `None` if it does not exist.
    pub fn get_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        let Some(mut recipe) = self.recipes.find_by_id(id)? else {
            tracing::debug!(%id, "recipe not found");
            return Ok(None);
        };

        recipe.ingredients = Some(self.ingredients.find_ingredients_by_recipe_id(id)?);
        Ok(Some(recipe))
    }

    /// Persists a new recipe and its named ingredients, returning the new id.
    pub fn create(&self, form: &RecipeForm) -> Result<RecipeId, StoreError> {
        let mut recipe = self.converter.to_entity(form);
        recipe.created_at = Some((self.clock)());

        let id = self.in_transaction(|| {
            let id = self.recipes.insert(&mut recipe)?;
            self.insert_ingredients(id, form)?;
            Ok(id)
        })?;

        tracing::info!(%id, title = %recipe.title, "created recipe");
        Ok(id)
    }

    /// Overwrites the recipe `id` and replaces all of its ingredients.
    pub fn update(&self, id: RecipeId, form: &RecipeForm) -> Result<(), StoreError> {
        let mut recipe = self.converter.to_entity(form);
        recipe.id = Some(id);
        recipe.created_at = Some((self.clock)());

        self.in_transaction(|| {
            self.recipes.update(&recipe)?;
            self.ingredients.delete_by_recipe_id(id)?;
            self.insert_ingredients(id, form)
        })?;

        tracing::info!(%id, "updated recipe");
        Ok(())
    }

    /// Deletes the ingredients of `id`, then the recipe itself.
    pub fn delete(&self, id: RecipeId) -> Result<(), StoreError> {
        self.in_transaction(|| {
            self.ingredients.delete_by_recipe_id(id)?;
            self.recipes.delete_by_id(id)
        })?;

        tracing::info!(%id, "deleted recipe");
        Ok(())
    }

    /// Returns the recipes whose title contains `keyword`.
    pub fn search(&self, keyword: &str) -> Result<Vec<Recipe>, StoreError> {
        let pattern = LikePattern::contains(keyword);
        tracing::debug!(%pattern, "searching recipes by title");
        self.recipes.find_by_title_like(&pattern)
    }

    /// Builds the form of a recipe, copying its ingredients if they are loaded.
    pub fn convert_to_form(&self, recipe: &Recipe) -> RecipeForm {
        let mut form = self.converter.to_form(recipe);
        if let Some(ingredients) = &recipe.ingredients {
            form.ingredients = Some(ingredients.iter().map(ingredient_to_form).collect());
        }
        form
    }

    /// Loads a recipe and returns it as a form, or `None` if it does not exist.
    pub fn form_for(&self, id: RecipeId) -> Result<Option<RecipeForm>, StoreError> {
        Ok(self
            .get_by_id(id)?
            .map(|recipe| self.convert_to_form(&recipe)))
    }

    fn insert_ingredients(&self, id: RecipeId, form: &RecipeForm) -> Result<(), StoreError> {
        for ingredient in form.ingredients.iter().flatten() {
            match ingredient.name.as_deref() {
                Some(name) if ingredient.has_name() => {
                    self.ingredients
                        .insert_ingredient(name, ingredient.quantity.as_deref(), id)?;
                }
                _ => tracing::debug!(%id, "skipping ingredient without a name"),
            }
        }
        Ok(())
    }

    /// Runs `f` between `begin` and `commit`, rolling back if it fails.
    ///
    /// The error of `f` is returned as is; a failed rollback is only logged.
    fn in_transaction<T>(
        &self,
        f: impl FnOnce() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.recipes.begin()?;
        match f() {
            Ok(value) => {
                self.recipes.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = self.recipes.rollback() {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(e)
            }
        }
    }
}

fn ingredient_to_form(ingredient: &Ingredient) -> IngredientForm {
    IngredientForm {
        name: Some(ingredient.name.clone()),
        quantity: ingredient.quantity.clone(),
    }
}
