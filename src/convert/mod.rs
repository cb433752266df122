//! Conversion between recipe forms and recipe entities.

use crate::model::{Recipe, RecipeForm};

/// Maps the scalar fields of a recipe between its form and entity shapes.
///
/// Implementations do not touch identifiers, timestamps or ingredient
/// lists; the service owns those.
pub trait RecipeConverter {
    /// Builds an unsaved entity from a form.
    fn to_entity(&self, form: &RecipeForm) -> Recipe;

    /// Builds a form from an entity, leaving the ingredient list unset.
    fn to_form(&self, recipe: &Recipe) -> RecipeForm;
}

/// Field-by-field converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl RecipeConverter for DefaultConverter {
    fn to_entity(&self, form: &RecipeForm) -> Recipe {
        Recipe {
            title: form.title.clone(),
            description: form.description.clone(),
            instructions: form.instructions.clone(),
            ..Default::default()
        }
    }

    fn to_form(&self, recipe: &Recipe) -> RecipeForm {
        RecipeForm {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            instructions: recipe.instructions.clone(),
            ingredients: None,
        }
    }
}
