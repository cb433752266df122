use serde::{Deserialize, Serialize};

/// Input/output shape of a recipe at the service boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecipeForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    /// `None` when the caller sent no ingredient list at all
    #[serde(default)]
    pub ingredients: Option<Vec<IngredientForm>>,
}

impl RecipeForm {
    pub fn new(title: impl Into<String>) -> Self {
        RecipeForm {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Adds an ingredient row, creating the list if it was unset.
    pub fn with_ingredient(mut self, name: &str, quantity: &str) -> Self {
        self.ingredients
            .get_or_insert_with(Vec::new)
            .push(IngredientForm::new(name, quantity));
        self
    }

    /// Ingredient rows that would be persisted: those with a non-blank name.
    pub fn named_ingredients(&self) -> impl Iterator<Item = &IngredientForm> {
        self.ingredients
            .iter()
            .flatten()
            .filter(|ingredient| ingredient.has_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngredientForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
}

impl IngredientForm {
    pub fn new(name: &str, quantity: &str) -> Self {
        IngredientForm {
            name: Some(name.to_string()),
            quantity: Some(quantity.to_string()),
        }
    }

    /// True when the name is present and not only whitespace.
    pub fn has_name(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}
