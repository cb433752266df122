//! UniFFI bindings for cross-platform support (iOS, Android).
//!
//! This module exposes the recipe service over a [`TableStore`] through
//! FFI-safe records. Identifiers cross the boundary as plain integers and
//! timestamps as RFC 3339 strings.

use crate::config::{ConfigError, StoreConfig};
use crate::convert::DefaultConverter;
use crate::model::{Ingredient, IngredientForm, Recipe, RecipeForm, RecipeId};
use crate::service::RecipeService;
use crate::store::{StoreError, TableStore};
use camino::Utf8Path;
use std::sync::Arc;

type TableService = RecipeService<TableStore, TableStore, DefaultConverter>;

/// FFI-safe error type that wraps all possible errors.
#[derive(Debug, uniffi::Error, thiserror::Error)]
pub enum RecipeBookError {
    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Integrity error: {message}")]
    IntegrityError { message: String },

    #[error("Store error: {message}")]
    StoreError { message: String },
}

impl From<StoreError> for RecipeBookError {
    fn from(e: StoreError) -> Self {
        let message = e.to_string();
        match e {
            StoreError::Io(_) => RecipeBookError::IoError { message },
            StoreError::Yaml(_) | StoreError::Pattern(_) | StoreError::Corrupt(_) => {
                RecipeBookError::ParseError { message }
            }
            StoreError::MissingRecipe(_) | StoreError::RecipeInUse(_) => {
                RecipeBookError::IntegrityError { message }
            }
            StoreError::Unidentified
            | StoreError::IdsExhausted
            | StoreError::Transaction(_)
            | StoreError::Poisoned
            | StoreError::Unavailable(_) => RecipeBookError::StoreError { message },
        }
    }
}

impl From<ConfigError> for RecipeBookError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::IoError(e) => RecipeBookError::IoError {
                message: e.to_string(),
            },
            ConfigError::ParseError(e) => RecipeBookError::ParseError {
                message: e.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for RecipeBookError {
    fn from(e: serde_json::Error) -> Self {
        RecipeBookError::ParseError {
            message: e.to_string(),
        }
    }
}

/// FFI-safe representation of a stored ingredient.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiIngredient {
    pub name: String,
    pub quantity: Option<String>,
}

impl From<&Ingredient> for FfiIngredient {
    fn from(i: &Ingredient) -> Self {
        FfiIngredient {
            name: i.name.clone(),
            quantity: i.quantity.clone(),
        }
    }
}

/// FFI-safe representation of a recipe.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiRecipe {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    /// RFC 3339 timestamp of the last create or update
    pub created_at: Option<String>,
    /// `None` when the ingredients were not loaded
    pub ingredients: Option<Vec<FfiIngredient>>,
}

impl From<&Recipe> for FfiRecipe {
    fn from(r: &Recipe) -> Self {
        FfiRecipe {
            id: r.id.map(|id| id.0),
            title: r.title.clone(),
            description: r.description.clone(),
            instructions: r.instructions.clone(),
            created_at: r.created_at.map(|t| t.to_rfc3339()),
            ingredients: r
                .ingredients
                .as_ref()
                .map(|list| list.iter().map(FfiIngredient::from).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, uniffi::Record)]
pub struct FfiIngredientForm {
    pub name: Option<String>,
    pub quantity: Option<String>,
}

/// FFI-safe representation of a recipe form.
#[derive(Debug, Clone, PartialEq, Default, uniffi::Record)]
pub struct FfiRecipeForm {
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Option<Vec<FfiIngredientForm>>,
}

impl From<FfiRecipeForm> for RecipeForm {
    fn from(f: FfiRecipeForm) -> Self {
        RecipeForm {
            title: f.title,
            description: f.description,
            instructions: f.instructions,
            ingredients: f.ingredients.map(|list| {
                list.into_iter()
                    .map(|i| IngredientForm {
                        name: i.name,
                        quantity: i.quantity,
                    })
                    .collect()
            }),
        }
    }
}

impl From<RecipeForm> for FfiRecipeForm {
    fn from(f: RecipeForm) -> Self {
        FfiRecipeForm {
            title: f.title,
            description: f.description,
            instructions: f.instructions,
            ingredients: f.ingredients.map(|list| {
                list.into_iter()
                    .map(|i| FfiIngredientForm {
                        name: i.name,
                        quantity: i.quantity,
                    })
                    .collect()
            }),
        }
    }
}

/// Recipe service over a table store, in memory or persisted to a YAML file.
#[derive(uniffi::Object)]
pub struct FfiRecipeService {
    inner: TableService,
}

impl FfiRecipeService {
    fn new(store: TableStore) -> Arc<Self> {
        Arc::new(FfiRecipeService {
            inner: RecipeService::new(store.clone(), store, DefaultConverter),
        })
    }
}

#[uniffi::export]
impl FfiRecipeService {
    /// Creates a service whose data lives only as long as the object.
    #[uniffi::constructor]
    pub fn in_memory() -> Arc<Self> {
        Self::new(TableStore::in_memory())
    }

    /// Opens a service persisted to the YAML data file at `path`.
    #[uniffi::constructor]
    pub fn open(path: String, case_insensitive_search: bool) -> Result<Arc<Self>, RecipeBookError> {
        let config = StoreConfig {
            data_file: Some(path.into()),
            case_insensitive_search,
        };
        Ok(Self::new(TableStore::from_config(&config)?))
    }

    /// Opens a service described by a YAML configuration file.
    #[uniffi::constructor]
    pub fn from_config_file(path: String) -> Result<Arc<Self>, RecipeBookError> {
        let config = StoreConfig::load(Utf8Path::new(&path))?;
        Ok(Self::new(TableStore::from_config(&config)?))
    }

    /// Returns all recipes without their ingredients.
    pub fn list_all(&self) -> Result<Vec<FfiRecipe>, RecipeBookError> {
        Ok(self.inner.list_all()?.iter().map(FfiRecipe::from).collect())
    }

    /// Returns a recipe with its ingredients, or nothing if it does not exist.
    pub fn get_by_id(&self, id: i64) -> Result<Option<FfiRecipe>, RecipeBookError> {
        Ok(self.inner.get_by_id(RecipeId(id))?.as_ref().map(FfiRecipe::from))
    }

    /// Creates a recipe and returns its id.
    pub fn create(&self, form: FfiRecipeForm) -> Result<i64, RecipeBookError> {
        Ok(self.inner.create(&form.into())?.0)
    }

    pub fn update(&self, id: i64, form: FfiRecipeForm) -> Result<(), RecipeBookError> {
        Ok(self.inner.update(RecipeId(id), &form.into())?)
    }

    pub fn delete(&self, id: i64) -> Result<(), RecipeBookError> {
        Ok(self.inner.delete(RecipeId(id))?)
    }

    /// Returns the recipes whose title contains `keyword`.
    pub fn search(&self, keyword: String) -> Result<Vec<FfiRecipe>, RecipeBookError> {
        Ok(self
            .inner
            .search(&keyword)?
            .iter()
            .map(FfiRecipe::from)
            .collect())
    }

    /// Returns the edit form of a recipe, ingredients included.
    pub fn form_for(&self, id: i64) -> Result<Option<FfiRecipeForm>, RecipeBookError> {
        Ok(self.inner.form_for(RecipeId(id))?.map(FfiRecipeForm::from))
    }

    /// Returns a recipe and its ingredients as a JSON string.
    pub fn recipe_json(&self, id: i64) -> Result<Option<String>, RecipeBookError> {
        let Some(recipe) = self.inner.get_by_id(RecipeId(id))? else {
            return Ok(None);
        };

        let mut value = serde_json::to_value(&recipe)?;
        if let Some(object) = value.as_object_mut() {
            object.insert(
                "ingredients".to_string(),
                serde_json::to_value(recipe.ingredients())?,
            );
        }
        Ok(Some(serde_json::to_string(&value)?))
    }
}

/// Returns the library version.
#[uniffi::export]
pub fn library_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
