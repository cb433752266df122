pub mod config;
pub mod convert;
pub mod ffi;
pub mod model;
pub mod service;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use convert::{DefaultConverter, RecipeConverter};
pub use model::*;
pub use service::RecipeService;
pub use store::{IngredientStore, LikePattern, RecipeStore, StoreError, TableStore};

uniffi::setup_scaffolding!();
