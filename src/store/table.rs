use super::file::{load_tables, save_tables};
use super::model::Tables;
use super::{IngredientStore, LikePattern, RecipeStore, StoreError};
use crate::config::StoreConfig;
use crate::model::{Ingredient, Recipe, RecipeId};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

/// Recipe and ingredient tables behind one shared handle.
///
/// Clones share the same tables, so one `TableStore` can serve as both the
/// recipe store and the ingredient store of a service, and a transaction
/// opened through either covers both. When a data file is configured the
/// tables are written to it after every mutation made outside a
/// transaction, and on commit.
///
/// A transaction belongs to the thread that began it. Every other thread
/// blocks on its next store call until that transaction is committed or
/// rolled back, so it never observes rows that may still be undone.
#[derive(Debug, Clone)]
pub struct TableStore {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    /// Signalled whenever a transaction ends
    released: Condvar,
    data_file: Option<Utf8PathBuf>,
    case_insensitive_search: bool,
}

#[derive(Debug, Default)]
struct State {
    tables: Tables,
    transaction: Option<Transaction>,
}

#[derive(Debug)]
struct Transaction {
    owner: ThreadId,
    /// Tables as they were when the transaction began
    snapshot: Tables,
}

impl TableStore {
    /// Creates an empty store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::with_tables(Tables::default(), None, false)
    }

    /// Opens a store persisted to `path`, loading the file if it exists.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, StoreError> {
        Self::from_config(&StoreConfig::with_data_file(path.as_ref()))
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let tables = match &config.data_file {
            Some(path) => load_tables(path)?,
            None => Tables::default(),
        };
        Ok(Self::with_tables(
            tables,
            config.data_file.clone(),
            config.case_insensitive_search,
        ))
    }

    fn with_tables(
        tables: Tables,
        data_file: Option<Utf8PathBuf>,
        case_insensitive_search: bool,
    ) -> Self {
        TableStore {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    tables,
                    transaction: None,
                }),
                released: Condvar::new(),
                data_file,
                case_insensitive_search,
            }),
        }
    }

    pub fn data_file(&self) -> Option<&Utf8Path> {
        self.shared.data_file.as_deref()
    }

    /// True while the calling thread has a transaction open.
    pub fn in_transaction(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.transaction.is_some())
    }

    /// Locks the tables, first waiting out any transaction of another thread.
    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        let me = thread::current().id();
        let mut state = self.shared.state.lock().map_err(|_| StoreError::Poisoned)?;
        while state
            .transaction
            .as_ref()
            .is_some_and(|txn| txn.owner != me)
        {
            state = self
                .shared
                .released
                .wait(state)
                .map_err(|_| StoreError::Poisoned)?;
        }
        Ok(state)
    }

    /// Ends the calling thread's transaction and wakes waiting threads.
    fn finish(&self, state: &mut State) -> Result<Tables, StoreError> {
        let txn = state.transaction.take().ok_or_else(|| {
            StoreError::Transaction("no transaction in progress".to_string())
        })?;
        self.shared.released.notify_all();
        Ok(txn.snapshot)
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        Ok(f(&self.lock()?.tables))
    }

    /// Applies a mutation, persisting it unless a transaction is open.
    ///
    /// If the data file cannot be written the mutation is undone.
    fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.lock()?;
        let persist_now = state.transaction.is_none() && self.shared.data_file.is_some();
        let before = persist_now.then(|| state.tables.clone());

        let value = f(&mut state.tables)?;

        if let Some(before) = before {
            if let Err(e) = self.persist(&state.tables) {
                state.tables = before;
                return Err(e);
            }
        }
        Ok(value)
    }

    fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
        match &self.shared.data_file {
            Some(path) => save_tables(path, tables),
            None => Ok(()),
        }
    }
}

impl RecipeStore for TableStore {
    fn find_all(&self) -> Result<Vec<Recipe>, StoreError> {
        self.read(Tables::find_all)
    }

    fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        self.read(|tables| tables.find_by_id(id))
    }

    fn insert(&self, recipe: &mut Recipe) -> Result<RecipeId, StoreError> {
        self.write(|tables| tables.insert(recipe))
    }

    fn update(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let updated = self.write(|tables| tables.update(recipe))?;
        if !updated {
            tracing::debug!(id = ?recipe.id, "update matched no recipe");
        }
        Ok(())
    }

    fn delete_by_id(&self, id: RecipeId) -> Result<(), StoreError> {
        let deleted = self.write(|tables| tables.delete_recipe(id))?;
        if !deleted {
            tracing::debug!(%id, "delete matched no recipe");
        }
        Ok(())
    }

    fn find_by_title_like(&self, pattern: &LikePattern) -> Result<Vec<Recipe>, StoreError> {
        let regex = pattern.to_regex(self.shared.case_insensitive_search)?;
        self.read(|tables| tables.find_by_title(&regex))
    }

    fn begin(&self) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.transaction.is_some() {
            return Err(StoreError::Transaction(
                "transaction already in progress".to_string(),
            ));
        }
        state.transaction = Some(Transaction {
            owner: thread::current().id(),
            snapshot: state.tables.clone(),
        });
        Ok(())
    }

    fn commit(&self) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let snapshot = self.finish(&mut state)?;

        if let Err(e) = self.persist(&state.tables) {
            state.tables = snapshot;
            return Err(e);
        }
        Ok(())
    }

    fn rollback(&self) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let snapshot = self.finish(&mut state)?;
        state.tables = snapshot;
        Ok(())
    }
}

impl IngredientStore for TableStore {
    fn find_ingredients_by_recipe_id(&self, id: RecipeId) -> Result<Vec<Ingredient>, StoreError> {
        self.read(|tables| tables.find_ingredients(id))
    }

    fn insert_ingredient(
        &self,
        name: &str,
        quantity: Option<&str>,
        recipe_id: RecipeId,
    ) -> Result<(), StoreError> {
        self.write(|tables| tables.insert_ingredient(name, quantity, recipe_id))
    }

    fn delete_by_recipe_id(&self, id: RecipeId) -> Result<(), StoreError> {
        let removed = self.write(|tables| Ok(tables.delete_ingredients(id)))?;
        tracing::trace!(%id, removed, "deleted ingredients");
        Ok(())
    }
}
