//! YAML data file behind a persistent [`super::TableStore`].

use super::model::Tables;
use super::StoreError;
use camino::Utf8Path;
use std::fs;
use std::io::{ErrorKind, Write};
use tempfile::NamedTempFile;

/// Reads the tables from `path`. A missing or empty file yields empty tables.
pub(crate) fn load_tables(path: &Utf8Path) -> Result<Tables, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(%path, "data file not found, starting empty");
            return Ok(Tables::default());
        }
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(Tables::default());
    }

    let mut tables: Tables = serde_yaml::from_str(&content)?;
    tables.validate()?;
    tracing::debug!(
        %path,
        recipes = tables.recipes.len(),
        ingredients = tables.ingredients.len(),
        "loaded data file"
    );
    Ok(tables)
}

/// Writes the tables to `path` through a uniquely named temporary sibling.
pub(crate) fn save_tables(path: &Utf8Path, tables: &Tables) -> Result<(), StoreError> {
    let yaml = serde_yaml::to_string(tables)?;

    let dir = match path.parent().filter(|p| !p.as_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Utf8Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(yaml.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Recipe, RecipeId};
    use camino::Utf8PathBuf;
    use indoc::indoc;
    use tempfile::TempDir;

    fn temp_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_missing_and_empty_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_path(&temp_dir, "recipes.yaml");
        assert_eq!(load_tables(&path).unwrap(), Tables::default());

        fs::write(&path, "\n").unwrap();
        assert_eq!(load_tables(&path).unwrap(), Tables::default());
    }

    #[test]
    fn test_load_data_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_path(&temp_dir, "recipes.yaml");
        fs::write(
            &path,
            indoc! {r#"
                recipes:
                  - id: 2
                    title: Bread
                  - id: 1
                    title: Soup
                    created_at: 2026-01-01T00:00:00Z
                ingredients:
                  - name: Salt
                    quantity: 1tsp
                    recipe_id: 1
            "#},
        )
        .unwrap();

        let tables = load_tables(&path).unwrap();
        assert_eq!(tables.next_id, 3);
        assert_eq!(tables.recipes[0].title, "Soup");
        assert!(tables.recipes[0].created_at.is_some());
        assert_eq!(tables.find_ingredients(RecipeId(1)).len(), 1);
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_path(&temp_dir, "nested/dir/recipes.yaml");

        let mut tables = Tables::default();
        tables.insert(&mut Recipe::new("Soup")).unwrap();
        save_tables(&path, &tables).unwrap();
        save_tables(&path, &tables).unwrap();

        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["recipes.yaml"]);
        assert_eq!(load_tables(&path).unwrap(), tables);
    }

    #[test]
    fn test_concurrent_saves_do_not_clobber() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_path(&temp_dir, "recipes.yaml");

        let mut tables = Tables::default();
        tables.insert(&mut Recipe::new("Soup")).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..20 {
                        save_tables(&path, &tables).unwrap();
                    }
                });
            }
        });

        assert_eq!(load_tables(&path).unwrap(), tables);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_inconsistent_data_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_path(&temp_dir, "recipes.yaml");

        fs::write(
            &path,
            indoc! {r#"
                recipes:
                  - id: 1
                    title: Soup
                  - id: 1
                    title: Bread
            "#},
        )
        .unwrap();
        assert!(matches!(load_tables(&path), Err(StoreError::Corrupt(_))));

        fs::write(
            &path,
            indoc! {r#"
                recipes:
                  - id: 1
                    title: Soup
                ingredients:
                  - name: Salt
                    recipe_id: 7
            "#},
        )
        .unwrap();
        assert!(matches!(load_tables(&path), Err(StoreError::Corrupt(_))));

        fs::write(
            &path,
            indoc! {r#"
                recipes:
                  - id: 9223372036854775807
                    title: Last
            "#},
        )
        .unwrap();
        assert!(matches!(load_tables(&path), Err(StoreError::IdsExhausted)));
    }

    #[test]
    fn test_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_path(&temp_dir, "recipes.yaml");
        fs::write(&path, "recipes: [unclosed").unwrap();
        assert!(matches!(load_tables(&path), Err(StoreError::Yaml(_))));
    }
}
