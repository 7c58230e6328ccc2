//! RON catalogue loader for spells, items and class tables.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::{CharacterClass, ItemDefinition, SpellDefinition};

use crate::classes::ClassProgression;
use crate::loaders::{LoadResult, read_file};

/// Loader for RON catalogue files.
///
/// Spell and item files hold a list of definitions; the class file maps a
/// class to its progression table.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load_spells(path: &Path) -> LoadResult<Vec<SpellDefinition>> {
        parse(path, "spell catalogue")
    }

    pub fn load_items(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        parse(path, "item catalogue")
    }

    pub fn load_classes(path: &Path) -> LoadResult<BTreeMap<CharacterClass, ClassProgression>> {
        parse(path, "class table")
    }
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON {}: {}", what, path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ItemEffect, SpellEffectKind};
    use std::io::Write;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn spells_parse_with_defaults() {
        let file = write(
            r#"[
                (
                    id: "spell-spark",
                    name: "Spark",
                    manaCost: 5,
                    cooldown: 0,
                    element: fire,
                    effect: (kind: damage, value: 12),
                ),
            ]"#,
        );
        let spells = CatalogLoader::load_spells(file.path()).unwrap();
        assert_eq!(spells.len(), 1);
        assert_eq!(spells[0].effect.kind, SpellEffectKind::Damage);
        assert_eq!(spells[0].effect.duration, None);
        assert!(spells[0].description.is_empty());
    }

    #[test]
    fn items_parse() {
        let file = write(r#"[(id: "item-duck", name: "Duck", effect: cleanse)]"#);
        let items = CatalogLoader::load_items(file.path()).unwrap();
        assert_eq!(items[0].effect, ItemEffect::Cleanse);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = CatalogLoader::load_items(Path::new("/nonexistent/items.ron")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/items.ron"));
    }
}
