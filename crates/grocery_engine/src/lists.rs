use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use grocery_core::{extract_item_names, format_numbered_list, DEFAULT_ITEMS};
use grocery_logging::{grocery_info, grocery_warn};

use crate::persist::{AtomicFileWriter, PersistError};
use crate::translate::{translate_or_original, Translator};

pub const ENGLISH_LIST_FILE: &str = "grocery_list_english.txt";
pub const ITEMS_FILE: &str = "shopping_items.txt";
pub const SPANISH_LIST_FILE: &str = "lista_compras_espanol.txt";

/// Paths written by one save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedLists {
    pub list_path: PathBuf,
    pub items_path: PathBuf,
}

/// Writes the numbered list under `title` plus the one-item-per-line file.
pub fn save_shopping_list(
    dir: &Path,
    title: &str,
    items: &[String],
) -> Result<SavedLists, PersistError> {
    if items.is_empty() {
        return Err(PersistError::NothingToSave);
    }
    save_lists(dir, &format_numbered_list(title, items), items)
}

/// Stores an already translated document verbatim next to its extracted items.
pub fn save_translated_list(
    dir: &Path,
    text: &str,
    items: &[String],
) -> Result<SavedLists, PersistError> {
    if items.is_empty() {
        return Err(PersistError::NothingToSave);
    }
    save_lists(dir, text, items)
}

fn save_lists(dir: &Path, list_text: &str, items: &[String]) -> Result<SavedLists, PersistError> {
    let writer = AtomicFileWriter::new(dir);
    let list_path = writer.write(ENGLISH_LIST_FILE, list_text)?;
    let mut lines = items.join("\n");
    lines.push('\n');
    let items_path = writer.write(ITEMS_FILE, &lines)?;
    grocery_info!("saved {} items to {:?}", items.len(), dir);
    Ok(SavedLists {
        list_path,
        items_path,
    })
}

/// Item names (quantities stripped) from a saved numbered list.
///
/// Falls back to the default items when the file cannot be read.
pub fn load_item_names(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => extract_item_names(&text),
        Err(err) => {
            if err.kind() == io::ErrorKind::NotFound {
                grocery_warn!("{:?} not found, using default items", path);
            } else {
                grocery_warn!("failed to read {:?}: {}, using default items", path, err);
            }
            DEFAULT_ITEMS.iter().map(|item| item.to_string()).collect()
        }
    }
}

/// Translates the local Spanish list in `dir` into the English list file.
pub async fn translate_local_list(
    dir: &Path,
    translator: &dyn Translator,
) -> Result<PathBuf, PersistError> {
    let source = dir.join(SPANISH_LIST_FILE);
    let spanish = match fs::read_to_string(&source) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(PersistError::MissingSource(source))
        }
        Err(err) => return Err(err.into()),
    };
    let english = translate_or_original(translator, &spanish).await;
    AtomicFileWriter::new(dir).write(ENGLISH_LIST_FILE, &english)
}
