/// Items used when a list yields nothing usable.
pub const DEFAULT_ITEMS: &[&str] = &["milk", "eggs", "bread"];

/// Built-in list used when the shared document cannot be fetched.
pub const SAMPLE_SPANISH_LIST: &str = "Lista de Compras - Supermercado

1. Leche - 2 litros
2. Huevos - 1 docena
3. Pan - 2 barras
4. Manzanas - 1 kilo
5. Pollo - 1 kilo
6. Arroz - 1 paquete
7. Queso - 200 gramos";

/// Extracts `"{item} - {quantity}"` entries from a numbered list.
///
/// Only lines containing `". "` contribute; heading lines are skipped.
pub fn extract_items_with_quantities(text: &str) -> Vec<String> {
    with_default(text.lines().filter_map(numbered_entry).collect())
}

/// Like [`extract_items_with_quantities`] but with the quantity removed.
pub fn extract_item_names(text: &str) -> Vec<String> {
    with_default(
        text.lines()
            .filter_map(numbered_entry)
            .map(|entry| strip_quantity(&entry).to_string())
            .filter(|name| !name.is_empty())
            .collect(),
    )
}

/// `"Milk - 2 liters"` becomes `"Milk"`.
pub fn strip_quantity(entry: &str) -> &str {
    entry
        .split_once(" - ")
        .map_or(entry, |(name, _)| name)
        .trim()
}

/// Renders `"{title}\n\n"` followed by `"{n}. {item}\n"` lines.
pub fn format_numbered_list(title: &str, items: &[String]) -> String {
    let mut out = format!("{title}\n\n");
    for (idx, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", idx + 1, item));
    }
    out
}

fn numbered_entry(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || is_heading(line) {
        return None;
    }
    let (_, entry) = line.split_once(". ")?;
    let entry = entry.trim();
    (!entry.is_empty()).then(|| entry.to_string())
}

fn is_heading(line: &str) -> bool {
    line.starts_with("Shopping List") || line.starts_with("Grocery")
}

fn with_default(items: Vec<String>) -> Vec<String> {
    if items.is_empty() {
        DEFAULT_ITEMS.iter().map(|item| item.to_string()).collect()
    } else {
        items
    }
}
