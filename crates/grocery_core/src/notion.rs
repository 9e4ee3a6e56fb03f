use serde_json::Value;

/// Shape the task result was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFormat {
    /// Notion query response with a `results` array of pages.
    NotionResults,
    /// Bare JSON array of item strings.
    PlainList,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItems {
    pub format: ResultFormat,
    pub items: Vec<String>,
}

/// Turns a fetched task result into shopping list entries.
///
/// Pages contribute `"{name} - {quantity}"`, or just `"{name}"` when the
/// quantity is missing. Pages without a name are skipped.
pub fn items_from_task_result(result: &Value) -> ExtractedItems {
    if let Some(results) = result.get("results") {
        let items = results
            .as_array()
            .map(|pages| pages.iter().filter_map(page_entry).collect())
            .unwrap_or_default();
        return ExtractedItems {
            format: ResultFormat::NotionResults,
            items,
        };
    }

    if let Some(list) = result.as_array() {
        let items = list
            .iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect();
        return ExtractedItems {
            format: ResultFormat::PlainList,
            items,
        };
    }

    ExtractedItems {
        format: ResultFormat::Unknown,
        items: Vec::new(),
    }
}

fn page_entry(page: &Value) -> Option<String> {
    let properties = page.get("properties")?;
    let name = first_of(properties, &["Item", "Name"], "title")?;
    if name.is_empty() {
        return None;
    }
    match first_of(properties, &["Quantity", "Amount"], "rich_text") {
        Some(quantity) if !quantity.is_empty() => Some(format!("{name} - {quantity}")),
        _ => Some(name),
    }
}

/// Reads `{property}.{kind}[0].text.content` from the first property present.
fn first_of(properties: &Value, names: &[&str], kind: &str) -> Option<String> {
    let property = names.iter().find_map(|name| properties.get(*name))?;
    property
        .get(kind)?
        .get(0)?
        .get("text")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}
