//! Turn a shared (usually Spanish) document into an English shopping list.

use anyhow::{Context, Result};
use grocery_core::{detect_language, extract_items_with_quantities, Language, SAMPLE_SPANISH_LIST};
use grocery_engine::{
    load_item_names, save_translated_list, translate_local_list, translate_or_original,
    DeeplTranslator, DocumentSource, ReqwestDocumentSource, SavedLists, ShoppingPlanner,
    Translator, SPANISH_LIST_FILE,
};
use grocery_logging::grocery_warn;

use crate::config::AppConfig;
use crate::progress::{banner, numbered, section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrigin {
    Document,
    /// Built-in sample, used when the document is unavailable.
    Sample,
    /// `lista_compras_espanol.txt` in the output directory.
    LocalFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedList {
    pub origin: ListOrigin,
    pub language: Language,
    pub items: Vec<String>,
    /// `None` when the list came from the local file, which is translated in place.
    pub saved: Option<SavedLists>,
}

pub async fn run(config: &AppConfig) -> Result<PreparedList> {
    banner("SHARED DOCUMENT SHOPPING");
    println!("Fetches the grocery list from a shared document and prepares it for shopping");

    let source = ReqwestDocumentSource::new(config.document_settings())
        .context("failed to set up the document client")?;
    let translator = DeeplTranslator::new(config.translate_settings())
        .context("failed to set up the translation client")?;
    let prepared = prepare_list(config, &source, &translator).await?;

    section("2. ITEM LOADING");
    println!("SUCCESS: Loaded {} items", prepared.items.len());

    section("3. SHOPPING PLAN");
    match config.planner_settings() {
        Some(settings) => request_plan(settings, &prepared.items).await,
        None => println!("No planner API key configured, skipping"),
    }

    banner("SHOPPING LIST READY FOR MANUAL SHOPPING");
    println!("Your translated grocery list with quantities:");
    println!("{}", "-".repeat(40));
    numbered(&prepared.items);
    println!("{}", "-".repeat(40));
    println!("Total items: {}", prepared.items.len());
    Ok(prepared)
}

/// Picks the list source, translates when needed, and saves the result.
pub async fn prepare_list(
    config: &AppConfig,
    source: &dyn DocumentSource,
    translator: &dyn Translator,
) -> Result<PreparedList> {
    section("1. DOCUMENT PROCESSING");

    if let Some(url) = config.document.url.as_deref() {
        println!("Fetching content from shared document: {url}");
        return match source.fetch_document(url).await {
            Ok(content) => {
                println!("SUCCESS: Fetched {} characters", content.chars().count());
                process_text(config, translator, content, ListOrigin::Document).await
            }
            Err(err) => {
                grocery_warn!("document fetch failed: {}", err);
                println!("ERROR: Failed to fetch document: {err}");
                println!("Falling back to sample data...");
                let sample = SAMPLE_SPANISH_LIST.to_string();
                process_text(config, translator, sample, ListOrigin::Sample).await
            }
        };
    }

    if config.output_dir.join(SPANISH_LIST_FILE).is_file() {
        println!("No document URL configured, translating {SPANISH_LIST_FILE}");
        let english = translate_local_list(&config.output_dir, translator)
            .await
            .context("could not translate the local list")?;
        return Ok(PreparedList {
            origin: ListOrigin::LocalFile,
            language: Language::Spanish,
            items: load_item_names(&english),
            saved: None,
        });
    }

    println!("No document URL configured, using sample data");
    process_text(config, translator, SAMPLE_SPANISH_LIST.to_string(), ListOrigin::Sample).await
}

async fn process_text(
    config: &AppConfig,
    translator: &dyn Translator,
    content: String,
    origin: ListOrigin,
) -> Result<PreparedList> {
    let language = detect_language(&content);
    println!("Detected language: {}", language.code());

    let translated = match language {
        Language::Spanish => {
            println!("Translating to English...");
            translate_or_original(translator, &content).await
        }
        Language::English => {
            println!("Already in English");
            content
        }
    };

    let items = extract_items_with_quantities(&translated);
    println!("Extracted {} items with quantities", items.len());
    let saved = save_translated_list(&config.output_dir, &translated, &items)
        .context("could not save the translated list")?;

    Ok(PreparedList {
        origin,
        language,
        items,
        saved: Some(saved),
    })
}

async fn request_plan(settings: grocery_engine::PlannerSettings, items: &[String]) {
    let planner = match ShoppingPlanner::new(settings) {
        Ok(planner) => planner,
        Err(err) => {
            println!("WARNING: Planner unavailable: {err}");
            return;
        }
    };
    if let Err(err) = planner.check_connection().await {
        println!("WARNING: Planner API not reachable ({err}), continuing without a plan");
        return;
    }
    match planner.plan(items).await {
        Ok(plan) => {
            println!("SUCCESS: Shopping plan received:");
            println!("{}", plan.content);
        }
        Err(err) => println!("ERROR: Shopping plan failed: {err}"),
    }
}
