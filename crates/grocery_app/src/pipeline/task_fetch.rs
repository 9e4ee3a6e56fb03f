//! Fetch the grocery list from Notion through a remote task, then save it.

use anyhow::{Context, Result};
use grocery_core::{items_from_task_result, ResultFormat};
use grocery_engine::{
    save_shopping_list, ProgressSink, ReqwestTaskApi, SavedLists, TaskApi, TaskPoller,
};
use grocery_logging::{grocery_info, grocery_warn};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::progress::{banner, numbered, section, ConsoleProgress};

pub const LIST_TITLE: &str = "Shopping List - Notion";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFetchOutcome {
    pub items: Vec<String>,
    pub saved: SavedLists,
}

pub async fn run(config: &AppConfig, cancel: CancellationToken) -> Result<TaskFetchOutcome> {
    banner("NOTION DATA FETCHER");
    println!("Creates a remote task to fetch the grocery list from Notion");
    println!("and polls it until completion.");

    if config.task_api.api_key.is_none() {
        grocery_warn!("no task API key configured; the remote service will likely reject it");
    }
    if config.notion.database_id.is_empty() || config.notion.token.is_empty() {
        grocery_warn!("Notion database id or token is not configured");
    }

    let api = ReqwestTaskApi::new(config.task_api_settings())
        .context("failed to set up the task API client")?;
    let poller = TaskPoller::new(api, config.poll_settings()).with_cancellation(cancel);
    let outcome = fetch_and_save(&poller, config, &ConsoleProgress).await?;

    banner("NOTION FETCHER COMPLETE");
    println!("Successfully processed {} items from Notion!", outcome.items.len());
    println!("\nNext: run `doc-shop` to shop with the fetched list.");
    Ok(outcome)
}

/// Create → poll → extract → save, against any [`TaskApi`].
pub async fn fetch_and_save<A: TaskApi>(
    poller: &TaskPoller<A>,
    config: &AppConfig,
    sink: &dyn ProgressSink,
) -> Result<TaskFetchOutcome> {
    section("1. CREATING TASK");
    let task = poller
        .create_task(&config.notion_task(), sink)
        .await
        .context("could not create the remote task; check the task API key")?;

    section("2. POLLING FOR COMPLETION");
    let settings = poller.settings();
    println!(
        "Polling task {task}: max attempts {}, poll interval {}s",
        settings.max_attempts,
        settings.interval.as_secs()
    );
    let result = poller.poll_until_done(&task, sink).await?;

    section("3. PROCESSING TASK RESULT");
    let extracted = items_from_task_result(&result);
    if extracted.format == ResultFormat::Unknown {
        grocery_warn!("task {} returned an unrecognised result shape", task);
        println!("WARNING: Unknown data format, no items extracted");
    }
    println!("Extracted {} items:", extracted.items.len());
    numbered(&extracted.items);

    section("4. SAVING SHOPPING LIST");
    let saved = save_shopping_list(&config.output_dir, LIST_TITLE, &extracted.items)
        .context("could not save the shopping list")?;
    println!("Saved {:?}", saved.list_path);
    println!("Saved {:?}", saved.items_path);
    grocery_info!("task {} produced {} items", task, extracted.items.len());

    Ok(TaskFetchOutcome {
        items: extracted.items,
        saved,
    })
}
