//! Grocery engine: remote task polling and the IO collaborators around it.
mod decode;
mod document;
mod http;
mod lists;
mod persist;
mod planner;
mod poller;
mod task_api;
mod translate;
mod types;

pub use decode::{decode_text, DecodeError, DecodedText};
pub use document::{export_url, DocumentSettings, DocumentSource, ReqwestDocumentSource};
pub use lists::{
    load_item_names, save_shopping_list, save_translated_list, translate_local_list, SavedLists,
    ENGLISH_LIST_FILE, ITEMS_FILE, SPANISH_LIST_FILE,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use planner::{PlannerSettings, ShoppingPlan, ShoppingPlanner};
pub use poller::{LogProgressSink, PollError, PollSettings, ProgressSink, TaskPoller};
pub use task_api::{ReqwestTaskApi, TaskApi, TaskApiSettings};
pub use translate::{translate_or_original, DeeplTranslator, TranslateSettings, Translator};
pub use types::{ApiError, FailureKind, PollEvent, Priority, TaskHandle, TaskSnapshot, TaskSpec};
