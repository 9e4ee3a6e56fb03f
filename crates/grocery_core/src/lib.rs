//! Grocery core: pure poll state machine and list text handling.
mod items;
mod language;
mod notion;
mod poll;
mod status;

pub use items::{
    extract_item_names, extract_items_with_quantities, format_numbered_list, strip_quantity,
    DEFAULT_ITEMS, SAMPLE_SPANISH_LIST,
};
pub use language::{detect_language, Language, SPANISH_MARKERS};
pub use notion::{items_from_task_result, ExtractedItems, ResultFormat};
pub use poll::{Observation, PollMachine, PollState, PollStep};
pub use status::TaskStatus;
