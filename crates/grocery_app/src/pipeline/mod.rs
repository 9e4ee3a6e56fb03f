//! End-to-end flows behind the command line tools.
pub mod doc_shop;
pub mod task_fetch;
