//! Console output shared by the pipelines.

use grocery_engine::{PollEvent, ProgressSink};

const RULE_WIDTH: usize = 60;

pub fn banner(title: &str) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn section(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(30));
}

pub fn numbered(items: &[String]) {
    for (idx, item) in items.iter().enumerate() {
        println!("  {}. {}", idx + 1, item);
    }
}

/// Prints one line per poll event, mirroring the attempt counter.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: PollEvent) {
        match event {
            PollEvent::TaskCreated { task } => {
                println!("SUCCESS: Task created! Task ID: {task}");
            }
            PollEvent::StatusObserved {
                attempt,
                max_attempts,
                status,
                ..
            } => {
                println!("\n--- Attempt {attempt}/{max_attempts} ---");
                if !status.is_waiting() {
                    println!("Task status: {status}");
                } else if status.is_recognized() {
                    println!("WAITING: Task is {status}, waiting...");
                } else {
                    println!("WARNING: Unknown status: {status}");
                }
            }
            PollEvent::StatusQueryFailed {
                attempt,
                max_attempts,
                error,
                ..
            } => {
                println!("\n--- Attempt {attempt}/{max_attempts} ---");
                println!("ERROR: Failed to get task status: {error}");
            }
            PollEvent::Waiting { delay, .. } => {
                println!("Waiting {} seconds before next check...", delay.as_secs());
            }
            PollEvent::ResultFetched { .. } => {
                println!("SUCCESS: Successfully fetched task result!");
            }
        }
    }
}
