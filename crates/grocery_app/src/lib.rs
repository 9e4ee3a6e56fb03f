//! Grocery app: configuration, logging setup and the command line pipelines.
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod progress;

use tokio_util::sync::CancellationToken;

/// Token cancelled on Ctrl-C, so a running poll session stops between attempts.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nProcess interrupted by user");
            trigger.cancel();
        }
    });
    token
}
