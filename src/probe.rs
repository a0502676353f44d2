use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default per-probe time budget.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Pre-filter the configured source roots to those that currently exist.
///
/// Each candidate is probed in its own task with a fixed per-task timeout;
/// a probe that errors or does not decide in time is treated identically
/// to "directory does not exist", never as an error. Input order is
/// preserved in the output. Run once before constructing the library; the
/// synchronous resolution logic is never re-entered from here.
pub async fn filter_existing_sources(roots: Vec<PathBuf>, per_probe: Duration) -> Vec<PathBuf> {
    let handles: Vec<_> = roots
        .iter()
        .cloned()
        .map(|root| {
            tokio::spawn(async move {
                match timeout(per_probe, tokio::fs::metadata(&root)).await {
                    Ok(Ok(meta)) => meta.is_dir(),
                    Ok(Err(_)) => false,
                    Err(_) => {
                        warn!("source probe timed out for {:?}, treating as absent", root);
                        false
                    }
                }
            })
        })
        .collect();

    let mut existing = Vec::with_capacity(roots.len());
    for (root, handle) in roots.into_iter().zip(handles) {
        // A panicked probe task counts as absent too.
        if handle.await.unwrap_or(false) {
            existing.push(root);
        } else {
            debug!("dropping unavailable source root {:?}", root);
        }
    }
    existing
}
