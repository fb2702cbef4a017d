//! Parallel processing utilities

use crate::error::{SccsError, SccsResult};

/// Configure the global thread pool
pub fn configure_thread_pool(threads: usize) -> SccsResult<usize> {
    let threads = resolve_threads(threads);

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| SccsError::Configuration(format!("Failed to build thread pool: {}", e)))?;

    Ok(threads)
}

/// 0 means all available cores
pub fn resolve_threads(threads: usize) -> usize {
    if threads == 0 {
        num_cpus::get()
    } else {
        threads
    }
}

/// Check if we should use parallel processing based on item count
pub fn should_parallelize(item_count: usize, threshold: usize) -> bool {
    item_count > threshold && rayon::current_num_threads() > 1
}
