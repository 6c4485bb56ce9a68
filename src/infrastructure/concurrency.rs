//! Thread pool setup for parallel call-depth runs.
//! Keeps part of the machine free for the interactive profiling view.

use anyhow::{Context, Result};
use rayon::ThreadPool;
use tracing::info;

/// Worker count for `jobs`; 0 reserves ~50% of the cores, minimum 1 worker.
pub fn worker_count(jobs: usize) -> usize {
    if jobs > 0 {
        return jobs;
    }
    std::cmp::max(1, num_cpus::get() / 2)
}

/// Build a local rayon pool for depth computation.
pub fn build_depth_pool(jobs: usize) -> Result<ThreadPool> {
    let workers = worker_count(jobs);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("calltree-depth-{}", i))
        .build()
        .context("Failed to build depth thread pool")?;

    info!(workers, cores = num_cpus::get(), "initialized depth thread pool");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_jobs_are_respected() {
        assert_eq!(worker_count(3), 3);
        let pool = build_depth_pool(2).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }

    #[test]
    fn test_auto_jobs_has_at_least_one_worker() {
        assert!(worker_count(0) >= 1);
    }
}
