use super::config::validate_n_jobs;
use super::error::FingerprintError;
use std::num::NonZeroUsize;
use std::ops::Range;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Resolves a requested worker count; `None` means the host's available parallelism.
pub fn resolve_n_jobs(requested: Option<usize>) -> Result<usize, FingerprintError> {
    validate_n_jobs(requested)?;
    Ok(requested.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }))
}

/// Splits `0..n_items` into `min(n_chunks, n_items)` contiguous ranges whose lengths
/// differ by at most one. Earlier chunks take the remainder.
pub fn partition(n_items: usize, n_chunks: usize) -> Vec<Range<usize>> {
    let n_chunks = n_chunks.min(n_items);
    if n_chunks == 0 {
        return Vec::new();
    }
    let base = n_items / n_chunks;
    let extra = n_items % n_chunks;

    let mut ranges = Vec::with_capacity(n_chunks);
    let mut start = 0;
    for chunk in 0..n_chunks {
        let len = base + usize::from(chunk < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Evaluates `task` for every index in `0..n_items` and returns the results in index
/// order.
///
/// With more than one worker the index range is partitioned into contiguous chunks,
/// each chunk runs on a worker of a dedicated pool, and the per-chunk results are
/// concatenated by chunk index. If several chunks fail, the error of the earliest
/// chunk is returned.
pub fn run_chunked<T, F>(n_items: usize, n_jobs: usize, task: F) -> Result<Vec<T>, FingerprintError>
where
    T: Send,
    F: Fn(usize) -> Result<T, FingerprintError> + Sync,
{
    if n_jobs <= 1 || n_items <= 1 {
        return (0..n_items).map(&task).collect();
    }
    run_partitioned(n_items, n_jobs, task)
}

#[cfg(feature = "parallel")]
fn run_partitioned<T, F>(n_items: usize, n_jobs: usize, task: F) -> Result<Vec<T>, FingerprintError>
where
    T: Send,
    F: Fn(usize) -> Result<T, FingerprintError> + Sync,
{
    let chunks = partition(n_items, n_jobs);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(chunks.len())
        .build()
        .map_err(|e| FingerprintError::ThreadPool(e.to_string()))?;

    let per_chunk: Vec<Result<Vec<T>, FingerprintError>> = pool.install(|| {
        chunks
            .into_par_iter()
            .enumerate()
            .map(|(chunk, range)| {
                debug!(chunk, start = range.start, end = range.end, "Dispatching chunk.");
                range.map(&task).collect()
            })
            .collect()
    });

    let mut results = Vec::with_capacity(n_items);
    for chunk in per_chunk {
        results.extend(chunk?);
    }
    Ok(results)
}

#[cfg(not(feature = "parallel"))]
fn run_partitioned<T, F>(n_items: usize, n_jobs: usize, task: F) -> Result<Vec<T>, FingerprintError>
where
    T: Send,
    F: Fn(usize) -> Result<T, FingerprintError> + Sync,
{
    debug!(n_jobs, "Built without the `parallel` feature; running sequentially.");
    (0..n_items).map(&task).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ConfigError;

    #[test]
    fn partition_covers_range_with_balanced_chunks() {
        let chunks = partition(10, 3);
        assert_eq!(chunks, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn partition_never_exceeds_item_count() {
        assert_eq!(partition(2, 8), vec![0..1, 1..2]);
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn partition_sizes_differ_by_at_most_one() {
        for n_items in 1..40 {
            for n_chunks in 1..9 {
                let chunks = partition(n_items, n_chunks);
                let sizes: Vec<usize> = chunks.iter().map(|r| r.len()).collect();
                let min = sizes.iter().min().unwrap();
                let max = sizes.iter().max().unwrap();
                assert!(max - min <= 1);
                assert_eq!(sizes.iter().sum::<usize>(), n_items);
                assert_eq!(chunks.len(), n_chunks.min(n_items));
            }
        }
    }

    #[test]
    fn results_keep_index_order_for_any_worker_count() {
        let sequential = run_chunked(25, 1, |i| Ok(i * i)).unwrap();
        for n_jobs in [2, 3, 8, 64] {
            assert_eq!(run_chunked(25, n_jobs, |i| Ok(i * i)).unwrap(), sequential);
        }
    }

    #[test]
    fn earliest_failing_chunk_wins() {
        let result = run_chunked(12, 4, |i| {
            if i == 4 || i == 10 {
                Err(FingerprintError::ThreadPool(format!("item {i}")))
            } else {
                Ok(i)
            }
        });
        match result {
            Err(FingerprintError::ThreadPool(message)) => assert_eq!(message, "item 4"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(
            resolve_n_jobs(Some(0)),
            Err(FingerprintError::Config(ConfigError::InvalidParameter { .. }))
        ));
        assert_eq!(resolve_n_jobs(Some(3)).unwrap(), 3);
        assert!(resolve_n_jobs(None).unwrap() >= 1);
    }
}
