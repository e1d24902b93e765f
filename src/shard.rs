//! Deterministic worker sharding of the skeleton space.
//!
//! At each code length K the candidate space `[0, 3^K)` is split into
//! `ncpus` contiguous, near-equal ranges: the first `N mod ncpus` workers
//! receive one extra candidate. The union of all ranges covers the space
//! exactly and no two ranges overlap, so independent workers never repeat
//! or skip a skeleton.

/// Half-open candidate range `[start, end)` for worker `cpu_id` of `ncpus`.
///
/// `n` is the candidate count (`3^K`). Workers beyond the space size get
/// an empty range.
pub fn shard_bounds(n: u64, cpu_id: u32, ncpus: u32) -> (u64, u64) {
    debug_assert!(ncpus >= 1 && cpu_id < ncpus);
    let base = n / u64::from(ncpus);
    let rem = n % u64::from(ncpus);
    let w = u64::from(cpu_id);
    let start = w * base + w.min(rem);
    let len = base + u64::from(w < rem);
    (start, start + len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::total_candidates;

    fn assert_partition(n: u64, ncpus: u32) {
        let mut next = 0u64;
        for w in 0..ncpus {
            let (start, end) = shard_bounds(n, w, ncpus);
            assert_eq!(start, next, "gap or overlap at worker {w} (n={n})");
            assert!(end >= start);
            next = end;
        }
        assert_eq!(next, n, "partition does not cover [0, {n})");
    }

    #[test]
    fn test_partition_covers_exactly() {
        for k in 1..=8u32 {
            let n = total_candidates(k);
            for ncpus in [1, 2, 3, 4, 7, 8, 16] {
                if u64::from(ncpus) <= n {
                    assert_partition(n, ncpus);
                }
            }
        }
    }

    #[test]
    fn test_balanced_sizes() {
        // 10 candidates over 4 workers: 3, 3, 2, 2.
        let sizes: Vec<u64> = (0..4)
            .map(|w| {
                let (s, e) = shard_bounds(10, w, 4);
                e - s
            })
            .collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_more_workers_than_candidates() {
        // 3 candidates over 5 workers: the tail gets empty ranges,
        // the union is still exact.
        assert_partition(3, 5);
        let (s, e) = shard_bounds(3, 4, 5);
        assert_eq!(s, e);
    }

    #[test]
    fn test_single_worker_owns_everything() {
        assert_eq!(shard_bounds(729, 0, 1), (0, 729));
    }
}
