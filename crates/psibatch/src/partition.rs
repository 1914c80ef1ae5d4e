use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::record::{Batch, SequenceRecord};

/// How records are split into batches for a given worker count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PartitionStrategy {
    /// `min(n, workers)` contiguous batches whose sizes differ by at most one.
    #[default]
    Balanced,
    /// Consecutive chunks of `max(1, n / workers)` records. The trailing
    /// remainder becomes its own batch, so this can exceed `workers`.
    FixedChunk,
}

/// Split `records` into ordered, non-empty batches.
///
/// Concatenating the returned batches reproduces `records` exactly.
pub fn partition(
    records: Vec<SequenceRecord>,
    workers: NonZeroUsize,
    strategy: PartitionStrategy,
) -> Vec<Batch> {
    let sizes = match strategy {
        PartitionStrategy::Balanced => balanced_sizes(records.len(), workers.get()),
        PartitionStrategy::FixedChunk => fixed_chunk_sizes(records.len(), workers.get()),
    };

    let mut remaining = records.into_iter();
    let batches = sizes
        .into_iter()
        .enumerate()
        .filter_map(|(index, size)| Batch::new(index, remaining.by_ref().take(size).collect()))
        .collect::<Vec<_>>();

    tracing::info!(
        "Partitioned into {} batch(es) for {} worker(s) using {:?}",
        batches.len(),
        workers,
        strategy
    );
    batches
}

fn balanced_sizes(n: usize, workers: usize) -> Vec<usize> {
    let count = n.min(workers);
    if count == 0 {
        return Vec::new();
    }
    let base = n / count;
    let extra = n % count;
    (0..count)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

fn fixed_chunk_sizes(n: usize, workers: usize) -> Vec<usize> {
    let chunk = (n / workers).max(1);
    let mut sizes = vec![chunk; n / chunk];
    if n % chunk != 0 {
        sizes.push(n % chunk);
    }
    sizes
}
