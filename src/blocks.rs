//! Contiguous work partitions used by the parallel kernels.
//!
//! A `WorkBlock` is a half-open range [start, end) of row indices owned by a
//! single task. Blocks are cut so that each carries roughly the same amount
//! of work, which matters for the triangular cost table where early rows are
//! far heavier than late ones.

/// A contiguous range of indices [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkBlock {
    /// Inclusive start index.
    pub start: usize,
    /// Exclusive end index.
    pub end: usize,
}

impl WorkBlock {
    /// Number of indices in the block.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the block is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `[start, end)` into at most `parts` contiguous blocks of
/// roughly equal total `weight`.
///
/// Every index lands in exactly one block and blocks are returned in order.
/// Zero-weight tails are folded into the last block.
pub fn balanced_blocks<W>(start: usize, end: usize, parts: usize, weight: W) -> Vec<WorkBlock>
where
    W: Fn(usize) -> u64,
{
    if start >= end {
        return Vec::new();
    }
    let parts = parts.max(1);
    let total: u64 = (start..end).map(&weight).sum();
    let target = total.div_ceil(parts as u64).max(1);

    let mut blocks = Vec::with_capacity(parts);
    let mut block_start = start;
    let mut acc = 0u64;
    for idx in start..end {
        acc += weight(idx);
        if acc >= target && blocks.len() + 1 < parts {
            blocks.push(WorkBlock {
                start: block_start,
                end: idx + 1,
            });
            block_start = idx + 1;
            acc = 0;
        }
    }
    if block_start < end {
        blocks.push(WorkBlock {
            start: block_start,
            end,
        });
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_block_is_empty() {
        let b = WorkBlock { start: 5, end: 5 };
        assert_eq!(b.len(), 0);
        assert!(b.is_empty());
    }

    #[test]
    fn blocks_cover_range_without_gaps() {
        let blocks = balanced_blocks(1, 101, 7, |i| (101 - i) as u64 * (101 - i) as u64);
        assert!(blocks.len() <= 7);
        assert_eq!(blocks.first().map(|b| b.start), Some(1));
        assert_eq!(blocks.last().map(|b| b.end), Some(101));
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(!pair[0].is_empty());
        }
    }

    #[test]
    fn heavy_prefix_gets_short_blocks() {
        let blocks = balanced_blocks(0, 100, 4, |i| (100 - i) as u64);
        assert!(blocks[0].len() < blocks[blocks.len() - 1].len());
    }

    #[test]
    fn empty_range_has_no_blocks() {
        assert!(balanced_blocks(3, 3, 4, |_| 1).is_empty());
    }

    #[test]
    fn single_part_is_whole_range() {
        let blocks = balanced_blocks(0, 10, 1, |_| 1);
        assert_eq!(blocks, vec![WorkBlock { start: 0, end: 10 }]);
    }
}
