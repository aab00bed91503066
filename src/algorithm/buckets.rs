use crate::spatial::grid::Position;
use ndarray::Array2;

/// Unresolved cells grouped by their number of viable candidates
///
/// Bucket `k` holds the cells with exactly `k` positive-weight colors. A slot
/// table remembers where each cell sits, so insertion, removal and relocation
/// are all O(1). Bucket 0 collects contradictions.
#[derive(Clone, Debug)]
pub struct PriorityBuckets {
    buckets: Vec<Vec<Position>>,
    /// `(bucket, slot)` per cell, indexed `[y, x]`
    slots: Array2<Option<(usize, usize)>>,
}

impl PriorityBuckets {
    /// Create empty buckets `0..=max_count` for a `width` x `height` grid
    pub fn new(width: usize, height: usize, max_count: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); max_count + 1],
            slots: Array2::from_elem((height, width), None),
        }
    }

    /// Highest bucket index
    pub fn max_count(&self) -> usize {
        self.buckets.len().saturating_sub(1)
    }

    /// Bucket currently holding a cell
    pub fn bucket_of(&self, position: Position) -> Option<usize> {
        let (x, y) = position;
        self.slots
            .get([y, x])
            .copied()
            .flatten()
            .map(|(bucket, _)| bucket)
    }

    /// Place a cell into a bucket, relocating it if it already sits elsewhere
    ///
    /// Returns false if the cell or bucket index is out of range.
    pub fn insert(&mut self, position: Position, bucket: usize) -> bool {
        let (x, y) = position;
        if self.slots.get([y, x]).is_none() || bucket >= self.buckets.len() {
            return false;
        }

        self.remove(position);

        let Some(cells) = self.buckets.get_mut(bucket) else {
            return false;
        };
        let slot = cells.len();
        cells.push(position);
        if let Some(entry) = self.slots.get_mut([y, x]) {
            *entry = Some((bucket, slot));
        }
        true
    }

    /// Take a cell out of whichever bucket holds it
    pub fn remove(&mut self, position: Position) -> Option<usize> {
        let (x, y) = position;
        let (bucket, slot) = self.slots.get_mut([y, x])?.take()?;
        self.detach(bucket, slot);
        Some(bucket)
    }

    /// Remove and return the cell at `slot` within `bucket`
    pub fn take(&mut self, bucket: usize, slot: usize) -> Option<Position> {
        let position = self.buckets.get(bucket)?.get(slot).copied()?;
        self.remove(position)?;
        Some(position)
    }

    // Swap-remove keeps buckets dense; the cell moved into the hole gets its
    // slot rewritten.
    fn detach(&mut self, bucket: usize, slot: usize) {
        let Some(cells) = self.buckets.get_mut(bucket) else {
            return;
        };
        if slot >= cells.len() {
            return;
        }
        cells.swap_remove(slot);
        if let Some(&(mx, my)) = cells.get(slot) {
            if let Some(entry) = self.slots.get_mut([my, mx]) {
                *entry = Some((bucket, slot));
            }
        }
    }

    /// Cells in a bucket
    pub fn cells(&self, bucket: usize) -> &[Position] {
        self.buckets.get(bucket).map_or(&[], Vec::as_slice)
    }

    /// Number of cells in a bucket
    pub fn len_of(&self, bucket: usize) -> usize {
        self.cells(bucket).len()
    }

    /// Lowest non-empty bucket at or above `min`
    pub fn first_non_empty(&self, min: usize) -> Option<usize> {
        (min..self.buckets.len()).find(|&bucket| self.len_of(bucket) > 0)
    }

    /// Total number of cells across all buckets
    pub fn total_len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}
