use super::error::SegmenterError;
use super::trial::{Block, TrailingBlockPolicy, TrialRow};

/// BlockSegmenter takes TrialRows and composes them into Blocks.
///
/// Rows are fed in table order. Any row seen while no block is open starts a new block at
/// its own onset. A row with no condition (the sentinel) closes the open block, whose end is
/// the end of the row seen just before the sentinel. The sentinel itself belongs to no block.
#[derive(Debug, Default)]
pub struct BlockSegmenter {
    block_start_onset: Option<f64>,
    previous_end: Option<f64>,
    trailing_rows: usize,
    policy: TrailingBlockPolicy,
}

impl BlockSegmenter {
    /// Create a new BlockSegmenter which handles a block left open at the end according to `policy`
    pub fn new(policy: TrailingBlockPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Add a row to the segmenter.
    ///
    /// Returns a `Result<Option<Block>>`. If the Option is None, the row did not close a block.
    /// If the Option is Some, the row was a sentinel and the block it closed is returned.
    /// A sentinel with nothing before it cannot close a block and is a boundary error.
    pub fn append_row(&mut self, row: &TrialRow) -> Result<Option<Block>, SegmenterError> {
        let start = *self.block_start_onset.get_or_insert(row.onset_time);

        let closed = if row.condition.is_none_marker() {
            let end_time = self
                .previous_end
                .ok_or(SegmenterError::Boundary(row.index))?;
            self.block_start_onset = None;
            self.trailing_rows = 0;
            Some(Block::spanning(start, end_time))
        } else {
            self.trailing_rows += 1;
            None
        };

        self.previous_end = Some(row.end_time());
        Ok(closed)
    }

    /// Takes whatever block is still open and applies the trailing block policy to it.
    ///
    /// Used at the end of a partition. Returns None if no block was open or if it was discarded.
    pub fn finish(self) -> Option<Block> {
        let start = self.block_start_onset?;
        let end_time = self.previous_end?;
        match self.policy {
            TrailingBlockPolicy::Emit => Some(Block::spanning(start, end_time)),
            TrailingBlockPolicy::Discard => {
                log::warn!(
                    "Discarding open block starting at {start:.6} ({} trailing rows with no closing sentinel)",
                    self.trailing_rows
                );
                None
            }
        }
    }
}

/// Segment one material-type partition into blocks in a single forward pass
pub fn segment_rows(
    rows: &[TrialRow],
    policy: TrailingBlockPolicy,
) -> Result<Vec<Block>, SegmenterError> {
    let mut segmenter = BlockSegmenter::new(policy);
    let mut blocks = Vec::new();
    for row in rows {
        if let Some(block) = segmenter.append_row(row)? {
            blocks.push(block);
        }
    }
    if let Some(block) = segmenter.finish() {
        blocks.push(block);
    }
    Ok(blocks)
}
