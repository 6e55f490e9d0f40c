use std::fmt::Display;

/// Every block carries the same amplitude in the 3-column timing format
pub const BLOCK_MODULATION: u32 = 1;

/// The condition of a single trial.
///
/// Rest/filler trials carry no condition and act as block terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Active(String),
    NoneMarker,
}

impl Condition {
    pub fn is_none_marker(&self) -> bool {
        matches!(self, Self::NoneMarker)
    }
}

/// One trial of a material-type partition
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRow {
    pub index: usize,
    pub onset_time: f64,
    pub duration: f64,
    pub condition: Condition,
    pub material_type: String,
}

impl TrialRow {
    pub fn new(
        index: usize,
        onset_time: f64,
        duration: f64,
        condition: Condition,
        material_type: &str,
    ) -> Self {
        Self {
            index,
            onset_time,
            duration,
            condition,
            material_type: material_type.to_string(),
        }
    }

    /// Time at which this trial ends
    pub fn end_time(&self) -> f64 {
        self.onset_time + self.duration
    }
}

/// A contiguous run of trials reduced to onset, duration and modulation
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub onset: f64,
    pub duration: f64,
    pub modulation: u32,
}

impl Block {
    /// Build a block spanning from `onset` to `end_time`
    pub fn spanning(onset: f64, end_time: f64) -> Self {
        Self {
            onset,
            duration: end_time - onset,
            modulation: BLOCK_MODULATION,
        }
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6}\t{:.6}\t{}",
            self.onset, self.duration, self.modulation
        )
    }
}

/// What to do with a block that is still open when the rows run out.
///
/// Historical timing files were produced by discarding it, so that is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingBlockPolicy {
    #[default]
    Discard,
    Emit,
}
