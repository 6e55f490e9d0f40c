#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BarColor {
    #[default]
    CYAN,
    GREEN,
    RED,
}

/// Progress message sent from a worker to whoever is watching the batch
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub input_name: String,
    pub worker_id: usize,
    pub color: BarColor,
}

impl WorkerStatus {
    pub fn new(progress: f32, input_name: &str, worker_id: usize, color: BarColor) -> Self {
        Self {
            progress,
            input_name: input_name.to_string(),
            worker_id,
            color,
        }
    }
}
