use std::path::PathBuf;
use std::sync::mpsc::Sender;

use super::config::Config;
use super::error::ProcessorError;
use super::inputs::InputFile;
use super::row_source::RowSource;
use super::segmenter::segment_rows;
use super::table::Table;
use super::timing_writer::write_timing_file;
use super::trial::Block;
use super::worker_status::{BarColor, WorkerStatus};

/// The blocks of one material type of one run, and where they will be written
#[derive(Debug, Clone, PartialEq)]
pub struct TimingFile {
    pub path: PathBuf,
    pub material: String,
    pub blocks: Vec<Block>,
}

/// What happened to a single input in a batch
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Converted {
        input: PathBuf,
        written: Vec<PathBuf>,
    },
    Failed {
        input: PathBuf,
        reason: String,
    },
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Compute every timing file of one run from its table. Nothing touches the disk here.
///
/// Material types with no rows in the table produce no file. Any error aborts the whole run,
/// so either every partition is computed or none is.
pub fn compute_timing_files(
    config: &Config,
    table: &Table,
    run: &str,
) -> Result<Vec<TimingFile>, ProcessorError> {
    let source = RowSource::new(table, &config.columns, &config.none_marker)?;
    let policy = config.trailing_policy();

    let labels: Vec<&str> = config
        .material_types
        .iter()
        .map(|m| m.label.as_str())
        .collect();
    for (label, count) in source.material_counts(&labels) {
        log::debug!("Run {run}: {count} {label} trials");
    }

    let mut files = Vec::new();
    for material in config.material_types.iter() {
        let rows = source.rows_for_material(&material.label)?;
        if rows.is_empty() {
            log::info!("No {} trials in run {run}, skipping...", material.label);
            continue;
        }
        let blocks =
            segment_rows(&rows, policy).map_err(|e| ProcessorError::BoundaryError {
                material: material.label.clone(),
                source: e,
            })?;
        log::info!(
            "Run {run}: {} {} trials formed {} blocks",
            rows.len(),
            material.label,
            blocks.len()
        );
        files.push(TimingFile {
            path: config.get_output_file_path(run, &material.code),
            material: material.label.clone(),
            blocks,
        });
    }
    Ok(files)
}

/// Convert a single trial log.
///
/// The table is read and every partition computed before the output directory is created and
/// the first file is written.
pub fn process_input(config: &Config, input: &InputFile) -> Result<Vec<PathBuf>, ProcessorError> {
    let table = Table::read(&input.path)?;
    log::info!(
        "Read {} rows from {}",
        table.n_rows(),
        table.path().display()
    );
    let files = compute_timing_files(config, &table, &input.run)?;

    std::fs::create_dir_all(&config.output_path)?;
    let mut written = Vec::new();
    for file in files {
        write_timing_file(&file.path, &file.blocks)?;
        log::info!("Wrote {} blocks to {}", file.blocks.len(), file.path.display());
        written.push(file.path);
    }
    Ok(written)
}

/// Process a subset of inputs.
///
/// A failing input is logged and recorded but never stops the rest of the subset.
/// Only losing the status channel is fatal.
pub fn process_subset(
    config: Config,
    tx: Sender<WorkerStatus>,
    worker_id: usize,
    subset: Vec<InputFile>,
) -> Result<Vec<FileOutcome>, ProcessorError> {
    let mut outcomes = Vec::new();
    let n_inputs = subset.len();
    let mut color = BarColor::CYAN;
    for (idx, input) in subset.into_iter().enumerate() {
        let name = input.name();
        tx.send(WorkerStatus::new(
            idx as f32 / n_inputs as f32,
            &name,
            worker_id,
            color.clone(),
        ))?;
        log::info!("Processing {name}...");
        match process_input(&config, &input) {
            Ok(written) => {
                log::info!("Finished processing {name}.");
                outcomes.push(FileOutcome::Converted {
                    input: input.path,
                    written,
                });
            }
            Err(e) => {
                log::error!("Failed to process {name}: {e}");
                color = BarColor::RED;
                outcomes.push(FileOutcome::Failed {
                    input: input.path,
                    reason: e.to_string(),
                });
            }
        }
    }
    if color == BarColor::CYAN {
        color = BarColor::GREEN;
    }
    tx.send(WorkerStatus::new(1.0, "done", worker_id, color))?;
    Ok(outcomes)
}

/// Divide the inputs into a set of subsets (per thread/worker)
pub fn create_subsets(inputs: &[InputFile], n_threads: usize) -> Vec<Vec<InputFile>> {
    let mut subsets: Vec<Vec<InputFile>> = vec![Vec::new(); n_threads.max(1)];
    let n_subsets = subsets.len();

    for (idx, input) in inputs.iter().enumerate() {
        subsets[idx % n_subsets].push(input.clone())
    }

    subsets
}
