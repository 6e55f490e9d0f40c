use std::path::PathBuf;
use thiserror::Error;

use super::worker_status::WorkerStatus;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Could not open table because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Table file {0:?} has an unsupported extension; expected .xlsx, .xlsm, .xls, .ods or .csv")]
    UnsupportedFormat(PathBuf),
    #[error("Workbook {0:?} does not contain any worksheets")]
    NoWorksheet(PathBuf),
    #[error("Table {0:?} is empty and has no header row")]
    NoHeader(PathBuf),
    #[error("Table failed to parse CSV data: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Table failed to parse workbook: {0}")]
    WorkbookError(#[from] calamine::Error),
}

#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("Required column '{0}' is missing from the table")]
    MissingColumn(String),
    #[error("Column '{column}' has non-numeric value '{value}' in table row {row}")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error("Column '{column}' has no value in table row {row}")]
    MissingValue { column: String, row: usize },
}

#[derive(Debug, Clone, Error)]
pub enum SegmenterError {
    #[error("Sentinel row at position {0} has no preceding row to close a block with")]
    Boundary(usize),
}

#[derive(Debug, Error)]
pub enum TimingWriterError {
    #[error("Timing file path {0:?} has no parent directory")]
    BadFilePath(PathBuf),
    #[error("TimingWriter failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input path {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Input file {0:?} is improperly named; expected <Run>_<Description>")]
    BadFileName(PathBuf),
    #[error("Input discovery failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config requested {0} worker threads; at least 1 is required")]
    BadThreadCount(i32),
    #[error("Config does not list any material types")]
    NoMaterialTypes,
    #[error("Config lists material type '{0}' more than once")]
    DuplicateMaterialType(String),
    #[error("Config maps more than one material type to the output code '{0}'")]
    DuplicateMaterialCode(String),
    #[error("Config has an empty none_marker")]
    EmptyNoneMarker,
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Table error: {0}")]
    TableError(#[from] TableError),
    #[error("Processor failed due to Schema error: {0}")]
    SchemaError(#[from] SchemaError),
    #[error("Processor failed due to Boundary error in material '{material}': {source}")]
    BoundaryError {
        material: String,
        source: SegmenterError,
    },
    #[error("Processor failed due to TimingWriter error: {0}")]
    WriterError(#[from] TimingWriterError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
    #[error("Processor failed due to IO error: {0}")]
    IoError(#[from] std::io::Error),
}
