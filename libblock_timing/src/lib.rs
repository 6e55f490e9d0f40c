//! # block_timing
//!
//! block_timing converts experiment trial logs into block timing files for neuroimaging
//! analysis. It takes spreadsheets exported by the stimulus presentation software (one row
//! per trial) and writes, for every material type of every run, a plain-text file with one
//! line per block of trials: the block onset, the block duration and a modulation of 1.
//!
//! ## Installation
//!
//! The only method of install is from source. If you have not used Rust before, see the
//! [Rust docs](https://www.rust-lang.org/tools/install) for installation instructions.
//!
//! To build and install the CLI use `cargo install --path ./block_timing_cli` from the top
//! level repository. The binary will be installed to your cargo install location (typically
//! something like `~/.cargo/bin/`).
//!
//! ## Input
//!
//! Inputs are `.xlsx`, `.xlsm`, `.xls`, `.ods` (first worksheet) or `.csv` files, one per
//! acquisition run, named `<Run>_<Description>`, e.g. `Run1_Recognition.xlsx`. The first row
//! holds the column names. The following columns are read; all others are ignored:
//!
//! - `Onset_Time`: trial onset in seconds
//! - `Duration`: trial duration in seconds
//! - `Condition`: the trial condition. A blank cell (or the text `FALSE`) marks a rest trial.
//!   Boolean cells read as `True`/`False` and are ordinary conditions
//! - `Material_T`: the material type of the trial, e.g. `Object`, `Scene` or `Pair`
//!
//! ## Blocks
//!
//! The trials of each material type are scanned in table order. A block begins at the first
//! trial seen while no block is open and ends at the first rest trial after it. The block
//! onset is the onset of its first trial; its duration runs to the end (onset + duration) of
//! the trial right before the rest trial. The rest trial belongs to no block. A rest trial as
//! the very first trial of a material type is an error, and the whole input is rejected.
//!
//! Trials left over after the last rest trial do not form a block unless
//! `emit_trailing_block` is set, in which case the final block ends with the last trial.
//! Leaving it off reproduces timing files made with earlier tools.
//!
//! ## Configuration
//!
//! The YAML format of a configuration file is as follows:
//!
//! ```yml
//! input_path: None
//! output_path: Memory Block timing files
//! phase: Recog
//! file_keyword: recognition
//! none_marker: 'FALSE'
//! columns:
//!   onset: Onset_Time
//!   duration: Duration
//!   condition: Condition
//!   material: Material_T
//! material_types:
//! - label: Object
//!   code: Obj
//! - label: Scene
//!   code: Scene
//! - label: Pair
//!   code: Pair
//! emit_trailing_block: false
//! n_threads: 1
//! ```
//!
//! `input_path` may be a single file or a directory. Directories are scanned for files whose
//! name contains `file_keyword` (case-insensitive; set it to `null` to take every file).
//!
//! ## Output
//!
//! One file per run and material type, named `<phase>_<Run>_<code>.txt`, e.g.
//! `Recog_Run1_Obj.txt`. Material types without trials in a run produce no file. Each line is
//!
//! ```text
//! <onset>\t<duration>\t1
//! ```
//!
//! with onset and duration printed to 6 decimal places. Files are only written once every
//! material type of the run has been segmented, so a rejected input leaves no files behind.
pub mod config;
pub mod error;
pub mod inputs;
pub mod process;
pub mod row_source;
pub mod segmenter;
pub mod table;
pub mod timing_writer;
pub mod trial;
pub mod worker_status;
