//! # block_timing_cli
//!
//! Part of the block_timing crate family.
//!
//! This is the application to convert trial logs into block timing files from the command line.
//!
//! ## Use
//!
//! Make a template configuration file, edit it, then run the conversion
//!
//! ```bash
//! block_timing_cli -p config.yml new
//! block_timing_cli -p config.yml
//! ```
//!
//! The input and output locations of the configuration can be overridden with `-i/--input`
//! and `-o/--output`, and `--emit-trailing` keeps the final block of trials that is not
//! followed by a rest trial.
use clap::{Arg, ArgAction, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use libblock_timing::config::Config;
use libblock_timing::error::{ConfigError, ProcessorError};
use libblock_timing::inputs::collect_inputs;
use libblock_timing::process::{create_subsets, process_subset, FileOutcome};
use libblock_timing::worker_status::{BarColor, WorkerStatus};

const LOG_FILE: &str = "block_timing.log";

fn make_template_config(path: &Path) -> Result<(), ConfigError> {
    Config::default().write_config_file(path)
}

/// Log to the terminal and to a log file, if one can be made
fn init_logging(pb_manager: &MultiProgress) {
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = Vec::new();
    loggers.push(simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    ));
    match File::create(LOG_FILE) {
        Ok(file) => loggers.push(simplelog::WriteLogger::new(
            simplelog::LevelFilter::Info,
            simplelog::Config::default(),
            file,
        )),
        Err(e) => eprintln!("Could not create log file {LOG_FILE}: {e}"),
    }
    let logger = simplelog::CombinedLogger::new(loggers);

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
    }
}

fn bar_style(color: &BarColor) -> ProgressStyle {
    let template = match color {
        BarColor::CYAN => "[worker {prefix}] {bar:40.cyan/blue} {pos:>3}% {msg}",
        BarColor::GREEN => "[worker {prefix}] {bar:40.green/blue} {pos:>3}% {msg}",
        BarColor::RED => "[worker {prefix}] {bar:40.red/blue} {pos:>3}% {msg}",
    };
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn main() -> ExitCode {
    // Create a cli
    let matches = Command::new("block_timing_cli")
        .about("Convert trial logs into block timing files")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .required(true)
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("Input file or directory, overriding the configuration"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory, overriding the configuration"),
        )
        .arg(
            Arg::new("emit-trailing")
                .long("emit-trailing")
                .action(ArgAction::SetTrue)
                .help("Emit the final block even when no rest trial closes it"),
        )
        .get_matches();

    // Initialize feedback
    let pb_manager = MultiProgress::new();
    init_logging(&pb_manager);

    // Parse the cli
    let config_path = match matches.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A configuration path is required");
            return ExitCode::FAILURE;
        }
    };

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        return match make_template_config(&config_path) {
            Ok(()) => {
                log::info!("Done.");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let mut config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(input) = matches.get_one::<String>("input") {
        config.input_path = PathBuf::from(input);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output_path = PathBuf::from(output);
    }
    if matches.get_flag("emit-trailing") {
        config.emit_trailing_block = true;
    }
    if let Err(e) = config.validate() {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }
    log::info!("Config successfully loaded.");
    log::info!("Input Path: {}", config.input_path.to_string_lossy());
    log::info!("Output Path: {}", config.output_path.to_string_lossy());
    log::info!("Phase: {}", config.phase);
    log::info!(
        "Material Types: {}",
        config
            .material_types
            .iter()
            .map(|m| format!("{} -> {}", m.label, m.code))
            .collect::<Vec<_>>()
            .join(", ")
    );
    if config.emit_trailing_block {
        log::warn!("Trailing blocks will be emitted; output will differ from earlier timing files");
    }

    let inputs = match collect_inputs(&config) {
        Ok(i) => i,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if inputs.is_empty() {
        log::warn!("No input files found, nothing to do.");
        return ExitCode::SUCCESS;
    }
    log::info!("Found {} input files.", inputs.len());

    // Spawn the workers!
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    let mut workers: Vec<JoinHandle<Result<Vec<FileOutcome>, ProcessorError>>> = Vec::new();
    let mut bars: Vec<ProgressBar> = Vec::new();
    for (idx, subset) in create_subsets(&inputs, config.n_threads as usize)
        .into_iter()
        .enumerate()
    {
        // Dont make empty workers
        if subset.is_empty() {
            continue;
        }
        let bar = pb_manager.add(ProgressBar::new(100));
        bar.set_style(bar_style(&BarColor::CYAN));
        bar.set_prefix(idx.to_string());
        bars.push(bar);
        let conf = config.clone();
        let worker_tx = tx.clone();
        workers.push(std::thread::spawn(move || {
            process_subset(conf, worker_tx, idx, subset)
        }));
    }
    drop(tx);

    // Update the bars until every worker hangs up
    loop {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(status) => {
                if let Some(bar) = bars.get(status.worker_id) {
                    bar.set_style(bar_style(&status.color));
                    bar.set_position((status.progress * 100.0) as u64);
                    bar.set_message(status.input_name);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    let mut n_converted = 0;
    let mut n_failed = 0;
    for worker in workers {
        match worker.join() {
            Ok(Ok(outcomes)) => {
                for outcome in outcomes {
                    match outcome {
                        FileOutcome::Converted { .. } => n_converted += 1,
                        FileOutcome::Failed { input, reason } => {
                            n_failed += 1;
                            log::error!("{} was not converted: {reason}", input.display());
                        }
                    }
                }
            }
            Ok(Err(e)) => {
                n_failed += 1;
                log::error!("Worker failed with error: {e}");
            }
            Err(_) => {
                n_failed += 1;
                log::error!("Failed to join a worker!");
            }
        }
    }
    for bar in bars {
        bar.finish();
    }

    log::info!("Converted {n_converted} files, {n_failed} failed.");
    log::info!(
        "Timing files saved to: {}",
        config.output_path.to_string_lossy()
    );
    if n_failed > 0 {
        log::warn!("Some inputs failed; check {LOG_FILE} for details.");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
