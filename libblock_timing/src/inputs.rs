use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::config::Config;
use super::error::InputError;
use super::table::Table;

/// Office applications leave lock files next to open workbooks
const LOCK_FILE_PREFIX: &str = "~$";

/// One trial log to convert, along with the run it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub run: String,
}

impl InputFile {
    /// Recover the run identifier from a file name of the form `<Run>_<Description>.<ext>`
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| InputError::BadFileName(path.to_path_buf()))?;
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 2 || parts[0].is_empty() {
            return Err(InputError::BadFileName(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            run: parts[0].to_string(),
        })
    }

    /// File name for messages
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

/// Gather the inputs named by the config.
///
/// A file path is taken as is. A directory is scanned (not recursively) for supported
/// spreadsheets passing the keyword filter; the result is sorted by path. Improperly named
/// files are skipped with a warning, as is any file whose run was already taken by an earlier
/// file, since both would write the same timing files.
pub fn collect_inputs(config: &Config) -> Result<Vec<InputFile>, InputError> {
    let path = &config.input_path;
    if !path.exists() {
        return Err(InputError::BadFilePath(path.clone()));
    }

    let candidates = if path.is_dir() {
        get_file_stack(path, config)?
    } else {
        vec![path.clone()]
    };

    let mut inputs: Vec<InputFile> = Vec::new();
    let mut runs: HashMap<String, usize> = HashMap::new();
    for candidate in candidates {
        let input = match InputFile::from_path(&candidate) {
            Ok(input) => input,
            Err(e) => {
                log::warn!("Skipping file: {e}");
                continue;
            }
        };
        if let Some(first) = runs.get(&input.run) {
            log::warn!(
                "Skipping {} because run {} is already provided by {}",
                input.name(),
                input.run,
                inputs[*first].name()
            );
            continue;
        }
        runs.insert(input.run.clone(), inputs.len());
        inputs.push(input);
    }
    Ok(inputs)
}

/// Get all of the matching spreadsheets in a directory
fn get_file_stack(parent_path: &Path, config: &Config) -> Result<Vec<PathBuf>, InputError> {
    let mut file_list: Vec<PathBuf> = Vec::new();
    for item in parent_path.read_dir()? {
        let item_path = item?.path();
        if !item_path.is_file() || !Table::is_supported(&item_path) {
            continue;
        }
        let file_name = match item_path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };
        if file_name.starts_with(LOCK_FILE_PREFIX) || !config.matches_keyword(&file_name) {
            continue;
        }
        file_list.push(item_path);
    }
    file_list.sort(); // Run prefixes sort together, so this keeps runs in order
    Ok(file_list)
}

//Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_run_from_file_name() {
        let input = InputFile::from_path(Path::new("/data/Run3_Recognition_v2.xlsx")).unwrap();
        assert_eq!(input.run, "Run3");
        assert_eq!(input.name(), "Run3_Recognition_v2.xlsx");
    }

    #[test]
    fn test_improper_file_name() {
        match InputFile::from_path(Path::new("/data/Recognition.xlsx")) {
            Err(InputError::BadFileName(_)) => (),
            _ => panic!(),
        }
    }

    #[test]
    fn test_collect_directory() {
        let dir = tempdir().unwrap();
        for name in [
            "Run2_Recognition.xlsx",
            "Run1_Recognition.csv",
            "Run1_Encoding.xlsx",
            "~$Run1_Recognition.xlsx",
            "Run1_recognition_notes.txt",
            "RECOGNITION.xlsx",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("Run9_Recognition.xlsx.d")).unwrap();

        let mut config = Config::default();
        config.input_path = dir.path().to_path_buf();
        let inputs = collect_inputs(&config).unwrap();

        let names: Vec<String> = inputs.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["Run1_Recognition.csv", "Run2_Recognition.xlsx"]);
        assert_eq!(inputs[0].run, "Run1");
        assert_eq!(inputs[1].run, "Run2");
    }

    #[test]
    fn test_collect_keeps_first_file_of_a_run() {
        let dir = tempdir().unwrap();
        for name in [
            "Run1_Recognition.xlsx",
            "Run1_Recognition.csv",
            "Run1_Recognition_v2.xlsx",
            "Run2_Recognition.csv",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let mut config = Config::default();
        config.input_path = dir.path().to_path_buf();
        let inputs = collect_inputs(&config).unwrap();

        let names: Vec<String> = inputs.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["Run1_Recognition.csv", "Run2_Recognition.csv"]);
        let runs: Vec<&str> = inputs.iter().map(|i| i.run.as_str()).collect();
        assert_eq!(runs, vec!["Run1", "Run2"]);
    }

    #[test]
    fn test_collect_single_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Run4_Anything.csv");
        std::fs::write(&path, "").unwrap();

        let mut config = Config::default();
        config.input_path = path.clone();
        let inputs = collect_inputs(&config).unwrap();
        assert_eq!(
            inputs,
            vec![InputFile {
                path,
                run: String::from("Run4")
            }]
        );
    }

    #[test]
    fn test_collect_missing_path() {
        let mut config = Config::default();
        config.input_path = PathBuf::from("/no/such/input");
        assert!(matches!(
            collect_inputs(&config),
            Err(InputError::BadFilePath(_))
        ));
    }
}
