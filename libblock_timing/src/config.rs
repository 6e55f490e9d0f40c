use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::trial::TrailingBlockPolicy;

/// Names of the trial log columns the converter reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub onset: String,
    pub duration: String,
    pub condition: String,
    pub material: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            onset: String::from("Onset_Time"),
            duration: String::from("Duration"),
            condition: String::from("Condition"),
            material: String::from("Material_T"),
        }
    }
}

/// A material-type label as it appears in the trial log, and the short code used in output names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialType {
    pub label: String,
    pub code: String,
}

impl MaterialType {
    pub fn new(label: &str, code: &str) -> Self {
        Self {
            label: label.to_string(),
            code: code.to_string(),
        }
    }
}

/// Structure representing the application configuration. Contains pathing, naming and
/// segmentation options.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub phase: String,
    pub file_keyword: Option<String>,
    pub none_marker: String,
    pub columns: ColumnNames,
    pub material_types: Vec<MaterialType>,
    pub emit_trailing_block: bool,
    pub n_threads: i32,
}

impl Default for Config {
    /// Generate a new Config object. The input path is empty/invalid, everything else
    /// matches the recognition-phase memory task
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("None"),
            output_path: PathBuf::from("Memory Block timing files"),
            phase: String::from("Recog"),
            file_keyword: Some(String::from("recognition")),
            none_marker: String::from("FALSE"),
            columns: ColumnNames::default(),
            material_types: vec![
                MaterialType::new("Object", "Obj"),
                MaterialType::new("Scene", "Scene"),
                MaterialType::new("Pair", "Pair"),
            ],
            emit_trailing_block: false,
            n_threads: 1,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Check the configuration for values that would make processing meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_n_threads_valid() {
            return Err(ConfigError::BadThreadCount(self.n_threads));
        }
        if self.material_types.is_empty() {
            return Err(ConfigError::NoMaterialTypes);
        }
        let mut labels = HashSet::new();
        let mut codes = HashSet::new();
        for material in self.material_types.iter() {
            if !labels.insert(material.label.as_str()) {
                return Err(ConfigError::DuplicateMaterialType(material.label.clone()));
            }
            // Codes name the output files, so a shared code would overwrite a partition
            if !codes.insert(material.code.as_str()) {
                return Err(ConfigError::DuplicateMaterialCode(material.code.clone()));
            }
        }
        if self.none_marker.trim().is_empty() {
            return Err(ConfigError::EmptyNoneMarker);
        }
        Ok(())
    }

    /// Get the path to an output timing file: `<Phase>_<Run>_<MaterialCode>.txt`
    pub fn get_output_file_path(&self, run: &str, material_code: &str) -> PathBuf {
        self.output_path
            .join(format!("{}_{}_{}.txt", self.phase, run, material_code))
    }

    pub fn trailing_policy(&self) -> TrailingBlockPolicy {
        if self.emit_trailing_block {
            TrailingBlockPolicy::Emit
        } else {
            TrailingBlockPolicy::Discard
        }
    }

    pub fn is_n_threads_valid(&self) -> bool {
        self.n_threads >= 1
    }

    /// Does a file name pass the keyword filter? Matching is case-insensitive.
    pub fn matches_keyword(&self, file_name: &str) -> bool {
        match &self.file_keyword {
            Some(keyword) => file_name
                .to_lowercase()
                .contains(&keyword.to_lowercase()),
            None => true,
        }
    }
}
