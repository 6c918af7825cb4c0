use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{discover::FilePolicy, schema::SchemaCheck};

/// Settings for one merge run. Every field has a default, so a YAML file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root holding one subfolder per month.
    pub input_dir: PathBuf,
    /// Directory the combined CSV is written into.
    pub output_dir: PathBuf,
    /// File name of the combined CSV inside `output_dir`.
    pub output_file: String,
    /// Month whose columns every other month is compared against.
    pub reference_month: String,
    /// Name of the column tagging each row with its month.
    pub month_column: String,
    /// Write a leading row-index column.
    pub write_index: bool,
    pub schema_check: SchemaCheck,
    pub file_policy: FilePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Data/raw_data"),
            output_dir: PathBuf::from("Data/processed_data"),
            output_file: "joined_data.csv".into(),
            reference_month: "July".into(),
            month_column: "Month".into(),
            write_index: true,
            schema_check: SchemaCheck::default(),
            file_policy: FilePolicy::default(),
        }
    }
}

impl Config {
    /// Read a YAML config file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // an empty document deserializes to unit, not to an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid YAML config")
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_data_layout() {
        let cfg = Config::default();
        assert_eq!(cfg.input_dir, PathBuf::from("Data/raw_data"));
        assert_eq!(
            cfg.output_path(),
            PathBuf::from("Data/processed_data/joined_data.csv")
        );
        assert_eq!(cfg.reference_month, "July");
        assert_eq!(cfg.month_column, "Month");
        assert!(cfg.write_index);
        assert_eq!(cfg.schema_check, SchemaCheck::Symmetric);
        assert_eq!(cfg.file_policy, FilePolicy::ExactlyOne);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() -> Result<()> {
        let cfg = Config::from_yaml_str(
            "reference_month: August\nschema_check: added_only\nfile_policy: first_lexicographic\n",
        )?;
        assert_eq!(cfg.reference_month, "August");
        assert_eq!(cfg.schema_check, SchemaCheck::AddedOnly);
        assert_eq!(cfg.file_policy, FilePolicy::FirstLexicographic);
        assert_eq!(cfg.output_file, "joined_data.csv");
        Ok(())
    }

    #[test]
    fn empty_yaml_is_default() -> Result<()> {
        assert_eq!(Config::from_yaml_str("  \n")?, Config::default());
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_yaml_str("refrence_month: July\n").is_err());
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "input_dir: /srv/raw\nwrite_index: false")?;
        let cfg = Config::from_yaml_file(tmp.path())?;
        assert_eq!(cfg.input_dir, PathBuf::from("/srv/raw"));
        assert!(!cfg.write_index);
        Ok(())
    }
}
