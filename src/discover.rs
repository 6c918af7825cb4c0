// src/discover.rs

use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::error::{io_at, MergeError, Result};

/// How to pick the data file inside a month folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePolicy {
    /// The folder must hold exactly one data file.
    #[default]
    ExactlyOne,
    /// Take the lexicographically smallest file name.
    FirstLexicographic,
}

/// Month key of a folder name: everything before the first underscore,
/// or the whole name when there is none.
///
/// `"July_2021"` → `"July"`, `"August"` → `"August"`.
pub fn month_key(folder_name: &str) -> &str {
    match folder_name.find('_') {
        Some(idx) => &folder_name[..idx],
        None => folder_name,
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Walk `root` one level deep and map each month key to the data file of its
/// folder.
#[tracing::instrument(level = "info", skip(root), fields(root = %root.as_ref().display()))]
pub fn discover_month_files<P: AsRef<Path>>(
    root: P,
    policy: FilePolicy,
) -> Result<BTreeMap<String, PathBuf>> {
    let root = root.as_ref();

    let mut folders: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(root).map_err(io_at(root))? {
        let entry = entry.map_err(io_at(root))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            debug!(entry = %path.display(), "skipping hidden entry");
            continue;
        }
        if !path.is_dir() {
            warn!(entry = %path.display(), "skipping non-directory entry under input root");
            continue;
        }
        folders.push((name, path));
    }
    folders.sort();

    let mut files: BTreeMap<String, PathBuf> = BTreeMap::new();
    for (name, folder) in folders {
        let file = pick_data_file(&folder, policy)?;
        let month = month_key(&name).to_string();
        if let Some(first) = files.get(&month) {
            return Err(MergeError::DuplicateMonth {
                month,
                first: first.clone(),
                second: file,
            });
        }
        debug!(month = %month, file = %file.display(), "registered month");
        files.insert(month, file);
    }

    info!("discovered {} month folders", files.len());
    Ok(files)
}

fn pick_data_file(folder: &Path, policy: FilePolicy) -> Result<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(folder).map_err(io_at(folder))? {
        let entry = entry.map_err(io_at(folder))?;
        let path = entry.path();
        if is_hidden(&entry.file_name().to_string_lossy()) || !path.is_file() {
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    match (paths.len(), policy) {
        (0, _) => Err(MergeError::EmptyMonthFolder {
            folder: folder.to_path_buf(),
        }),
        (1, _) | (_, FilePolicy::FirstLexicographic) => Ok(paths.swap_remove(0)),
        (_, FilePolicy::ExactlyOne) => Err(MergeError::AmbiguousMonthFolder {
            folder: folder.to_path_buf(),
            files: paths
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
        }),
    }
}
