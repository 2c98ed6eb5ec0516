// Copyright (C) 2025 Bellande Artificial Intelligence Computer Vision Research Innovation Center, Ronaldson Bellande

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Candidate discovery for the hymenoptera layout:
//!
//! ```text
//! root/
//!   train/ants/*.jpg
//!   train/bees/*.jpg
//!   val/ants/*.jpg
//!   val/bees/*.jpg
//! ```

use crate::core::error::DatasetError;
use glob::Pattern;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const POSITIVE_CLASS_DIR: &str = "ants";
const IMAGE_PATTERN: &str = "*.jpg";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Bee = 0,
    Ant = 1,
}

impl Label {
    /// `ants` is the positive class, every other directory name is negative.
    pub fn from_dir_name(name: &str) -> Self {
        if name == POSITIVE_CLASS_DIR {
            Label::Ant
        } else {
            Label::Bee
        }
    }

    /// Label from the name of the file's immediate parent directory.
    pub fn from_path(path: &Path) -> Self {
        let dir_name = path
            .parent()
            .and_then(|parent| parent.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_dir_name(&dir_name)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Label::Bee),
            1 => Some(Label::Ant),
            _ => None,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Label::Ant)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Train,
    Val,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Train => "train",
            Phase::Val => "val",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Phase {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Phase::Train),
            "val" => Ok(Phase::Val),
            other => Err(DatasetError::UnknownPhase(other.to_string())),
        }
    }
}

/// A labeled image path. Nothing about the file is checked until it is read.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateRecord {
    label: Label,
    path: PathBuf,
}

impl CandidateRecord {
    pub fn new(label: Label, path: PathBuf) -> Self {
        CandidateRecord { label, path }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Collects every `root/<phase>/*/*.jpg`, labeled by its parent directory.
///
/// A missing or empty phase directory gives an empty list.
pub fn make_path_list<P: AsRef<Path>>(
    root: P,
    phase: Phase,
) -> Result<Vec<CandidateRecord>, DatasetError> {
    let phase_dir = root.as_ref().join(phase.as_str());
    let pattern = format!(
        "{}/*/{}",
        Pattern::escape(&phase_dir.to_string_lossy()),
        IMAGE_PATTERN
    );

    let mut records = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        records.push(CandidateRecord::new(Label::from_path(&path), path));
    }

    debug!(
        "Found {} candidates under {}",
        records.len(),
        phase_dir.display()
    );
    Ok(records)
}

/// Candidate records per phase, in scan order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileList {
    lists: BTreeMap<Phase, Vec<CandidateRecord>>,
}

impl FileList {
    pub fn new() -> Self {
        FileList {
            lists: BTreeMap::new(),
        }
    }

    pub fn scan<P: AsRef<Path>>(root: P, phases: &[Phase]) -> Result<Self, DatasetError> {
        let mut file_list = FileList::new();
        for &phase in phases {
            file_list.insert(phase, make_path_list(root.as_ref(), phase)?);
        }
        Ok(file_list)
    }

    pub fn insert(&mut self, phase: Phase, records: Vec<CandidateRecord>) {
        self.lists.insert(phase, records);
    }

    pub fn get(&self, phase: Phase) -> &[CandidateRecord] {
        self.lists.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, phase: Phase) -> usize {
        self.get(phase).len()
    }

    pub fn phases(&self) -> impl Iterator<Item = Phase> + '_ {
        self.lists.keys().copied()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DatasetError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_parent_directory() {
        assert_eq!(
            Label::from_path(Path::new("data/train/ants/a.jpg")),
            Label::Ant
        );
        assert_eq!(
            Label::from_path(Path::new("data/train/bees/c.jpg")),
            Label::Bee
        );
        assert_eq!(Label::from_path(Path::new("wasps/w.jpg")), Label::Bee);
        assert_eq!(Label::from_path(Path::new("orphan.jpg")), Label::Bee);
        assert_eq!(Label::Ant.index(), 1);
        assert_eq!(Label::Bee.index(), 0);
        assert_eq!(Label::from_index(1), Some(Label::Ant));
        assert_eq!(Label::from_index(2), None);
    }

    #[test]
    fn phase_parsing() {
        assert_eq!("train".parse::<Phase>().unwrap(), Phase::Train);
        assert_eq!("val".parse::<Phase>().unwrap(), Phase::Val);
        assert!(matches!(
            "test".parse::<Phase>(),
            Err(DatasetError::UnknownPhase(_))
        ));
        assert_eq!(Phase::Val.to_string(), "val");
    }

    #[test]
    fn missing_phase_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records = make_path_list(dir.path(), Phase::Val).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn absent_phase_reads_as_empty_slice() {
        let mut file_list = FileList::new();
        file_list.insert(
            Phase::Train,
            vec![CandidateRecord::new(Label::Ant, "train/ants/a.jpg".into())],
        );
        assert_eq!(file_list.len(Phase::Train), 1);
        assert!(file_list.get(Phase::Val).is_empty());
        assert_eq!(file_list.phases().collect::<Vec<_>>(), vec![Phase::Train]);
    }
}
