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

//! Class-balanced view over one phase.
//!
//! With ratio `r > 0` every block of `r + 1` consecutive indices starts with
//! one positive (`ants`) sample followed by `r` negatives. Each partition is
//! walked independently and wraps around when exhausted, so an epoch may
//! repeat some records and skip others.

use crate::core::{error::DatasetError, random, tensor::Tensor};
use crate::data::candidate::{CandidateRecord, FileList, Phase};
use crate::data::dataset::{load_sample, Dataset};
use crate::data::image_transform::ImageTransform;
use log::{debug, warn};
use std::sync::Arc;

pub const DEFAULT_RECORDS: usize = 300;

pub struct BalancedDataset {
    records: Vec<CandidateRecord>,
    negatives: Vec<CandidateRecord>,
    positives: Vec<CandidateRecord>,
    ratio: usize,
    epoch_records: usize,
    transform: Option<Arc<ImageTransform>>,
    phase: Phase,
}

impl BalancedDataset {
    /// `ratio == 0` turns balancing off: the dataset is then a plain
    /// (shuffled) view of the phase with its true length.
    pub fn new(
        file_list: &FileList,
        ratio: usize,
        transform: Option<Arc<ImageTransform>>,
        phase: Phase,
        records: usize,
    ) -> Self {
        let mut shuffled = file_list.get(phase).to_vec();
        random::shuffle(&mut shuffled);

        let (positives, negatives): (Vec<_>, Vec<_>) = shuffled
            .iter()
            .cloned()
            .partition(|record| record.label().is_positive());

        debug!(
            "Balanced {} dataset: {} positives, {} negatives, ratio {}",
            phase,
            positives.len(),
            negatives.len(),
            ratio
        );
        if ratio > 0 && (positives.is_empty() || negatives.is_empty()) {
            warn!(
                "Balanced {} dataset has an empty partition; indexing it will fail",
                phase
            );
        }

        BalancedDataset {
            records: shuffled,
            negatives,
            positives,
            ratio,
            epoch_records: records,
            transform,
            phase,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.ratio > 0
    }

    pub fn ratio(&self) -> usize {
        self.ratio
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn positives(&self) -> &[CandidateRecord] {
        &self.positives
    }

    pub fn negatives(&self) -> &[CandidateRecord] {
        &self.negatives
    }

    /// Reorders both partitions between epochs. No-op when unbalanced.
    pub fn shuffle_samples(&mut self) {
        if self.is_balanced() {
            random::shuffle(&mut self.negatives);
            random::shuffle(&mut self.positives);
        }
    }

    /// Resolves `index` to a record without touching the file system.
    pub fn candidate(&self, index: usize) -> Result<&CandidateRecord, DatasetError> {
        if !self.is_balanced() {
            return self
                .records
                .get(index)
                .ok_or(DatasetError::IndexOutOfBounds);
        }

        let block = self.ratio.checked_add(1).ok_or_else(|| {
            DatasetError::InvalidParameter(format!("ratio {} is too large", self.ratio))
        })?;
        let pos_index = index / block;

        if index % block != 0 {
            if self.negatives.is_empty() {
                return Err(DatasetError::EmptyPartition(format!(
                    "no negative samples in {}",
                    self.phase
                )));
            }
            let neg_index = (index - 1 - pos_index) % self.negatives.len();
            Ok(&self.negatives[neg_index])
        } else {
            if self.positives.is_empty() {
                return Err(DatasetError::EmptyPartition(format!(
                    "no positive samples in {}",
                    self.phase
                )));
            }
            Ok(&self.positives[pos_index % self.positives.len()])
        }
    }
}

impl Dataset for BalancedDataset {
    fn len(&self) -> usize {
        if self.is_balanced() {
            self.epoch_records
        } else {
            self.records.len()
        }
    }

    fn get(&self, index: usize) -> Result<(Tensor, usize), DatasetError> {
        let record = self.candidate(index)?;
        let image = load_sample(record.path(), self.transform.as_deref(), self.phase)?;
        Ok((image, record.label().index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::candidate::Label;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn file_list(ants: usize, bees: usize) -> FileList {
        let mut records = Vec::new();
        for i in 0..ants {
            records.push(CandidateRecord::new(
                Label::Ant,
                PathBuf::from(format!("train/ants/{}.jpg", i)),
            ));
        }
        for i in 0..bees {
            records.push(CandidateRecord::new(
                Label::Bee,
                PathBuf::from(format!("train/bees/{}.jpg", i)),
            ));
        }
        let mut list = FileList::new();
        list.insert(Phase::Train, records);
        list
    }

    #[test]
    fn length_depends_on_ratio() {
        let list = file_list(3, 4);
        assert_eq!(BalancedDataset::new(&list, 1, None, Phase::Train, 300).len(), 300);
        assert_eq!(BalancedDataset::new(&list, 0, None, Phase::Train, 300).len(), 7);
    }

    #[test]
    fn oversized_ratio_is_rejected() {
        let dataset = BalancedDataset::new(&file_list(2, 2), usize::MAX, None, Phase::Train, 10);
        for index in [0, 1, usize::MAX] {
            assert!(matches!(
                dataset.candidate(index),
                Err(DatasetError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn ratio_one_alternates_labels() {
        let dataset = BalancedDataset::new(&file_list(3, 5), 1, None, Phase::Train, 40);
        for index in 0..dataset.len() {
            let label = dataset.candidate(index).unwrap().label();
            if index % 2 == 0 {
                assert_eq!(label, Label::Ant, "index {}", index);
            } else {
                assert_eq!(label, Label::Bee, "index {}", index);
            }
        }
    }

    #[test]
    fn ratio_three_places_one_positive_per_block() {
        let dataset = BalancedDataset::new(&file_list(2, 9), 3, None, Phase::Train, 24);
        for block in 0..6 {
            let labels: Vec<Label> = (0..4)
                .map(|offset| dataset.candidate(block * 4 + offset).unwrap().label())
                .collect();
            assert_eq!(labels, vec![Label::Ant, Label::Bee, Label::Bee, Label::Bee]);
        }
    }

    #[test]
    fn index_arithmetic_matches_partitions() {
        let dataset = BalancedDataset::new(&file_list(2, 3), 2, None, Phase::Train, 12);
        // index 7: block 2, offset 1 -> negative (7 - 1 - 2) % 3 = 1
        assert_eq!(dataset.candidate(7).unwrap(), &dataset.negatives()[1]);
        // index 9: block 3, offset 0 -> positive 3 % 2 = 1
        assert_eq!(dataset.candidate(9).unwrap(), &dataset.positives()[1]);
        // the formula wraps past the configured length
        assert!(dataset.candidate(1000).is_ok());
    }

    #[test]
    fn empty_partition_is_an_error() {
        let dataset = BalancedDataset::new(&file_list(0, 4), 1, None, Phase::Train, 10);
        assert!(matches!(
            dataset.candidate(0),
            Err(DatasetError::EmptyPartition(_))
        ));
        assert!(dataset.candidate(1).is_ok());

        let dataset = BalancedDataset::new(&file_list(4, 0), 1, None, Phase::Train, 10);
        assert!(dataset.candidate(0).is_ok());
        assert!(matches!(
            dataset.candidate(1),
            Err(DatasetError::EmptyPartition(_))
        ));
    }

    #[test]
    fn unbalanced_indexing_is_bounded() {
        let dataset = BalancedDataset::new(&file_list(1, 1), 0, None, Phase::Train, 10);
        assert!(dataset.candidate(1).is_ok());
        assert!(matches!(
            dataset.candidate(2),
            Err(DatasetError::IndexOutOfBounds)
        ));
    }

    #[test]
    fn reshuffle_keeps_the_record_set() {
        random::set_seed(42);
        let mut dataset = BalancedDataset::new(&file_list(10, 10), 1, None, Phase::Train, 20);
        let epoch = |d: &BalancedDataset| -> Vec<CandidateRecord> {
            (0..d.len()).map(|i| d.candidate(i).unwrap().clone()).collect()
        };

        let before = epoch(&dataset);
        let mut orders_changed = false;
        for _ in 0..5 {
            dataset.shuffle_samples();
            let after = epoch(&dataset);
            let lhs: HashSet<_> = before.iter().collect();
            let rhs: HashSet<_> = after.iter().collect();
            assert_eq!(lhs, rhs);
            orders_changed |= after != before;
        }
        assert!(orders_changed);
    }

    #[test]
    fn missing_phase_gives_empty_unbalanced_dataset() {
        let dataset = BalancedDataset::new(&file_list(2, 2), 0, None, Phase::Val, 10);
        assert!(dataset.is_empty());
    }
}
