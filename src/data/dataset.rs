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

use crate::core::{error::DatasetError, tensor::Tensor};
use crate::data::candidate::{CandidateRecord, FileList, Label, Phase};
use crate::data::image_decoder::{open_rgb, ImageDecoder};
use crate::data::image_transform::ImageTransform;
use std::path::Path;
use std::sync::Arc;

pub const NUM_CLASSES: usize = 2;

/// Trait defining the interface for datasets
pub trait Dataset: Send + Sync {
    fn len(&self) -> usize;
    /// Returns the `[C, H, W]` image tensor and its integer label.
    fn get(&self, index: usize) -> Result<(Tensor, usize), DatasetError>;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn num_classes(&self) -> usize {
        NUM_CLASSES
    }
    fn iter(&self) -> DatasetIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetIter {
            dataset: self,
            index: 0,
        }
    }
}

/// Walks `0..len()` in order, loading each sample.
pub struct DatasetIter<'a, D: Dataset> {
    dataset: &'a D,
    index: usize,
}

impl<'a, D: Dataset> Iterator for DatasetIter<'a, D> {
    type Item = Result<(Tensor, usize), DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.dataset.len() {
            return None;
        }
        let item = self.dataset.get(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// Decodes `path`, runs the phase pipeline and drops the batch axis.
pub(crate) fn load_sample(
    path: &Path,
    transform: Option<&ImageTransform>,
    phase: Phase,
) -> Result<Tensor, DatasetError> {
    let image = open_rgb(path)?;
    let image = match transform {
        Some(transform) => transform.apply(&image, phase)?,
        None => ImageDecoder::from_rgb(image).to_tensor()?,
    };
    let (_, channels, height, width) = image.dims4()?;
    image.reshape(&[channels, height, width])
}

/// Linear view over one phase of a [`FileList`].
pub struct ImageDataset {
    records: Vec<CandidateRecord>,
    transform: Option<Arc<ImageTransform>>,
    phase: Phase,
}

impl ImageDataset {
    pub fn new(file_list: &FileList, transform: Option<Arc<ImageTransform>>, phase: Phase) -> Self {
        ImageDataset {
            records: file_list.get(phase).to_vec(),
            transform,
            phase,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn record(&self, index: usize) -> Option<&CandidateRecord> {
        self.records.get(index)
    }
}

impl Dataset for ImageDataset {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn get(&self, index: usize) -> Result<(Tensor, usize), DatasetError> {
        let record = self
            .records
            .get(index)
            .ok_or(DatasetError::IndexOutOfBounds)?;

        let image = load_sample(record.path(), self.transform.as_deref(), self.phase)?;
        // The label is read back from the directory name, not from the record.
        let label = Label::from_path(record.path());

        Ok((image, label.index()))
    }
}
