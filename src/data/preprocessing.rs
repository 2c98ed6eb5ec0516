// Copyright (C) 2024 Bellande Artificial Intelligence Computer Vision Research Innovation Center, Ronaldson Bellande

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
use crate::data::augmentation::Transform;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Tensor-level steps that run after an image has been converted.
pub trait Preprocessor: Send + Sync {
    fn process(&self, tensor: &Tensor) -> Result<Tensor, DatasetError>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeTarget {
    /// Scale the shorter side to this length, keeping the aspect ratio.
    ShorterSide(u32),
    Exact { width: u32, height: u32 },
}

/// Bilinear (triangle filter) resize
pub struct Resize {
    target: ResizeTarget,
}

impl Resize {
    pub fn new(size: u32) -> Self {
        Self {
            target: ResizeTarget::ShorterSide(size),
        }
    }

    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            target: ResizeTarget::Exact { width, height },
        }
    }

    fn output_size(&self, in_width: u32, in_height: u32) -> (u32, u32) {
        let scaled = |size: u32, long: u32, short: u32| {
            ((u64::from(size) * u64::from(long) / u64::from(short)) as u32).max(1)
        };
        match self.target {
            ResizeTarget::Exact { width, height } => (width, height),
            ResizeTarget::ShorterSide(size) if in_height <= in_width => {
                (scaled(size, in_width, in_height), size)
            }
            ResizeTarget::ShorterSide(size) => (size, scaled(size, in_height, in_width)),
        }
    }
}

impl Transform for Resize {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage, DatasetError> {
        let (in_width, in_height) = image.dimensions();
        if in_width == 0 || in_height == 0 {
            return Err(DatasetError::InvalidShape("Cannot resize an empty image".into()));
        }

        let (out_width, out_height) = self.output_size(in_width, in_height);
        if out_width == 0 || out_height == 0 {
            return Err(DatasetError::InvalidParameter(
                "Resize target must be positive".into(),
            ));
        }
        if (out_width, out_height) == (in_width, in_height) {
            return Ok(image.clone());
        }
        Ok(imageops::resize(
            image,
            out_width,
            out_height,
            FilterType::Triangle,
        ))
    }

    fn name(&self) -> &str {
        "Resize"
    }
}

/// Center crop transformation
pub struct CenterCrop {
    width: u32,
    height: u32,
}

impl CenterCrop {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Transform for CenterCrop {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage, DatasetError> {
        let (in_width, in_height) = image.dimensions();

        if in_height < self.height || in_width < self.width {
            return Err(DatasetError::InvalidOperation(
                "Crop size larger than input size".into(),
            ));
        }

        let left = (in_width - self.width) / 2;
        let top = (in_height - self.height) / 2;
        Ok(imageops::crop_imm(image, left, top, self.width, self.height).to_image())
    }

    fn name(&self) -> &str {
        "CenterCrop"
    }
}

/// Per-channel standardization: `(x - mean[c]) / std[c]`.
pub struct Normalize {
    mean: Vec<f32>,
    std: Vec<f32>,
}

impl Normalize {
    pub fn new(mean: Vec<f32>, std: Vec<f32>) -> Result<Self, DatasetError> {
        if mean.len() != std.len() {
            return Err(DatasetError::InvalidParameter(format!(
                "mean has {} values but std has {}",
                mean.len(),
                std.len()
            )));
        }
        if mean.iter().any(|m| !m.is_finite()) {
            return Err(DatasetError::InvalidParameter(
                "mean values must be finite".into(),
            ));
        }
        if std.iter().any(|&s| !(s.is_finite() && s > 0.0)) {
            return Err(DatasetError::InvalidParameter(
                "std values must be positive and finite".into(),
            ));
        }
        Ok(Normalize { mean, std })
    }
}

impl Preprocessor for Normalize {
    fn process(&self, tensor: &Tensor) -> Result<Tensor, DatasetError> {
        let (batch_size, channels, height, width) = tensor.dims4()?;

        if channels != self.mean.len() {
            return Err(DatasetError::InvalidShape(format!(
                "Normalize expects {} channels, got {}",
                self.mean.len(),
                channels
            )));
        }

        let plane = height * width;
        let mut normalized = tensor.clone();
        let data = normalized.data_mut();
        for b in 0..batch_size {
            for c in 0..channels {
                let start = (b * channels + c) * plane;
                for value in &mut data[start..start + plane] {
                    *value = (*value - self.mean[c]) / self.std[c];
                }
            }
        }

        Ok(normalized)
    }
}
