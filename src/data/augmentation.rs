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

use crate::core::{error::DatasetError, random};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Geometric step applied to a decoded image before tensor conversion.
pub trait Transform: Send + Sync {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage, DatasetError>;
    fn name(&self) -> &str;
}

pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Compose { transforms }
    }

    pub fn names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }
}

impl Transform for Compose {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage, DatasetError> {
        let mut current = image.clone();
        for transform in &self.transforms {
            current = transform.apply(&current)?;
        }
        Ok(current)
    }

    fn name(&self) -> &str {
        "Compose"
    }
}

pub struct RandomHorizontalFlip {
    p: f32,
}

impl RandomHorizontalFlip {
    pub fn new(p: f32) -> Result<Self, DatasetError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(DatasetError::InvalidParameter(format!(
                "Flip probability {} outside [0, 1]",
                p
            )));
        }
        Ok(RandomHorizontalFlip { p })
    }
}

impl Transform for RandomHorizontalFlip {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage, DatasetError> {
        if !random::bernoulli(self.p, 1)[0] {
            return Ok(image.clone());
        }
        Ok(imageops::flip_horizontal(image))
    }

    fn name(&self) -> &str {
        "RandomHorizontalFlip"
    }
}

/// Rotates counter-clockwise by `angle` degrees about the image center.
/// Nearest-neighbour sampling; uncovered pixels are filled with black.
pub fn rotate(image: &RgbImage, angle: f32) -> RgbImage {
    if angle == 0.0 {
        return image.clone();
    }
    // imageproc turns clockwise for positive angles.
    rotate_about_center(
        image,
        -angle.to_radians(),
        Interpolation::Nearest,
        Rgb([0, 0, 0]),
    )
}

pub struct RandomRotation {
    degrees: (f32, f32),
}

impl RandomRotation {
    pub fn new(degrees: (f32, f32)) -> Result<Self, DatasetError> {
        if !(degrees.0.is_finite() && degrees.1.is_finite()) {
            return Err(DatasetError::InvalidParameter(format!(
                "Rotation range ({}, {}) must be finite",
                degrees.0, degrees.1
            )));
        }
        if degrees.0 > degrees.1 {
            return Err(DatasetError::InvalidParameter(format!(
                "Rotation range ({}, {}) is inverted",
                degrees.0, degrees.1
            )));
        }
        Ok(RandomRotation { degrees })
    }

    /// Symmetric range `(-degrees, degrees)`.
    pub fn symmetric(degrees: f32) -> Result<Self, DatasetError> {
        Self::new((-degrees.abs(), degrees.abs()))
    }
}

impl Transform for RandomRotation {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage, DatasetError> {
        let angle = random::uniform_scalar(self.degrees.0, self.degrees.1);
        Ok(rotate(image, angle))
    }

    fn name(&self) -> &str {
        "RandomRotation"
    }
}

/// Crops a random area/aspect window and resizes it to `size x size`.
pub struct RandomResizedCrop {
    size: u32,
    scale: (f32, f32),
    ratio: (f32, f32),
}

impl RandomResizedCrop {
    const MAX_ATTEMPTS: usize = 10;

    pub fn new(size: u32, scale: (f32, f32)) -> Result<Self, DatasetError> {
        Self::with_ratio(size, scale, (3.0 / 4.0, 4.0 / 3.0))
    }

    pub fn with_ratio(size: u32, scale: (f32, f32), ratio: (f32, f32)) -> Result<Self, DatasetError> {
        if size == 0 {
            return Err(DatasetError::InvalidParameter("Crop size must be positive".into()));
        }
        let finite = [scale.0, scale.1, ratio.0, ratio.1]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(DatasetError::InvalidParameter(
                "Crop scale and aspect ratio must be finite".into(),
            ));
        }
        if scale.0 <= 0.0 || scale.0 > scale.1 || scale.1 > 1.0 {
            return Err(DatasetError::InvalidParameter(format!(
                "Invalid crop scale ({}, {})",
                scale.0, scale.1
            )));
        }
        if ratio.0 <= 0.0 || ratio.0 > ratio.1 {
            return Err(DatasetError::InvalidParameter(format!(
                "Invalid crop aspect ratio ({}, {})",
                ratio.0, ratio.1
            )));
        }
        Ok(RandomResizedCrop { size, scale, ratio })
    }

    /// Picks `(left, top, width, height)` inside an `in_width x in_height` image.
    fn window(&self, in_width: u32, in_height: u32) -> (u32, u32, u32, u32) {
        let area = in_width as f32 * in_height as f32;
        let (log_low, log_high) = (self.ratio.0.ln(), self.ratio.1.ln());

        for _ in 0..Self::MAX_ATTEMPTS {
            let target_area = area * random::uniform_scalar(self.scale.0, self.scale.1);
            let aspect = random::uniform_scalar(log_low, log_high).exp();

            let width = (target_area * aspect).sqrt().round() as u32;
            let height = (target_area / aspect).sqrt().round() as u32;

            if width > 0 && width <= in_width && height > 0 && height <= in_height {
                let left = random::index_in(0, (in_width - width) as usize) as u32;
                let top = random::index_in(0, (in_height - height) as usize) as u32;
                return (left, top, width, height);
            }
        }

        // Fall back to a center crop clamped to the allowed aspect ratios.
        let in_ratio = in_width as f32 / in_height as f32;
        let (width, height) = if in_ratio < self.ratio.0 {
            (in_width, (in_width as f32 / self.ratio.0).round() as u32)
        } else if in_ratio > self.ratio.1 {
            ((in_height as f32 * self.ratio.1).round() as u32, in_height)
        } else {
            (in_width, in_height)
        };
        let (width, height) = (width.clamp(1, in_width), height.clamp(1, in_height));
        ((in_width - width) / 2, (in_height - height) / 2, width, height)
    }
}

impl Transform for RandomResizedCrop {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage, DatasetError> {
        let (in_width, in_height) = image.dimensions();
        if in_width == 0 || in_height == 0 {
            return Err(DatasetError::InvalidShape("Cannot crop an empty image".into()));
        }

        let (left, top, width, height) = self.window(in_width, in_height);
        let window = imageops::crop_imm(image, left, top, width, height).to_image();
        Ok(imageops::resize(
            &window,
            self.size,
            self.size,
            FilterType::Triangle,
        ))
    }

    fn name(&self) -> &str {
        "RandomResizedCrop"
    }
}
