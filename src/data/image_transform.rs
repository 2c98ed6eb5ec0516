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
use crate::data::augmentation::{
    Compose, RandomHorizontalFlip, RandomResizedCrop, RandomRotation, Transform,
};
use crate::data::candidate::Phase;
use crate::data::image_decoder::ImageDecoder;
use crate::data::preprocessing::{CenterCrop, Normalize, Preprocessor, Resize};
use crate::utilities::config::TransformConfig;
use image::RgbImage;

/// Train and validation preprocessing, selected by phase at call time.
///
/// - train: random resized crop, horizontal flip, rotation
/// - val: resize, center crop
///
/// Both end with tensor conversion and normalization.
pub struct ImageTransform {
    train: Compose,
    val: Compose,
    normalize: Normalize,
}

impl ImageTransform {
    pub fn new(resize: usize, mean: [f32; 3], std: [f32; 3]) -> Result<Self, DatasetError> {
        Self::from_config(&TransformConfig {
            resize,
            mean,
            std,
            ..TransformConfig::default()
        })
    }

    pub fn from_config(config: &TransformConfig) -> Result<Self, DatasetError> {
        let size = u32::try_from(config.resize).map_err(|_| {
            DatasetError::InvalidParameter(format!("Resize {} is too large", config.resize))
        })?;

        let train = Compose::new(vec![
            Box::new(RandomResizedCrop::new(size, config.crop_scale)?),
            Box::new(RandomHorizontalFlip::new(config.flip_probability)?),
            Box::new(RandomRotation::symmetric(config.rotation_degrees)?),
        ]);

        let val = Compose::new(vec![
            Box::new(Resize::new(size)),
            Box::new(CenterCrop::new(size, size)),
        ]);

        let normalize = Normalize::new(config.mean.to_vec(), config.std.to_vec())?;

        Ok(ImageTransform {
            train,
            val,
            normalize,
        })
    }

    /// Geometric steps for `phase`, run before tensor conversion.
    pub fn pipeline(&self, phase: Phase) -> &Compose {
        match phase {
            Phase::Train => &self.train,
            Phase::Val => &self.val,
        }
    }

    /// Returns a normalized `[1, 3, resize, resize]` tensor.
    pub fn apply(&self, image: &RgbImage, phase: Phase) -> Result<Tensor, DatasetError> {
        let image = self.pipeline(phase).apply(image)?;
        let tensor = ImageDecoder::from_rgb(image).to_tensor()?;
        self.normalize.process(&tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random;
    use image::Rgb;

    const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
    const STD: [f32; 3] = [0.229, 0.224, 0.225];

    #[test]
    fn both_phases_produce_square_outputs() {
        random::set_seed(1);
        let transform = ImageTransform::new(16, MEAN, STD).unwrap();
        let image = RgbImage::from_pixel(40, 24, Rgb([128, 128, 128]));

        for phase in [Phase::Train, Phase::Val] {
            let out = transform.apply(&image, phase).unwrap();
            assert_eq!(out.shape(), &[1, 3, 16, 16], "phase {}", phase);
        }
    }

    #[test]
    fn val_pipeline_is_deterministic() {
        let transform = ImageTransform::new(8, MEAN, STD).unwrap();
        let image = RgbImage::from_fn(10, 12, |x, y| Rgb([(x * 20) as u8, (y * 15) as u8, 90]));

        let first = transform.apply(&image, Phase::Val).unwrap();
        let second = transform.apply(&image, Phase::Val).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn val_normalizes_a_flat_image() {
        let transform = ImageTransform::new(4, MEAN, STD).unwrap();
        let image = RgbImage::from_pixel(6, 6, Rgb([51, 102, 153]));
        let out = transform.apply(&image, Phase::Val).unwrap();

        let values = [0.2, 0.4, 0.6];
        for c in 0..3 {
            let expected = (values[c] - MEAN[c]) / STD[c];
            for &value in &out.data()[c * 16..(c + 1) * 16] {
                assert!((value - expected).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn val_keeps_the_middle_of_a_wide_image() {
        let transform = ImageTransform::new(4, [0.0; 3], [1.0; 3]).unwrap();
        // 16x8, red rises by 16 per column, green marks the two outer quarters.
        let image = RgbImage::from_fn(16, 8, |x, _| {
            let edge = if x < 4 || x >= 12 { 255 } else { 0 };
            Rgb([(x * 16) as u8, edge, 0])
        });
        assert_eq!(
            transform.pipeline(Phase::Val).apply(&image).unwrap().dimensions(),
            (4, 4)
        );

        let out = transform.apply(&image, Phase::Val).unwrap();
        assert_eq!(out.shape(), &[1, 3, 4, 4]);

        // 16x8 -> 8x4 keeps the 2:1 aspect, then columns 2..6 of 8 are kept,
        // which map to source columns 4.5, 6.5, 8.5 and 10.5.
        let reds = &out.data()[..4];
        for (column, &value) in [4.5f32, 6.5, 8.5, 10.5].iter().zip(reds) {
            assert!((value * 255.0 - column * 16.0).abs() <= 2.0, "{} vs {}", value, column);
        }
        // No trace of the green borders beyond the filter's reach.
        let greens = &out.data()[16..32];
        assert!(greens.iter().all(|&g| g < 0.5), "{:?}", greens);
    }

    #[test]
    fn pipelines_are_composed_in_order() {
        let transform = ImageTransform::new(8, MEAN, STD).unwrap();
        assert_eq!(
            transform.pipeline(Phase::Train).names(),
            vec!["RandomResizedCrop", "RandomHorizontalFlip", "RandomRotation"]
        );
        assert_eq!(
            transform.pipeline(Phase::Val).names(),
            vec!["Resize", "CenterCrop"]
        );
    }

    #[test]
    fn non_finite_rotation_is_rejected() {
        let config = TransformConfig {
            rotation_degrees: f32::NAN,
            ..TransformConfig::default()
        };
        assert!(matches!(
            ImageTransform::from_config(&config),
            Err(DatasetError::InvalidParameter(_))
        ));
    }
}
