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
use image::RgbImage;
use std::path::Path;

const CHANNELS: usize = 3;

/// Decoded RGB image, kept as interleaved bytes until converted.
pub struct ImageDecoder {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl ImageDecoder {
    /// Decodes an in-memory image. The format is sniffed from its magic bytes.
    pub fn new(bytes: &[u8]) -> Result<Self, DatasetError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_rgb(image.to_rgb8()))
    }

    /// Opens and decodes an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        Ok(Self::from_rgb(open_rgb(path)?))
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        ImageDecoder {
            width: width as usize,
            height: height as usize,
            data: image.into_raw(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Converts to a `[1, 3, H, W]` tensor scaled to [0, 1].
    pub fn to_tensor(&self) -> Result<Tensor, DatasetError> {
        let plane = self.width * self.height;
        if self.data.len() != plane * CHANNELS {
            return Err(DatasetError::ImageError(format!(
                "Expected {} bytes of RGB data, found {}",
                plane * CHANNELS,
                self.data.len()
            )));
        }

        let mut tensor_data = vec![0.0; plane * CHANNELS];
        for (pixel_idx, pixel) in self.data.chunks_exact(CHANNELS).enumerate() {
            for (c, &byte) in pixel.iter().enumerate() {
                tensor_data[c * plane + pixel_idx] = f32::from(byte) / 255.0;
            }
        }

        Tensor::new(tensor_data, vec![1, CHANNELS, self.height, self.width])
    }
}

/// Decodes `path` to 8-bit RGB, tagging errors with the file name.
pub fn open_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, DatasetError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| match DatasetError::from(e) {
        DatasetError::IOError(msg) => DatasetError::IOError(format!("{}: {}", path.display(), msg)),
        DatasetError::ImageError(msg) => {
            DatasetError::ImageError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;
    Ok(image.to_rgb8())
}

/// Reads `path` into a `[1, 3, H, W]` tensor.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Tensor, DatasetError> {
    ImageDecoder::open(path)?.to_tensor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn tensor_is_channel_first() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 51]));

        let tensor = ImageDecoder::from_rgb(img).to_tensor().unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 1, 2]);
        // R plane, G plane, B plane
        assert_eq!(tensor.data(), &[1.0, 0.0, 0.0, 1.0, 0.0, 0.2]);
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let result = ImageDecoder::new(b"definitely not an image");
        assert!(matches!(result, Err(DatasetError::ImageError(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_image(dir.path().join("nope.jpg"));
        assert!(matches!(result, Err(DatasetError::IOError(_))));
    }
}
