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

use crate::core::error::DatasetError;

/// Dense row-major f32 tensor. Images are stored channel-first.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Vec<usize>,
}

impl Tensor {
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, DatasetError> {
        let size: usize = shape.iter().product();
        if data.len() != size {
            return Err(DatasetError::InvalidShape(format!(
                "Data size {} does not match shape {:?}",
                data.len(),
                shape
            )));
        }

        Ok(Tensor { data, shape })
    }

    // Data access methods
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    // Calculate stride for the current shape
    pub fn stride(&self) -> Vec<usize> {
        let mut stride = Vec::with_capacity(self.shape.len());
        let mut current_stride = 1;
        for &dim in self.shape.iter().rev() {
            stride.push(current_stride);
            current_stride *= dim;
        }
        stride.reverse();
        stride
    }

    pub fn zeros(shape: &[usize]) -> Self {
        let size = shape.iter().product();
        Tensor {
            data: vec![0.0; size],
            shape: shape.to_vec(),
        }
    }

    pub fn reshape(&self, new_shape: &[usize]) -> Result<Tensor, DatasetError> {
        let new_size: usize = new_shape.iter().product();
        if new_size != self.data.len() {
            return Err(DatasetError::InvalidShape(format!(
                "Cannot reshape tensor of size {} to shape {:?}",
                self.data.len(),
                new_shape
            )));
        }

        Ok(Tensor {
            data: self.data.clone(),
            shape: new_shape.to_vec(),
        })
    }

    /// Splits a `[B, C, H, W]` shape, rejecting any other rank.
    pub fn dims4(&self) -> Result<(usize, usize, usize, usize), DatasetError> {
        match self.shape[..] {
            [batch_size, channels, height, width] => Ok((batch_size, channels, height, width)),
            _ => Err(DatasetError::InvalidShape(format!(
                "Expected 4D tensor, got shape {:?}",
                self.shape
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_row_major() {
        let tensor = Tensor::zeros(&[1, 3, 4, 5]);
        assert_eq!(tensor.stride(), vec![60, 20, 5, 1]);
        assert_eq!(tensor.numel(), 60);
    }

    #[test]
    fn reshape_checks_size() {
        let tensor = Tensor::new((0..12).map(|v| v as f32).collect(), vec![1, 3, 2, 2]).unwrap();
        let flat = tensor.reshape(&[3, 2, 2]).unwrap();
        assert_eq!(flat.shape(), &[3, 2, 2]);
        assert_eq!(flat.data(), tensor.data());

        assert!(matches!(
            tensor.reshape(&[5, 5]),
            Err(DatasetError::InvalidShape(_))
        ));
    }

    #[test]
    fn new_rejects_mismatched_data() {
        assert!(matches!(
            Tensor::new(vec![0.0; 5], vec![2, 3]),
            Err(DatasetError::InvalidShape(_))
        ));
        assert_eq!(Tensor::new(vec![0.0; 6], vec![2, 3]).unwrap().shape(), &[2, 3]);
    }

    #[test]
    fn dims4_rejects_other_ranks() {
        assert_eq!(Tensor::zeros(&[2, 3, 4, 5]).dims4().unwrap(), (2, 3, 4, 5));
        assert!(Tensor::zeros(&[3, 4, 5]).dims4().is_err());
    }
}
