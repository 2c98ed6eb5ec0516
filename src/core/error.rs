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

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum DatasetError {
    IOError(String),
    ImageError(String),
    PatternError(String),
    IndexOutOfBounds,
    EmptyPartition(String),
    UnknownPhase(String),
    InvalidShape(String),
    InvalidOperation(String),
    InvalidParameter(String),
    InvalidConfiguration(String),
    SerializationError(String),
}

impl Error for DatasetError {}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DatasetError::IOError(err) => write!(f, "IO error: {}", err),
            DatasetError::ImageError(msg) => write!(f, "Image error: {}", msg),
            DatasetError::PatternError(msg) => write!(f, "Invalid glob pattern: {}", msg),
            DatasetError::IndexOutOfBounds => write!(f, "Index out of bounds"),
            DatasetError::EmptyPartition(msg) => write!(f, "Empty partition: {}", msg),
            DatasetError::UnknownPhase(phase) => write!(f, "Unknown phase: {}", phase),
            DatasetError::InvalidShape(msg) => write!(f, "Invalid tensor shape: {}", msg),
            DatasetError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
            DatasetError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            DatasetError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            DatasetError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(error: std::io::Error) -> Self {
        DatasetError::IOError(error.to_string())
    }
}

impl From<image::ImageError> for DatasetError {
    fn from(error: image::ImageError) -> Self {
        match error {
            image::ImageError::IoError(err) => DatasetError::IOError(err.to_string()),
            other => DatasetError::ImageError(other.to_string()),
        }
    }
}

impl From<glob::PatternError> for DatasetError {
    fn from(error: glob::PatternError) -> Self {
        DatasetError::PatternError(error.to_string())
    }
}

impl From<glob::GlobError> for DatasetError {
    fn from(error: glob::GlobError) -> Self {
        DatasetError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(error: serde_json::Error) -> Self {
        DatasetError::SerializationError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_message() {
        let err: DatasetError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing.jpg").into();
        assert!(matches!(err, DatasetError::IOError(_)));
        assert_eq!(err.to_string(), "IO error: missing.jpg");
    }

    #[test]
    fn empty_partition_display() {
        let err = DatasetError::EmptyPartition("no positive samples in train".into());
        assert_eq!(
            err.to_string(),
            "Empty partition: no positive samples in train"
        );
    }
}
