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

use crate::data::balanced::DEFAULT_RECORDS;
use crate::data::candidate::Phase;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Configuration {
    // Dataset layout
    pub data: DataConfig,

    // Preprocessing
    pub transform: TransformConfig,

    // Balanced sampling
    pub sampling: SamplingConfig,

    // System configuration
    pub system: SystemConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub root: String,
    pub phases: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TransformConfig {
    pub resize: usize,
    pub mean: [f32; 3],
    pub std: [f32; 3],
    pub crop_scale: (f32, f32),
    pub flip_probability: f32,
    pub rotation_degrees: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Negatives per positive; 0 disables balancing.
    pub ratio: usize,
    /// Epoch length of a balanced dataset.
    pub records: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SystemConfig {
    pub seed: Option<u64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            root: "data/hymenoptera_data".to_string(),
            phases: vec!["train".to_string(), "val".to_string()],
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            resize: 224,
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
            crop_scale: (0.5, 1.0),
            flip_probability: 0.5,
            rotation_degrees: 15.0,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            ratio: 1,
            records: DEFAULT_RECORDS,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            data: DataConfig::default(),
            transform: TransformConfig::default(),
            sampling: SamplingConfig::default(),
            system: SystemConfig::default(),
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

impl Configuration {
    /// Loads YAML, or JSON when the file ends in `.json`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Configuration = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        if let Err(validation_error) = config.validate() {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                validation_error,
            )));
        }

        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        fs::write(path, content)?;
        Ok(())
    }

    pub fn phases(&self) -> Result<Vec<Phase>, String> {
        self.data
            .phases
            .iter()
            .map(|phase| phase.parse::<Phase>().map_err(|e| e.to_string()))
            .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.data.root.is_empty() {
            return Err("Data root cannot be empty".to_string());
        }

        if self.data.phases.is_empty() {
            return Err("At least one phase is required".to_string());
        }
        self.phases()?;

        let transform = &self.transform;
        if transform.resize == 0 || u32::try_from(transform.resize).is_err() {
            return Err(format!("Resize must be in 1..={}", u32::MAX));
        }

        if !transform.mean.iter().all(|m| m.is_finite()) {
            return Err("Means must be finite".to_string());
        }

        if !transform.std.iter().all(|&s| s.is_finite() && s > 0.0) {
            return Err("Standard deviations must be finite and positive".to_string());
        }

        // Written so that NaN fails every comparison.
        let (low, high) = transform.crop_scale;
        if !(low > 0.0 && low <= high && high <= 1.0) {
            return Err("Crop scale must satisfy 0 < low <= high <= 1".to_string());
        }

        if !(0.0..=1.0).contains(&transform.flip_probability) {
            return Err("Flip probability must be between 0 and 1".to_string());
        }

        if !(transform.rotation_degrees.is_finite() && transform.rotation_degrees >= 0.0) {
            return Err("Rotation degrees must be finite and non-negative".to_string());
        }

        if self.sampling.ratio.checked_add(1).is_none() {
            return Err(format!("Sampling ratio {} is too large", self.sampling.ratio));
        }

        if self.sampling.ratio > 0 && self.sampling.records == 0 {
            return Err("Balanced sampling needs at least one record per epoch".to_string());
        }

        Ok(())
    }

    pub fn merge(&mut self, other: &Configuration) {
        // Merge only non-default values from other configuration
        let defaults = Configuration::default();

        if other.data.root != defaults.data.root {
            self.data.root = other.data.root.clone();
        }
        if other.data.phases != defaults.data.phases {
            self.data.phases = other.data.phases.clone();
        }
        if other.transform != defaults.transform {
            self.transform = other.transform.clone();
        }
        if other.sampling.ratio != defaults.sampling.ratio {
            self.sampling.ratio = other.sampling.ratio;
        }
        if other.sampling.records != defaults.sampling.records {
            self.sampling.records = other.sampling.records;
        }
        if other.system.seed.is_some() {
            self.system.seed = other.system.seed;
        }
    }
}
