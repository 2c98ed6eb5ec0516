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

use crate::core::random;
use crate::data::balanced::BalancedDataset;
use crate::data::candidate::{FileList, Phase};
use crate::data::dataset::ImageDataset;
use crate::data::image_transform::ImageTransform;
use log::info;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

pub mod core;
pub mod data;
pub mod utilities;

pub use crate::core::error::DatasetError;
pub use crate::core::tensor::Tensor;
pub use crate::data::candidate::{make_path_list, CandidateRecord, Label};
pub use crate::data::dataset::Dataset;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PIPELINE_NAME: &str = "Bellande Hymenoptera Dataset";

/// Configured entry point: scans the image tree and builds datasets.
pub struct DataPipeline {
    config: utilities::config::Configuration,
    initialized: bool,
}

impl DataPipeline {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Ok(Self::from_configuration(
            utilities::config::Configuration::default(),
        ))
    }

    pub fn with_config<P: AsRef<Path>>(config_path: P) -> Result<Self, Box<dyn Error>> {
        let config = utilities::config::Configuration::from_file(config_path)?;
        Ok(Self::from_configuration(config))
    }

    pub fn from_configuration(config: utilities::config::Configuration) -> Self {
        DataPipeline {
            config,
            initialized: false,
        }
    }

    pub fn initialize(&mut self) -> Result<(), Box<dyn Error>> {
        if self.initialized {
            return Ok(());
        }

        self.config.validate().map_err(DatasetError::InvalidConfiguration)?;

        // Set random seed if specified
        if let Some(seed) = self.config.system.seed {
            random::set_seed(seed);
        }

        info!(
            "{} v{} initialized for {}",
            PIPELINE_NAME, VERSION, self.config.data.root
        );
        self.initialized = true;
        Ok(())
    }

    pub fn config(&self) -> &utilities::config::Configuration {
        &self.config
    }

    pub fn file_list(&self) -> Result<FileList, DatasetError> {
        let phases = self
            .config
            .phases()
            .map_err(DatasetError::InvalidConfiguration)?;
        FileList::scan(&self.config.data.root, &phases)
    }

    pub fn transform(&self) -> Result<Arc<ImageTransform>, DatasetError> {
        Ok(Arc::new(ImageTransform::from_config(&self.config.transform)?))
    }

    pub fn dataset(&self, phase: Phase) -> Result<ImageDataset, DatasetError> {
        Ok(ImageDataset::new(
            &self.file_list()?,
            Some(self.transform()?),
            phase,
        ))
    }

    pub fn balanced_dataset(&self, phase: Phase) -> Result<BalancedDataset, DatasetError> {
        Ok(BalancedDataset::new(
            &self.file_list()?,
            self.config.sampling.ratio,
            Some(self.transform()?),
            phase,
            self.config.sampling.records,
        ))
    }

    pub fn get_version() -> &'static str {
        VERSION
    }

    pub fn get_name() -> &'static str {
        PIPELINE_NAME
    }
}
