pub mod augmentation;
pub mod balanced;
pub mod candidate;
pub mod dataset;
pub mod image_decoder;
pub mod image_transform;
pub mod preprocessing;
