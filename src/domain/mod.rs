// Domain layer - sensor data model and the normalization pipeline
pub mod axis;
pub mod boundaries;
pub mod downsample;
pub mod error;
pub mod reading;
pub mod sanitizer;
pub mod settings;
pub mod status;
pub mod summary;
pub mod window;
