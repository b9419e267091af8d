//! Configuration: path resolution and persisted user settings

pub mod paths;
pub mod settings;

pub use paths::{TrackerPaths, DATA_DIR_ENV};
pub use settings::Settings;
