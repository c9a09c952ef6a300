//! # somposter - SOM Image Posterization
//!
//! somposter reduces the color palette of an image by training a
//! Self-Organizing Map (SOM) on its pixel colors, then remapping every
//! pixel to its nearest learned color.
//!
//! ## Overview
//!
//! The map is a square grid of neurons, each holding an RGB color. Training
//! repeatedly samples a pixel, finds the closest neuron (the Best Matching
//! Unit) and pulls it and its grid neighbors toward the sample. Learning
//! rate and neighborhood radius both shrink as training progresses. Once
//! trained, the neuron colors are the palette: a `level x level` map yields
//! at most `level^2` output colors.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use somposter::{posterize, train, ChaChaSource};
//!
//! // Normalized colors, one triple per pixel
//! let pixels = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 1.0]];
//!
//! // Train a 2x2 map
//! let mut rng = ChaChaSource::seeded(42);
//! let som = train(&pixels, 4, 3000, 0.001, &mut rng)?;
//!
//! // Remap; channels come back in [0, 255]
//! let out = posterize(&pixels, &som)?;
//! ```
//!
//! ## Architecture
//!
//! - [`som`] - the map, training loop and posterization pass
//! - [`image_io`] - loading and saving images as pixel collections
//! - [`config`] - serde-backed settings
//! - [`error`] - error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod image_io;
pub mod som;

// Re-export commonly used types
pub use config::{Config, OutputConfig, SomConfig};
pub use error::{Result, SomError};
pub use image_io::{LoadedImage, count_colors, default_output_path, load_pixels, save_pixels};
pub use som::{
    posterize, posterize_parallel, train, ChaChaSource, Color, GridShape, Neuron, Posterizer,
    RandomSource, Som, SomTrainer, TrainerConfig, TrainingReport, TrainingState,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default posterization level (map side length).
pub const DEFAULT_LEVEL: usize = 2;

/// Default neuron count (level^2).
pub const DEFAULT_NEURONS: usize = DEFAULT_LEVEL * DEFAULT_LEVEL;
