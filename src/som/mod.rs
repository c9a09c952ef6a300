//! Self-Organizing Map (SOM) module for color palette learning.
//!
//! - **Training**: online competitive learning over sampled pixels (training.rs)
//! - **Posterization**: nearest-neuron remapping, sequential or parallel (posterize.rs)
//! - Building blocks: random sources, color distances, decay schedules
//!   and the neighborhood mask

pub mod distance;
mod map;
pub mod neighborhood;
mod neuron;
pub mod posterize;
pub mod random;
pub mod schedule;
pub mod training;

pub use map::{GridShape, Som};
pub use neuron::{Color, Neuron};
pub use posterize::{posterize, posterize_parallel, Posterizer};
pub use random::{ChaChaSource, RandomSource};
pub use training::{train, SomTrainer, TrainerConfig, TrainingReport, TrainingState};
