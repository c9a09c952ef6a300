//! SOM training: online competitive learning on pixel colors.
//!
//! Each epoch samples one pixel, finds its Best Matching Unit, and pulls
//! every neuron inside the shrinking neighborhood toward that pixel. The
//! run stops after `max_epochs` epochs or as soon as the total weight
//! change of an epoch drops below the convergence threshold.

use crate::error::{try_buffer, Result, SomError};
use crate::som::neighborhood::neighborhood_mask;
use crate::som::schedule;
use crate::som::{Color, GridShape, RandomSource, Som};
use log::{debug, info};

/// Epoch interval between debug progress lines.
const LOG_INTERVAL: usize = 500;

/// Hyperparameters for a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    /// Maximum number of epochs. Default: 3000.
    pub max_epochs: usize,

    /// Stop once an epoch's aggregate weight change falls below this.
    /// Default: 0.001.
    pub threshold: f32,

    /// Clamp weights into [0, 1] after every update. Default: false.
    pub clamp_weights: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_epochs: 3000,
            threshold: 0.001,
            clamp_weights: false,
        }
    }
}

/// How a training run ended. Both outcomes are successful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    /// The aggregate weight change dropped below the threshold.
    Converged,
    /// The epoch budget ran out first.
    Exhausted,
}

/// Summary of a finished training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Number of epochs performed.
    pub epochs: usize,
    /// Aggregate absolute weight change of the last epoch.
    pub final_delta: f32,
    /// Terminal state.
    pub state: TrainingState,
}

/// SOM trainer with configurable hyperparameters.
#[derive(Debug, Clone, Default)]
pub struct SomTrainer {
    config: TrainerConfig,
}

impl SomTrainer {
    /// Creates a new trainer with the given configuration.
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// The trainer's configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Computes the learning rate at a given epoch.
    #[inline]
    pub fn learning_rate(&self, epoch: usize) -> f32 {
        schedule::learning_rate(epoch, self.config.max_epochs)
    }

    /// Computes the neighborhood radius at a given epoch.
    #[inline]
    pub fn radius(&self, epoch: usize, shape: GridShape) -> f32 {
        schedule::radius(epoch, self.config.max_epochs, shape.width, shape.height)
    }

    /// Trains a fresh map of `shape` on `pixels`.
    pub fn train<R: RandomSource + ?Sized>(
        &self,
        pixels: &[Color],
        shape: GridShape,
        rng: &mut R,
    ) -> Result<Som> {
        self.train_with_report(pixels, shape, rng, |_, _, _| {})
            .map(|(som, _)| som)
    }

    /// Trains a fresh map and reports how the run ended.
    ///
    /// `on_epoch(epoch, max_epochs, delta)` is called after every epoch
    /// with the 1-based epoch number and that epoch's aggregate change.
    pub fn train_with_report<R, F>(
        &self,
        pixels: &[Color],
        shape: GridShape,
        rng: &mut R,
        mut on_epoch: F,
    ) -> Result<(Som, TrainingReport)>
    where
        R: RandomSource + ?Sized,
        F: FnMut(usize, usize, f32),
    {
        self.validate(pixels)?;

        let max_epochs = self.config.max_epochs;
        let threshold = self.config.threshold;
        let num_neurons = shape.len();

        // Scratch space, reused across epochs.
        let mut dists = try_buffer("distance buffer", num_neurons, 0.0f32)?;
        let mut mask = try_buffer("neighborhood mask", num_neurons, 0.0f32)?;
        let mut deltas = try_buffer("delta buffer", num_neurons, [0.0f32; 3])?;

        let mut som = Som::new_random(shape, rng)?;

        info!(
            "Training SOM: {} pixels, {}x{} neurons, max {} epochs, threshold {}",
            pixels.len(),
            shape.width,
            shape.height,
            max_epochs,
            threshold
        );

        let mut delta = f32::INFINITY;
        let mut epoch = 0;

        while epoch < max_epochs && delta >= threshold {
            let sample = pixels[rng.sample_index(pixels.len())];

            let bmu_idx = som.find_bmu(&sample, &mut dists);
            let (bmu_x, bmu_y) = shape.coords(bmu_idx);

            let radius = self.radius(epoch, shape);
            let lr = self.learning_rate(epoch);
            neighborhood_mask(&mut mask, som.neurons(), bmu_x, bmu_y, radius);

            for ((d, neuron), &influence) in deltas.iter_mut().zip(som.neurons()).zip(&mask) {
                let scale = lr * influence;
                *d = std::array::from_fn(|c| scale * (sample[c] - neuron.weights[c]));
            }

            delta = 0.0;
            for (i, d) in deltas.iter().enumerate() {
                som.apply_delta(i, d, self.config.clamp_weights);
                delta += d[0].abs() + d[1].abs() + d[2].abs();
            }

            epoch += 1;
            on_epoch(epoch, max_epochs, delta);

            if epoch % LOG_INTERVAL == 0 {
                debug!(
                    "Epoch {}/{}: lr={:.4}, radius={:.3}, delta={:.6}",
                    epoch, max_epochs, lr, radius, delta
                );
            }
        }

        let state = if delta < threshold {
            TrainingState::Converged
        } else {
            TrainingState::Exhausted
        };

        info!(
            "SOM training finished after {} epochs ({:?}, delta={:.6})",
            epoch, state, delta
        );

        let report = TrainingReport {
            epochs: epoch,
            final_delta: delta,
            state,
        };
        Ok((som, report))
    }

    fn validate(&self, pixels: &[Color]) -> Result<()> {
        if pixels.is_empty() {
            return Err(SomError::InvalidArgument(
                "pixel collection is empty".to_string(),
            ));
        }
        if self.config.max_epochs == 0 {
            return Err(SomError::InvalidArgument(
                "epoch count must be positive".to_string(),
            ));
        }
        let threshold = self.config.threshold;
        if threshold.is_nan() || threshold < 0.0 {
            return Err(SomError::InvalidArgument(format!(
                "convergence threshold must be a non-negative number, got {threshold}"
            )));
        }
        Ok(())
    }
}

/// Trains a square map of `nb_neurons` neurons on `pixels`.
///
/// `nb_neurons` must be a perfect square.
pub fn train<R: RandomSource + ?Sized>(
    pixels: &[Color],
    nb_neurons: usize,
    max_epochs: usize,
    threshold: f32,
    rng: &mut R,
) -> Result<Som> {
    let shape = GridShape::from_neuron_count(nb_neurons)?;
    let trainer = SomTrainer::new(TrainerConfig {
        max_epochs,
        threshold,
        clamp_weights: false,
    });
    trainer.train(pixels, shape, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::som::ChaChaSource;

    fn test_pixels() -> Vec<Color> {
        vec![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
        ]
    }

    /// Replays a fixed script of samples and indices.
    struct ScriptedSource {
        samples: Vec<f32>,
        indices: Vec<usize>,
        calls: usize,
    }

    impl RandomSource for ScriptedSource {
        fn sample(&mut self) -> f32 {
            let v = self.samples[self.calls % self.samples.len()];
            self.calls += 1;
            v
        }

        fn sample_index(&mut self, max: usize) -> usize {
            let v = self.indices[self.calls % self.indices.len()] % max;
            self.calls += 1;
            v
        }
    }

    #[test]
    fn test_learning_rate_decay() {
        let trainer = SomTrainer::new(TrainerConfig {
            max_epochs: 100,
            ..Default::default()
        });

        assert!((trainer.learning_rate(0) - 0.75).abs() < 1e-6);
        assert!((trainer.learning_rate(100) - 0.10).abs() < 1e-6);
        assert!(trainer.learning_rate(99) < trainer.learning_rate(0));
    }

    #[test]
    fn test_radius_decay() {
        let trainer = SomTrainer::new(TrainerConfig {
            max_epochs: 100,
            ..Default::default()
        });
        let shape = GridShape::new(8, 8).unwrap();

        assert!((trainer.radius(0, shape) - 4.0).abs() < 1e-6);
        assert_eq!(trainer.radius(100, shape), 0.0);
    }

    #[test]
    fn test_runs_exactly_max_epochs_with_zero_threshold() {
        let trainer = SomTrainer::new(TrainerConfig {
            max_epochs: 137,
            threshold: 0.0,
            clamp_weights: false,
        });
        let shape = GridShape::new(3, 3).unwrap();
        let mut rng = ChaChaSource::seeded(42);

        let mut calls = 0;
        let (_, report) = trainer
            .train_with_report(&test_pixels(), shape, &mut rng, |epoch, max, _| {
                calls += 1;
                assert_eq!(epoch, calls);
                assert_eq!(max, 137);
            })
            .unwrap();

        assert_eq!(report.epochs, 137);
        assert_eq!(calls, 137);
        assert_eq!(report.state, TrainingState::Exhausted);
    }

    #[test]
    fn test_converges_on_single_color() {
        // One pixel, one neuron: each epoch moves the neuron a fixed
        // fraction of the remaining gap, so the change shrinks geometrically.
        let trainer = SomTrainer::new(TrainerConfig {
            max_epochs: 10_000,
            threshold: 1e-3,
            clamp_weights: false,
        });
        let shape = GridShape::new(1, 1).unwrap();
        let mut rng = ChaChaSource::seeded(9);

        let (som, report) = trainer
            .train_with_report(&[[0.25, 0.5, 0.75]], shape, &mut rng, |_, _, _| {})
            .unwrap();

        assert_eq!(report.state, TrainingState::Converged);
        assert!(report.epochs < 10_000);
        assert!(report.final_delta < 1e-3);
        let w = som.get(0).unwrap().weights;
        assert!((w[0] - 0.25).abs() < 0.01);
        assert!((w[1] - 0.5).abs() < 0.01);
        assert!((w[2] - 0.75).abs() < 0.01);
    }

    #[test]
    fn test_first_epoch_update() {
        // Neuron weights come from the scripted samples, the pixel pick from
        // the scripted indices. With one epoch: lr = 0.75, radius = 1 (2x2 map).
        let mut rng = ScriptedSource {
            samples: vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            indices: vec![0; 13],
            calls: 0,
        };
        let trainer = SomTrainer::new(TrainerConfig {
            max_epochs: 1,
            threshold: 0.0,
            clamp_weights: false,
        });
        let shape = GridShape::new(2, 2).unwrap();

        let (som, report) = trainer
            .train_with_report(&[[1.0, 1.0, 1.0]], shape, &mut rng, |_, _, _| {})
            .unwrap();

        // All neurons tie at distance sqrt(3); neuron 0 wins.
        // Neighbors at distance 1 get mask 0, the diagonal is outside.
        let w = som.weights();
        assert_eq!(w[0], [0.75, 0.75, 0.75]);
        assert_eq!(w[1], [0.0; 3]);
        assert_eq!(w[2], [0.0; 3]);
        assert_eq!(w[3], [0.0; 3]);
        assert!((report.final_delta - 2.25).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_weights_stay_in_range() {
        let trainer = SomTrainer::new(TrainerConfig {
            max_epochs: 500,
            threshold: 0.0,
            clamp_weights: true,
        });
        let shape = GridShape::new(4, 4).unwrap();
        let mut rng = ChaChaSource::seeded(5);

        let som = trainer.train(&test_pixels(), shape, &mut rng).unwrap();
        for neuron in som.neurons() {
            assert!(neuron.weights.iter().all(|w| (0.0..=1.0).contains(w)));
        }
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let trainer = SomTrainer::default();
        let shape = GridShape::new(2, 2).unwrap();

        let a = trainer
            .train(&test_pixels(), shape, &mut ChaChaSource::seeded(11))
            .unwrap();
        let b = trainer
            .train(&test_pixels(), shape, &mut ChaChaSource::seeded(11))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_arguments() {
        let mut rng = ChaChaSource::seeded(1);

        assert!(matches!(
            train(&[], 4, 10, 0.001, &mut rng),
            Err(SomError::InvalidArgument(_))
        ));
        assert!(matches!(
            train(&test_pixels(), 0, 10, 0.001, &mut rng),
            Err(SomError::InvalidArgument(_))
        ));
        assert!(matches!(
            train(&test_pixels(), 5, 10, 0.001, &mut rng),
            Err(SomError::InvalidArgument(_))
        ));
        assert!(matches!(
            train(&test_pixels(), 4, 0, 0.001, &mut rng),
            Err(SomError::InvalidArgument(_))
        ));
        assert!(matches!(
            train(&test_pixels(), 4, 10, -1.0, &mut rng),
            Err(SomError::InvalidArgument(_))
        ));
        assert!(matches!(
            train(&test_pixels(), 4, 10, f32::NAN, &mut rng),
            Err(SomError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_validation_happens_before_sampling() {
        let mut rng = ScriptedSource {
            samples: vec![0.5],
            indices: vec![0],
            calls: 0,
        };
        let trainer = SomTrainer::default();
        let shape = GridShape::new(2, 2).unwrap();

        assert!(trainer.train(&[], shape, &mut rng).is_err());
        assert_eq!(rng.calls, 0);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_oversized_grid_reports_allocation_failure() {
        let shape = GridShape::new(1 << 31, 1 << 31).unwrap();
        let mut rng = ChaChaSource::seeded(1);

        let err = SomTrainer::default()
            .train(&test_pixels(), shape, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            SomError::AllocationFailure { what: "distance buffer", requested }
                if requested == shape.len()
        ));
    }
}
