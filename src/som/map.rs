//! Self-Organizing Map of color neurons.

use crate::error::{Result, SomError};
use crate::som::distance;
use crate::som::{Color, Neuron, RandomSource};

/// Dimensions of the neuron grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl GridShape {
    /// Creates a grid of explicit dimensions. Both must be at least 1.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SomError::InvalidArgument(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if width.checked_mul(height).is_none() {
            return Err(SomError::InvalidArgument(format!(
                "grid {width}x{height} is too large"
            )));
        }
        Ok(Self { width, height })
    }

    /// Creates a square grid holding exactly `neurons` neurons.
    ///
    /// Fails unless `neurons` is a positive perfect square; the grid is
    /// never silently truncated.
    pub fn from_neuron_count(neurons: usize) -> Result<Self> {
        if neurons == 0 {
            return Err(SomError::InvalidArgument(
                "neuron count must be positive".to_string(),
            ));
        }

        let side = integer_sqrt(neurons);
        if side * side != neurons {
            return Err(SomError::InvalidArgument(format!(
                "neuron count {neurons} is not a perfect square (nearest grids: {}x{} or {}x{})",
                side,
                side,
                side + 1,
                side + 1
            )));
        }

        Ok(Self {
            width: side,
            height: side,
        })
    }

    /// Total number of neurons.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false: a valid grid has at least one neuron.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts a 1D index to `(x, y)` grid coordinates.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Converts `(x, y)` grid coordinates to a 1D index.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut side = (n as f64).sqrt() as usize;
    // Correct float rounding for large inputs.
    while side.saturating_mul(side) > n {
        side -= 1;
    }
    while (side + 1).saturating_mul(side + 1) <= n {
        side += 1;
    }
    side
}

/// A Self-Organizing Map whose neurons learn a color palette.
///
/// Neurons are stored in row-major order; neuron `i` sits at
/// `shape.coords(i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Som {
    shape: GridShape,
    neurons: Vec<Neuron>,
}

impl Som {
    /// Creates a new SOM with every weight channel drawn from `rng`.
    pub fn new_random<R: RandomSource + ?Sized>(shape: GridShape, rng: &mut R) -> Result<Self> {
        let total = shape.len();
        let mut neurons = Vec::new();
        neurons
            .try_reserve_exact(total)
            .map_err(|_| SomError::AllocationFailure {
                what: "map neurons",
                requested: total,
            })?;

        for i in 0..total {
            let (x, y) = shape.coords(i);
            neurons.push(Neuron::new_random(x, y, rng));
        }

        Ok(Self { shape, neurons })
    }

    /// Creates a SOM from explicit weights in row-major order.
    pub fn from_weights(shape: GridShape, weights: Vec<Color>) -> Result<Self> {
        if weights.len() != shape.len() {
            return Err(SomError::InvalidArgument(format!(
                "{} weights given for a {}x{} grid",
                weights.len(),
                shape.width,
                shape.height
            )));
        }

        let neurons = weights
            .into_iter()
            .enumerate()
            .map(|(i, w)| {
                let (x, y) = shape.coords(i);
                Neuron::new_with_weights(x, y, w)
            })
            .collect();

        Ok(Self { shape, neurons })
    }

    /// The grid dimensions.
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Returns the total number of neurons.
    #[inline]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Returns true if the map has no neurons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// All neurons in row-major order.
    #[inline]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Gets a neuron by its 1D index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Neuron> {
        self.neurons.get(index)
    }

    /// The weights of every neuron, in row-major order.
    pub fn weights(&self) -> Vec<Color> {
        self.neurons.iter().map(|n| n.weights).collect()
    }

    /// Adds `delta` to the weights of neuron `index`.
    ///
    /// Weights are left unclamped unless `clamp` is set.
    /// Out-of-range indices are ignored.
    #[inline]
    pub fn apply_delta(&mut self, index: usize, delta: &Color, clamp: bool) {
        if let Some(neuron) = self.neurons.get_mut(index) {
            neuron.apply_delta(delta, clamp);
        }
    }

    /// Finds the Best Matching Unit (BMU) for `query`.
    ///
    /// `scratch` receives one distance per neuron and is reused across
    /// calls by the trainer and posterizer. Ties go to the lowest index.
    #[inline]
    pub fn find_bmu(&self, query: &Color, scratch: &mut [f32]) -> usize {
        distance::distances(query, self, scratch);
        distance::argmin(scratch)
    }

    /// The learned palette as 8-bit colors, one per neuron.
    pub fn palette(&self) -> Vec<[u8; 3]> {
        self.neurons.iter().map(Neuron::quantized).collect()
    }

    /// Number of distinct colors in [`Som::palette`].
    pub fn distinct_colors(&self) -> usize {
        let mut palette = self.palette();
        palette.sort_unstable();
        palette.dedup();
        palette.len()
    }
}
