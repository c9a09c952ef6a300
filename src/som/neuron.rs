//! Neuron representation for the color Self-Organizing Map.

use crate::som::RandomSource;

/// An RGB color triple, one float per channel, nominally in `[0, 1]`.
pub type Color = [f32; 3];

/// A neuron in the Self-Organizing Map.
///
/// Each neuron has a position on the 2D grid and a weight vector,
/// which for posterization is a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neuron {
    /// Column position on the grid.
    pub x: usize,
    /// Row position on the grid.
    pub y: usize,
    /// The learned color.
    pub weights: Color,
}

impl Neuron {
    /// Creates a new neuron with every channel drawn from `rng`.
    pub fn new_random<R: RandomSource + ?Sized>(x: usize, y: usize, rng: &mut R) -> Self {
        let r = rng.sample();
        let g = rng.sample();
        let b = rng.sample();
        Self {
            x,
            y,
            weights: [r, g, b],
        }
    }

    /// Creates a new neuron with the given weights.
    pub fn new_with_weights(x: usize, y: usize, weights: Color) -> Self {
        Self { x, y, weights }
    }

    /// Euclidean distance in RGB space between this neuron and `query`.
    #[inline]
    pub fn distance(&self, query: &Color) -> f32 {
        self.distance_squared(query).sqrt()
    }

    /// Squared Euclidean distance (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, query: &Color) -> f32 {
        let dr = self.weights[0] - query[0];
        let dg = self.weights[1] - query[1];
        let db = self.weights[2] - query[2];
        dr * dr + dg * dg + db * db
    }

    /// Euclidean distance on the grid to the cell `(x, y)`.
    #[inline]
    pub fn grid_distance(&self, x: usize, y: usize) -> f32 {
        let dx = self.x as f32 - x as f32;
        let dy = self.y as f32 - y as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Adds `delta` to the weights, optionally clamping each channel into `[0, 1]`.
    #[inline]
    pub fn apply_delta(&mut self, delta: &Color, clamp: bool) {
        for (w, d) in self.weights.iter_mut().zip(delta.iter()) {
            *w += d;
            if clamp {
                *w = w.clamp(0.0, 1.0);
            }
        }
    }

    /// The weights scaled to `[0, 255]`, truncated toward zero.
    ///
    /// Values stay in float form; weights outside `[0, 1]` produce values
    /// outside `[0, 255]`.
    #[inline]
    pub fn scaled(&self) -> Color {
        self.weights.map(|w| (w * 255.0).trunc())
    }

    /// The weights as an 8-bit color (truncated, then saturated).
    #[inline]
    pub fn quantized(&self) -> [u8; 3] {
        // Float-to-int `as` casts saturate, and NaN becomes 0.
        self.scaled().map(|c| c as u8)
    }
}
