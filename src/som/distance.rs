//! Color-space distances between a query and every neuron of a map.

use crate::som::{Color, Som};

/// Writes the Euclidean RGB distance from `query` to each neuron into `out`.
///
/// Every neuron is visited; there is no spatial pruning. `out` must hold
/// exactly one slot per neuron.
#[inline]
pub fn distances(query: &Color, som: &Som, out: &mut [f32]) {
    debug_assert_eq!(out.len(), som.len(), "one distance slot per neuron");

    for (slot, neuron) in out.iter_mut().zip(som.neurons()) {
        *slot = neuron.distance(query);
    }
}

/// Index of the smallest value. Ties go to the lowest index.
///
/// Returns 0 for an empty slice or one holding only NaNs.
#[inline]
pub fn argmin(values: &[f32]) -> usize {
    let mut best_idx = 0;
    let mut best = f32::INFINITY;

    for (i, &v) in values.iter().enumerate() {
        if v < best {
            best = v;
            best_idx = i;
        }
    }

    best_idx
}
