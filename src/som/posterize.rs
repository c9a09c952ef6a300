//! Nearest-neuron remapping of pixels onto a trained palette.

use crate::error::{try_buffer, Result, SomError};
use crate::som::{Color, Som};
use rayon::prelude::*;

/// Remaps every pixel to the color of its Best Matching Unit.
///
/// Output channels are the winning neuron's weights scaled to `[0, 255]`
/// and truncated toward zero. The output has the same length and order
/// as `pixels`.
pub fn posterize(pixels: &[Color], som: &Som) -> Result<Vec<Color>> {
    check_inputs(pixels, som)?;

    let mut scratch = try_buffer("distance buffer", som.len(), 0.0f32)?;
    let mut out = Vec::new();
    out.try_reserve_exact(pixels.len())
        .map_err(|_| SomError::AllocationFailure {
            what: "posterized pixels",
            requested: pixels.len(),
        })?;

    for pixel in pixels {
        out.push(remap(pixel, som, &mut scratch));
    }

    Ok(out)
}

/// Same as [`posterize`], spread across the rayon thread pool.
pub fn posterize_parallel(pixels: &[Color], som: &Som) -> Result<Vec<Color>> {
    check_inputs(pixels, som)?;

    let mut out = Vec::new();
    out.try_reserve_exact(pixels.len())
        .map_err(|_| SomError::AllocationFailure {
            what: "posterized pixels",
            requested: pixels.len(),
        })?;

    // Each worker clones this buffer, so a map too large to scan fails here.
    let scratch = try_buffer("distance buffer", som.len(), 0.0f32)?;

    pixels
        .par_iter()
        .map_init(
            || scratch.clone(),
            |scratch, pixel| remap(pixel, som, scratch),
        )
        .collect_into_vec(&mut out);

    Ok(out)
}

/// Chooses between the sequential and parallel remapping passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posterizer {
    /// Use the rayon pool.
    pub parallel: bool,
}

impl Default for Posterizer {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl Posterizer {
    /// Creates a posterizer.
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Remaps `pixels` onto the palette of `som`.
    pub fn apply(&self, pixels: &[Color], som: &Som) -> Result<Vec<Color>> {
        if self.parallel {
            posterize_parallel(pixels, som)
        } else {
            posterize(pixels, som)
        }
    }
}

#[inline]
fn remap(pixel: &Color, som: &Som, scratch: &mut [f32]) -> Color {
    let bmu = som.find_bmu(pixel, scratch);
    som.neurons()[bmu].scaled()
}

fn check_inputs(pixels: &[Color], som: &Som) -> Result<()> {
    if pixels.is_empty() {
        return Err(SomError::InvalidArgument(
            "pixel collection is empty".to_string(),
        ));
    }
    if som.is_empty() {
        return Err(SomError::InvalidArgument("map has no neurons".to_string()));
    }
    Ok(())
}
