//! Per-epoch neighborhood influence around the winning neuron.

use crate::som::Neuron;

/// Fills `mask` with the influence of the neuron at `(center_x, center_y)`
/// on each of `neurons`, slot for slot.
///
/// A neuron at grid distance `d` gets `1 - d / radius` when `d <= radius`
/// and 0 otherwise. The center always gets 1. At `radius == 0` only the
/// center is influenced.
pub fn neighborhood_mask(
    mask: &mut [f32],
    neurons: &[Neuron],
    center_x: usize,
    center_y: usize,
    radius: f32,
) {
    debug_assert_eq!(mask.len(), neurons.len(), "one mask slot per neuron");

    for (slot, neuron) in mask.iter_mut().zip(neurons) {
        if neuron.x == center_x && neuron.y == center_y {
            *slot = 1.0;
            continue;
        }
        if radius <= 0.0 {
            *slot = 0.0;
            continue;
        }

        let d = neuron.grid_distance(center_x, center_y);
        *slot = if d <= radius { 1.0 - d / radius } else { 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::som::{GridShape, Som};

    fn mask_for(shape: GridShape, cx: usize, cy: usize, radius: f32) -> Vec<f32> {
        let som = Som::from_weights(shape, vec![[0.0; 3]; shape.len()]).unwrap();
        let mut mask = vec![f32::NAN; shape.len()];
        neighborhood_mask(&mut mask, som.neurons(), cx, cy, radius);
        mask
    }

    #[test]
    fn test_center_is_one() {
        let shape = GridShape::new(5, 5).unwrap();
        for radius in [0.0, 0.5, 1.0, 2.5, 10.0] {
            let mask = mask_for(shape, 2, 3, radius);
            assert_eq!(mask[shape.index(2, 3)], 1.0);
        }
    }

    #[test]
    fn test_zero_radius_isolates_center() {
        let shape = GridShape::new(3, 3).unwrap();
        let mask = mask_for(shape, 1, 1, 0.0);
        for (i, &m) in mask.iter().enumerate() {
            if i == shape.index(1, 1) {
                assert_eq!(m, 1.0);
            } else {
                assert_eq!(m, 0.0);
            }
        }
    }

    #[test]
    fn test_outside_radius_is_zero() {
        let shape = GridShape::new(6, 6).unwrap();
        let mask = mask_for(shape, 0, 0, 2.0);
        for (i, &m) in mask.iter().enumerate() {
            let (x, y) = shape.coords(i);
            let d = ((x * x + y * y) as f32).sqrt();
            if d > 2.0 {
                assert_eq!(m, 0.0, "neuron {i} at distance {d}");
            } else {
                assert!((m - (1.0 - d / 2.0)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_monotonic_in_grid_distance() {
        let shape = GridShape::new(9, 9).unwrap();
        let (cx, cy) = (4, 4);
        let mask = mask_for(shape, cx, cy, 3.5);

        let mut by_distance: Vec<(f32, f32)> = (0..shape.len())
            .map(|i| {
                let (x, y) = shape.coords(i);
                let dx = x as f32 - cx as f32;
                let dy = y as f32 - cy as f32;
                ((dx * dx + dy * dy).sqrt(), mask[i])
            })
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

        for pair in by_distance.windows(2) {
            assert!(pair[1].1 <= pair[0].1);
        }
    }

    #[test]
    fn test_row_major_layout() {
        let shape = GridShape::new(3, 2).unwrap();
        let mask = mask_for(shape, 2, 0, 2.0);
        // Row 0: (0,0) (1,0) (2,0); row 1: (0,1) (1,1) (2,1)
        let expected = [
            0.0,
            0.5,
            1.0,
            0.0,
            1.0 - std::f32::consts::SQRT_2 / 2.0,
            0.5,
        ];
        for (m, e) in mask.iter().zip(expected.iter()) {
            assert!((m - e).abs() < 1e-6);
        }
    }
}
