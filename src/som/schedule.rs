//! Learning-rate and neighborhood-radius decay over training progress.
//!
//! Both curves are driven by the fraction `t / T` of the epoch budget
//! already spent, so a run that converges early stops partway down them.

/// Learning rate at the first epoch.
pub const LEARNING_RATE_START: f32 = 0.75;

/// Learning rate reached at the end of the epoch budget.
pub const LEARNING_RATE_END: f32 = 0.10;

#[inline]
fn progress(epoch: usize, max_epochs: usize) -> f32 {
    epoch as f32 / max_epochs as f32
}

/// Linear decay from [`LEARNING_RATE_START`] at epoch 0 to
/// [`LEARNING_RATE_END`] at `max_epochs`.
#[inline]
pub fn learning_rate(epoch: usize, max_epochs: usize) -> f32 {
    let range = LEARNING_RATE_START - LEARNING_RATE_END;
    LEARNING_RATE_START - progress(epoch, max_epochs) * range
}

/// Initial neighborhood radius: half the larger grid side.
#[inline]
pub fn initial_radius(width: usize, height: usize) -> f32 {
    width.max(height) as f32 / 2.0
}

/// Quadratic decay from [`initial_radius`] at epoch 0 to zero at `max_epochs`.
#[inline]
pub fn radius(epoch: usize, max_epochs: usize, width: usize, height: usize) -> f32 {
    let step = progress(epoch, max_epochs);
    initial_radius(width, height) * (1.0 - step * step)
}
