//! Time-to-value mapping for counter animations.

use std::time::Duration;

/// Fraction of `duration` covered by `elapsed`, clamped to `0.0..=1.0`.
///
/// A zero duration is already complete.
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

/// Cubic ease-out: `1 - (1 - p)^3`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Displayed value for `target` at the given linear progress.
pub fn eased_value(target: u64, progress: f64) -> u64 {
    let value = (target as f64 * ease_out_cubic(progress)).floor();
    // f64 舍入可能略超過目標
    (value as u64).min(target)
}
