//=========================================================================
// Timing Helpers
//=========================================================================
//
// Frame-rate independent exponential smoothing.
//
//   alpha = 1 - exp(-smoothing * dt)
//   next  = current + alpha * (target - current)
//
// A smoothing of 0 never moves, larger values converge faster; 20 is a
// reasonable default.
//
//=========================================================================

/// Blend factor covering `delta_time` seconds at the given smoothing rate.
pub fn exp_smooth_alpha(smoothing: f64, delta_time: f64) -> f64 {
    1.0 - (-smoothing * delta_time).exp()
}

/// Moves `current` toward `target`, independent of frame rate.
pub fn exp_smooth(current: f64, target: f64, smoothing: f64, delta_time: f64) -> f64 {
    current + exp_smooth_alpha(smoothing, delta_time) * (target - current)
}

//=========================================================================
// Unit Tests
//=========================================================================
