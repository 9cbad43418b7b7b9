//! Fixed-timestep accumulator.
//!
//! The host measures wall-clock (or replayed) frame time and feeds it to
//! `begin_frame`. The simulation then consumes it in `fixed_dt` slices via
//! `should_step`. Incoming frame time goes through `sanitize_delta` first, so
//! NaN, negative and oversized deltas never reach the accumulator.

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_fixed_dt(1.0 / 60.0)
    }

    pub fn with_fixed_dt(fixed_dt: f64) -> Self {
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
        }
    }

    pub fn begin_frame(&mut self, real_dt: f64) {
        self.real_dt = sanitize_delta(real_dt, self.max_accumulator);
        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a frame delta into `[0, max]`. NaN and negative values become zero.
pub fn sanitize_delta(dt: f64, max: f64) -> f64 {
    if dt.is_nan() || dt < 0.0 {
        log::warn!("Discarding invalid frame delta {dt}");
        return 0.0;
    }
    if dt > max {
        // Spiral-of-death cap
        log::warn!(
            "Frame took {:.1}ms, capping to {}ms",
            dt * 1000.0,
            max * 1000.0
        );
        return max;
    }
    dt
}
