//! Time management utilities

use std::time::Instant;

use crate::physics::PhysicsError;

/// Fixed-timestep accumulator
///
/// The host feeds real frame times in; the accumulator answers how many
/// fixed physics steps are due. The physics core itself only ever sees the
/// fixed step.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
    total_steps: u64,
}

impl FixedTimestep {
    /// Default cap on steps run for a single frame
    pub const DEFAULT_MAX_STEPS: u32 = 8;

    /// Create an accumulator for the given fixed step (seconds)
    pub fn new(step: f32) -> Result<Self, PhysicsError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(PhysicsError::InvalidTimestep(step));
        }
        Ok(Self {
            step,
            accumulator: 0.0,
            max_steps_per_frame: Self::DEFAULT_MAX_STEPS,
            total_steps: 0,
        })
    }

    /// Limit how many steps a single long frame may trigger
    ///
    /// Time beyond the cap is dropped rather than carried over, so a stalled
    /// host does not spiral into ever longer catch-up frames.
    pub fn with_max_steps_per_frame(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    /// Add a frame's elapsed time and return how many fixed steps are due
    pub fn accumulate(&mut self, frame_time: f32) -> u32 {
        if frame_time.is_finite() && frame_time > 0.0 {
            self.accumulator += frame_time;
        }

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }

        if steps == self.max_steps_per_frame && self.accumulator >= self.step {
            log::debug!(
                "FixedTimestep: dropping {:.4}s of backlog after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.step;
        }

        self.total_steps += u64::from(steps);
        steps
    }

    /// The fixed step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Fraction of a step currently accumulated, in `[0, 1)`
    ///
    /// Hosts use this to interpolate rendered transforms between steps.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Total number of steps handed out so far
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

/// Wall-clock timer for profiling a single step
#[derive(Debug, Clone, Copy)]
pub struct StepTimer(Instant);

impl StepTimer {
    /// Start timing now
    pub fn start() -> Self {
        Self(Instant::now())
    }

    /// Milliseconds since [`StepTimer::start`]
    pub fn elapsed_millis(&self) -> f32 {
        self.0.elapsed().as_secs_f32() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_non_positive_step() {
        assert!(FixedTimestep::new(0.0).is_err());
        assert!(FixedTimestep::new(-0.02).is_err());
        assert!(FixedTimestep::new(f32::NAN).is_err());
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedTimestep::new(0.02).unwrap();
        assert_eq!(clock.accumulate(0.015), 0);
        assert_eq!(clock.accumulate(0.015), 1);
        assert_relative_eq!(clock.alpha(), 0.5, epsilon = 1e-4);
        assert_eq!(clock.total_steps(), 1);
    }

    #[test]
    fn test_long_frame_runs_several_steps() {
        let mut clock = FixedTimestep::new(0.02).unwrap();
        assert_eq!(clock.accumulate(0.061), 3);
    }

    #[test]
    fn test_backlog_is_capped() {
        let mut clock = FixedTimestep::new(0.02).unwrap().with_max_steps_per_frame(4);
        assert_eq!(clock.accumulate(1.0), 4);
        assert!(clock.alpha() < 1.0);
        assert_eq!(clock.accumulate(0.0), 0);
    }

    #[test]
    fn test_step_timer_is_monotonic() {
        let timer = StepTimer::start();
        let first = timer.elapsed_millis();
        assert!(first >= 0.0);
        assert!(timer.elapsed_millis() >= first);
    }
}
