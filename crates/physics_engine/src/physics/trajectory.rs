//! Ballistic launch helper
//!
//! Closed-form projectile motion in the XY plane, used by hosts to give a
//! spawned body its launch velocity or to preview its arc.

use crate::foundation::math::Vec3;

/// Launch described by elevation angle and speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    /// Elevation above +X toward +Y, in degrees
    pub angle_deg: f32,
    /// Launch speed
    pub speed: f32,
}

impl Trajectory {
    /// Create a launch
    pub fn new(angle_deg: f32, speed: f32) -> Self {
        Self { angle_deg, speed }
    }

    /// Velocity at launch
    pub fn initial_velocity(&self) -> Vec3 {
        let (sin, cos) = self.angle_deg.to_radians().sin_cos();
        Vec3::new(cos * self.speed, sin * self.speed, 0.0)
    }

    /// Offset from the launch point after `t` seconds under `gravity`
    pub fn position_at(&self, t: f32, gravity: Vec3) -> Vec3 {
        self.initial_velocity() * t + gravity * (0.5 * t * t)
    }

    /// Time to return to launch height, if the shot rises at all
    pub fn flight_time(&self, gravity: Vec3) -> Option<f32> {
        let rise = self.initial_velocity().y;
        (rise > 0.0 && gravity.y < 0.0).then(|| 2.0 * rise / -gravity.y)
    }

    /// `samples` evenly spaced offsets over `lifetime` seconds, both ends included
    pub fn arc(&self, samples: usize, lifetime: f32, gravity: Vec3) -> Vec<Vec3> {
        match samples {
            0 => Vec::new(),
            1 => vec![Vec3::zeros()],
            _ => {
                let dt = lifetime / (samples - 1) as f32;
                (0..samples).map(|i| self.position_at(i as f32 * dt, gravity)).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

    #[test]
    fn test_initial_velocity_components() {
        let shot = Trajectory::new(30.0, 10.0);
        assert_relative_eq!(shot.initial_velocity(), Vec3::new(8.660_254, 5.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_lands_at_flight_time() {
        let shot = Trajectory::new(45.0, 10.0);
        let gravity = Vec3::from(GRAVITY);
        let t = shot.flight_time(gravity).unwrap();
        let landing = shot.position_at(t, gravity);
        assert_relative_eq!(landing.y, 0.0, epsilon = 1e-4);
        // Range of a 45 degree shot is v^2 / g
        assert_relative_eq!(landing.x, 100.0 / 9.81, epsilon = 1e-3);
    }

    #[test]
    fn test_flat_shot_never_rises() {
        assert!(Trajectory::new(0.0, 5.0).flight_time(Vec3::from(GRAVITY)).is_none());
    }

    #[test]
    fn test_arc_sampling() {
        let shot = Trajectory::new(60.0, 12.0);
        let gravity = Vec3::from(GRAVITY);
        let arc = shot.arc(5, 2.0, gravity);
        assert_eq!(arc.len(), 5);
        assert_eq!(arc[0], Vec3::zeros());
        assert_relative_eq!(arc[4], shot.position_at(2.0, gravity), epsilon = 1e-5);
        assert!(shot.arc(0, 1.0, gravity).is_empty());
    }
}
