//! Force sources
//!
//! Bodies own a list of boxed [`ForceSource`]s. Each step the integrator asks
//! every source for a force given a read-only [`ForceContext`] and sums the
//! results. Sources never mutate the body directly.

use crate::foundation::math::{utils, Vec3};

/// Read-only inputs a force source may use
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceContext {
    /// Body mass
    pub mass: f32,
    /// Body velocity at the start of the step
    pub velocity: Vec3,
    /// World gravity acceleration
    pub gravity: Vec3,
    /// World air density
    pub air_density: f32,
    /// Area the body presents along its velocity (1 without a collider)
    pub cross_section: f32,
}

/// Something that pushes on a body every step
pub trait ForceSource: Send + Sync + std::fmt::Debug {
    /// Force to apply this step
    fn force(&self, ctx: &ForceContext) -> Vec3;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// Weight: `mass * scale * gravity`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Multiplier on the world gravity vector
    pub scale: f32,
}

impl Gravity {
    /// Gravity with a custom multiplier
    pub fn scaled(scale: f32) -> Self {
        Self { scale }
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl ForceSource for Gravity {
    fn force(&self, ctx: &ForceContext) -> Vec3 {
        ctx.gravity * (ctx.mass * self.scale)
    }

    fn name(&self) -> &'static str {
        "gravity"
    }
}

/// Quadratic air drag: `-0.5 * rho * cd * area * |v|^2 * v_hat`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// Drag coefficient
    pub coefficient: f32,
}

impl Drag {
    /// Drag coefficient of a smooth sphere
    pub const SPHERE: f32 = 0.47;
    /// Drag coefficient of a cube face-on
    pub const CUBE: f32 = 1.05;

    /// Drag with the given coefficient
    pub fn new(coefficient: f32) -> Self {
        Self { coefficient: coefficient.max(0.0) }
    }
}

impl Default for Drag {
    fn default() -> Self {
        Self::new(Self::SPHERE)
    }
}

impl ForceSource for Drag {
    fn force(&self, ctx: &ForceContext) -> Vec3 {
        let Some(direction) = utils::try_normalize(ctx.velocity) else {
            return Vec3::zeros();
        };
        let speed_sq = ctx.velocity.magnitude_squared();
        -direction * (0.5 * ctx.air_density * self.coefficient * ctx.cross_section * speed_sq)
    }

    fn name(&self) -> &'static str {
        "drag"
    }
}

/// Fixed world-space force (thrust, wind)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantForce(pub Vec3);

impl ForceSource for ConstantForce {
    fn force(&self, _ctx: &ForceContext) -> Vec3 {
        self.0
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn context(velocity: Vec3) -> ForceContext {
        ForceContext {
            mass: 2.0,
            velocity,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            air_density: 1.225,
            cross_section: 1.0,
        }
    }

    #[test]
    fn test_gravity_scales_with_mass() {
        let ctx = context(Vec3::zeros());
        assert_relative_eq!(Gravity::default().force(&ctx), Vec3::new(0.0, -19.62, 0.0), epsilon = 1e-4);
        assert_relative_eq!(Gravity::scaled(0.5).force(&ctx), Vec3::new(0.0, -9.81, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_drag_opposes_velocity_quadratically() {
        let drag = Drag::new(1.0);
        let slow = drag.force(&context(Vec3::new(2.0, 0.0, 0.0)));
        let fast = drag.force(&context(Vec3::new(4.0, 0.0, 0.0)));
        assert_relative_eq!(slow, Vec3::new(-0.5 * 1.225 * 4.0, 0.0, 0.0), epsilon = 1e-4);
        assert_relative_eq!(fast.x / slow.x, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_drag_at_rest_is_zero() {
        assert_eq!(Drag::default().force(&context(Vec3::zeros())), Vec3::zeros());
    }

    #[test]
    fn test_constant_force() {
        let push = ConstantForce(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(push.force(&context(Vec3::x())), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(push.name(), "constant");
    }
}
