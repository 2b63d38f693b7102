//! Rigid bodies
//!
//! A body is mass, a transform, a velocity, the forces acting on it and an
//! optional collider. Bodies are plain data; the [`PhysicsWorld`] owns them
//! and drives every phase of the step.
//!
//! [`PhysicsWorld`]: crate::physics::PhysicsWorld

use crate::foundation::math::{utils, Quat, Vec3};
use crate::physics::collision::Collider;
use crate::physics::forces::{ForceContext, ForceSource};
use crate::physics::PhysicsError;

slotmap::new_key_type! {
    /// Stable identity of a body registered with a world
    pub struct BodyHandle;
}

/// Whether a body integrates motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationMode {
    /// Never moves; still collides as an immovable partner
    Static,
    /// Integrates forces every fixed step
    #[default]
    Kinematic,
}

/// Rigid body
#[derive(Debug)]
pub struct RigidBody {
    mass: f32,
    mode: SimulationMode,
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    velocity_last_frame: Vec3,
    forces: Vec<Box<dyn ForceSource>>,
    collider: Option<Collider>,
    mass_from_density: bool,
}

impl RigidBody {
    /// Body that moves under forces and collisions
    pub fn kinematic(mass: f32) -> Self {
        Self {
            mass,
            mode: SimulationMode::Kinematic,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            velocity: Vec3::zeros(),
            velocity_last_frame: Vec3::zeros(),
            forces: Vec::new(),
            collider: None,
            mass_from_density: false,
        }
    }

    /// Body that never moves
    ///
    /// Its nominal mass is 1 but it behaves as infinitely heavy.
    pub fn fixed() -> Self {
        Self {
            mode: SimulationMode::Static,
            ..Self::kinematic(1.0)
        }
    }

    /// Set the initial position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the initial rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Attach a collider
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Attach a force source
    pub fn with_force(mut self, force: impl ForceSource + 'static) -> Self {
        self.add_force(Box::new(force));
        self
    }

    /// Derive mass from the collider material density at registration
    pub fn with_mass_from_density(mut self) -> Self {
        self.mass_from_density = true;
        self
    }

    /// Attach a force source to a live body
    pub fn add_force(&mut self, force: Box<dyn ForceSource>) {
        self.forces.push(force);
    }

    /// Mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Simulation mode
    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    /// Whether the body integrates and can be pushed by collisions
    ///
    /// A kinematic body carrying an infinite collider is treated as static.
    pub fn is_movable(&self) -> bool {
        self.mode == SimulationMode::Kinematic
            && self.collider.as_ref().map_or(true, Collider::is_kinematic)
    }

    /// `1 / mass` for movable bodies, zero otherwise
    pub fn inverse_mass(&self) -> f32 {
        if self.is_movable() {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Committed position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Rotation
    pub fn rotation(&self) -> &Quat {
        &self.rotation
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Velocity before this step's integration
    pub fn velocity_last_frame(&self) -> Vec3 {
        self.velocity_last_frame
    }

    /// Position the body is heading to this step, before collision correction
    pub fn theoretical_position(&self) -> Vec3 {
        self.collider
            .as_ref()
            .map_or(self.position, Collider::theoretical_position)
    }

    /// Attached collider
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Attached collider (mutable)
    pub fn collider_mut(&mut self) -> Option<&mut Collider> {
        self.collider.as_mut()
    }

    /// Change velocity by `impulse / mass`; no effect on immovable bodies
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse * self.inverse_mass();
    }

    /// Teleport the body
    pub fn set_transform(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
        if let Some(collider) = self.collider.as_mut() {
            collider.begin_step(position);
        }
    }

    pub(crate) fn add_velocity(&mut self, delta: Vec3) {
        self.velocity += delta;
    }

    pub(crate) fn add_displacement(&mut self, correction: Vec3) {
        if let Some(collider) = self.collider.as_mut() {
            collider.add_displacement(correction);
        }
    }

    /// Check parameters and derive mass from density if requested
    pub(crate) fn prepare(&mut self) -> Result<(), PhysicsError> {
        if let Some(collider) = self.collider.as_ref() {
            collider.volume().validate()?;
        }

        if self.mass_from_density {
            let collider = self.collider.as_ref().ok_or_else(|| {
                PhysicsError::InvalidConfig("mass from density requires a collider".into())
            })?;
            if collider.volume().is_infinite() {
                return Err(PhysicsError::InvalidShape(format!(
                    "cannot derive mass of an infinite {}",
                    collider.kind()
                )));
            }
            self.mass = collider.material().density * collider.volume().volume();
        }

        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(PhysicsError::InvalidMass(self.mass));
        }

        if !(utils::is_finite(self.position) && utils::is_finite(self.velocity)) {
            return Err(PhysicsError::InvalidConfig(format!(
                "body state must be finite (position {:?}, velocity {:?})",
                self.position, self.velocity
            )));
        }

        let position = self.position;
        let rotation = self.rotation;
        if let Some(collider) = self.collider.as_mut() {
            collider.begin_step(position);
            collider.refresh_axis(position, &rotation);
        }
        Ok(())
    }

    /// Rebuild the plane frame of an infinite collider if the body moved
    pub(crate) fn refresh_axis(&mut self) -> bool {
        let (position, rotation) = (self.position, self.rotation);
        self.collider
            .as_mut()
            .is_some_and(|collider| collider.refresh_axis(position, &rotation))
    }

    /// Sum forces, integrate velocity and compute the theoretical position
    ///
    /// Returns how many non-finite results were clamped to zero.
    pub(crate) fn integrate(&mut self, dt: f32, gravity: Vec3, air_density: f32) -> usize {
        self.velocity_last_frame = self.velocity;

        if !self.is_movable() {
            let position = self.position;
            if let Some(collider) = self.collider.as_mut() {
                collider.begin_step(position);
            }
            return 0;
        }

        let ctx = ForceContext {
            mass: self.mass,
            velocity: self.velocity,
            gravity,
            air_density,
            cross_section: self
                .collider
                .as_ref()
                .map_or(1.0, |c| c.volume().cross_section(self.velocity)),
        };

        let mut clamped = 0;
        let mut net_force = Vec3::zeros();
        for source in &self.forces {
            let (force, bad) = utils::sanitize(source.force(&ctx));
            if bad {
                log::trace!("RigidBody: {} force produced a non-finite value", source.name());
                clamped += 1;
            }
            net_force += force;
        }

        let (velocity, bad) = utils::sanitize(self.velocity + net_force * (dt / self.mass));
        clamped += usize::from(bad);
        self.velocity = velocity;

        let (theoretical, bad) = utils::sanitize(self.position + self.velocity * dt);
        let theoretical = if bad {
            clamped += 1;
            self.position
        } else {
            theoretical
        };

        match self.collider.as_mut() {
            Some(collider) => collider.begin_step(theoretical),
            None => self.position = theoretical,
        }
        clamped
    }

    /// Commit `theoretical + displacement` as the new position
    ///
    /// Returns `true` if the result was non-finite and discarded.
    pub(crate) fn commit(&mut self) -> bool {
        if !self.is_movable() {
            return false;
        }
        let Some(collider) = self.collider.as_ref() else {
            return false;
        };
        let (position, bad) =
            utils::sanitize(collider.theoretical_position() + collider.displacement());
        if !bad {
            self.position = position;
        }
        bad
    }

    /// Clamp a non-finite velocity to zero; returns `true` if clamped
    pub(crate) fn sanitize_velocity(&mut self) -> bool {
        let (velocity, bad) = utils::sanitize(self.velocity);
        self.velocity = velocity;
        bad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::forces::{ConstantForce, Gravity};
    use crate::physics::PhysicsMaterial;
    use approx::assert_relative_eq;

    const GRAVITY: [f32; 3] = [0.0, -10.0, 0.0];

    #[test]
    fn test_integrate_gravity() {
        let mut body = RigidBody::kinematic(2.0)
            .with_position(Vec3::new(0.0, 5.0, 0.0))
            .with_collider(Collider::sphere(0.5))
            .with_force(Gravity::default());
        body.prepare().unwrap();

        assert_eq!(body.integrate(0.1, Vec3::from(GRAVITY), 0.0), 0);
        assert_relative_eq!(body.velocity(), Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(body.theoretical_position(), Vec3::new(0.0, 4.9, 0.0), epsilon = 1e-6);
        // Not committed yet
        assert_relative_eq!(body.position(), Vec3::new(0.0, 5.0, 0.0));

        body.add_displacement(Vec3::new(0.0, 0.05, 0.0));
        assert!(!body.commit());
        assert_relative_eq!(body.position(), Vec3::new(0.0, 4.95, 0.0), epsilon = 1e-6);
        assert_relative_eq!(body.velocity_last_frame(), Vec3::zeros());
    }

    #[test]
    fn test_static_body_never_moves() {
        let mut body = RigidBody::fixed()
            .with_velocity(Vec3::new(1.0, 0.0, 0.0))
            .with_force(ConstantForce(Vec3::new(100.0, 0.0, 0.0)));
        body.prepare().unwrap();
        body.integrate(0.1, Vec3::from(GRAVITY), 1.0);
        body.commit();
        assert_eq!(body.position(), Vec3::zeros());
        assert_eq!(body.inverse_mass(), 0.0);
        body.apply_impulse(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(body.velocity(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_body_without_collider_moves_directly() {
        let mut body = RigidBody::kinematic(1.0).with_velocity(Vec3::new(1.0, 0.0, 0.0));
        body.prepare().unwrap();
        body.integrate(0.5, Vec3::zeros(), 0.0);
        assert_relative_eq!(body.position(), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_kinematic_plane_is_immovable() {
        let body = RigidBody::kinematic(1.0).with_collider(Collider::plane(Vec3::y()));
        assert!(!body.is_movable());
        assert_eq!(body.inverse_mass(), 0.0);
    }

    #[test]
    fn test_prepare_rejects_bad_mass() {
        assert!(matches!(RigidBody::kinematic(0.0).prepare(), Err(PhysicsError::InvalidMass(_))));
        assert!(matches!(RigidBody::kinematic(f32::NAN).prepare(), Err(PhysicsError::InvalidMass(_))));
    }

    #[test]
    fn test_mass_from_density() {
        let mut body = RigidBody::kinematic(1.0)
            .with_collider(
                Collider::aabb(Vec3::repeat(0.5))
                    .with_material(PhysicsMaterial::default().with_density(250.0)),
            )
            .with_mass_from_density();
        body.prepare().unwrap();
        assert_relative_eq!(body.mass(), 250.0);

        let mut plane = RigidBody::kinematic(1.0)
            .with_collider(Collider::plane(Vec3::y()))
            .with_mass_from_density();
        assert!(matches!(plane.prepare(), Err(PhysicsError::InvalidShape(_))));

        let mut bare = RigidBody::kinematic(1.0).with_mass_from_density();
        assert!(matches!(bare.prepare(), Err(PhysicsError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_finite_force_is_clamped() {
        let mut body = RigidBody::kinematic(1.0)
            .with_collider(Collider::sphere(1.0))
            .with_force(ConstantForce(Vec3::new(f32::NAN, 0.0, 0.0)));
        body.prepare().unwrap();
        assert_eq!(body.integrate(0.1, Vec3::zeros(), 0.0), 1);
        assert_eq!(body.velocity(), Vec3::zeros());
    }

    #[test]
    fn test_force_added_to_live_body() {
        let mut body = RigidBody::kinematic(2.0).with_collider(Collider::sphere(0.5));
        body.prepare().unwrap();
        body.integrate(0.1, Vec3::zeros(), 0.0);
        assert_eq!(body.velocity(), Vec3::zeros());

        body.add_force(Box::new(ConstantForce(Vec3::new(4.0, 0.0, 0.0))));
        body.integrate(0.1, Vec3::zeros(), 0.0);
        assert_relative_eq!(body.velocity(), Vec3::new(0.2, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_apply_impulse_scales_by_mass() {
        let mut body = RigidBody::kinematic(4.0);
        body.apply_impulse(Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(body.velocity(), Vec3::new(0.5, 0.0, 0.0));
    }
}
