//! Physics world: body registry and the fixed-step pipeline
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! One call to [`PhysicsWorld::step`] runs these phases strictly in order:
//!
//! 1. Refresh plane frames of infinite colliders that moved
//! 2. Integrate forces into velocities and theoretical positions
//! 3. Re-bucket finite volumes in the chunk grid
//! 4. Collect candidate pairs (chunk neighbourhoods plus every surface)
//! 5. Narrow phase through the dispatch table, carrying contact age forward
//! 6. Resolve contacts in key order
//! 7. Commit `theoretical + displacement` as the new positions and
//!    re-bucket anything the correction pushed across a chunk boundary
//!
//! All containers iterated during a step are ordered, so the same inputs
//! always produce the same results.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use slotmap::SlotMap;

use crate::core::config::{Config, PhysicsConfig};
use crate::foundation::time::StepTimer;
use crate::physics::collision::{CollisionTable, ContactKey, ContactRecord, VolumeState};
use crate::physics::resolver;
use crate::physics::{BodyHandle, PhysicsError, RigidBody};
use crate::spatial::ChunkGrid;

/// Counters describing one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Index of this step (0 for the first)
    pub step: u64,
    /// Bodies that integrated motion
    pub integrated: usize,
    /// Plane frames rebuilt
    pub axes_refreshed: usize,
    /// Volumes that changed chunk
    pub rebucketed: usize,
    /// Pairs handed to the narrow phase
    pub candidate_pairs: usize,
    /// Overlapping pairs after the narrow phase
    pub contacts: usize,
    /// Pairs that started overlapping
    pub contacts_began: usize,
    /// Pairs that stopped overlapping
    pub contacts_ended: usize,
    /// Contacts that received a normal impulse
    pub impulses: usize,
    /// Non-finite vectors clamped to zero
    pub clamped: usize,
    /// Wall-clock time spent in the step
    pub elapsed_millis: f32,
}

/// Simulation registry and step driver
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bodies: SlotMap<BodyHandle, RigidBody>,
    grid: ChunkGrid,
    surfaces: BTreeSet<BodyHandle>,
    contacts: BTreeMap<ContactKey, ContactRecord>,
    began: BTreeSet<ContactKey>,
    ended: BTreeSet<ContactKey>,
    table: CollisionTable,
    steps: u64,
}

impl PhysicsWorld {
    /// Create an empty world
    ///
    /// The configuration is validated here and fixed for the world's lifetime.
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        let grid = ChunkGrid::new(config.chunk_size, config.neighborhood)?;

        log::info!(
            "PhysicsWorld: chunk size {:?}, timestep {}s, gravity {:?}, {:?} neighbourhood",
            config.chunk_size,
            config.fixed_timestep,
            config.gravity,
            config.neighborhood
        );

        Ok(Self {
            config,
            bodies: SlotMap::with_key(),
            grid,
            surfaces: BTreeSet::new(),
            contacts: BTreeMap::new(),
            began: BTreeSet::new(),
            ended: BTreeSet::new(),
            table: CollisionTable::new(),
            steps: 0,
        })
    }

    /// Create a world from a `.toml` or `.ron` configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, PhysicsError> {
        Self::new(PhysicsConfig::load_from_file(path)?)
    }

    /// Add a body to the simulation
    ///
    /// Mass, shape and initial state are checked here; a body that fails
    /// is not added.
    pub fn register_body(&mut self, mut body: RigidBody) -> Result<BodyHandle, PhysicsError> {
        body.prepare()?;

        let placement = body.collider().map(|collider| {
            (
                collider.volume().is_infinite(),
                collider.volume().bounding_radius(),
                collider.kind(),
            )
        });
        let position = body.theoretical_position();
        let handle = self.bodies.insert(body);

        match placement {
            Some((true, _, kind)) => {
                self.surfaces.insert(handle);
                log::info!("PhysicsWorld: registered {kind} surface {handle:?}");
            }
            Some((false, radius, kind)) => {
                let limit = 0.5 * self.config.chunk_size.min();
                if radius > limit {
                    log::warn!(
                        "PhysicsWorld: {kind} {handle:?} has bounding radius {radius} above half the \
                         smallest chunk dimension ({limit}); some contacts may be missed"
                    );
                }
                let key = self.grid.assign(handle, position);
                log::debug!("PhysicsWorld: registered {kind} {handle:?} in chunk {key:?}");
            }
            None => log::debug!("PhysicsWorld: registered body {handle:?} without collider"),
        }

        Ok(handle)
    }

    /// Remove a body, its chunk membership and every contact it is part of
    pub fn unregister_body(&mut self, handle: BodyHandle) -> Result<RigidBody, PhysicsError> {
        let body = self.bodies.remove(handle).ok_or(PhysicsError::UnknownBody)?;
        self.grid.remove(handle);
        self.surfaces.remove(&handle);
        self.contacts.retain(|key, _| !key.involves(handle));
        self.began.retain(|key| !key.involves(handle));
        self.ended.retain(|key| !key.involves(handle));
        log::debug!("PhysicsWorld: unregistered {handle:?}");
        Ok(body)
    }

    /// Advance the simulation by one fixed timestep
    pub fn step(&mut self) -> StepReport {
        let timer = StepTimer::start();
        let dt = self.config.fixed_timestep;
        let mut report = StepReport { step: self.steps, ..StepReport::default() };

        // Plane frames
        for handle in &self.surfaces {
            if let Some(body) = self.bodies.get_mut(*handle) {
                report.axes_refreshed += usize::from(body.refresh_axis());
            }
        }

        // Integration
        for body in self.bodies.values_mut() {
            report.integrated += usize::from(body.is_movable());
            report.clamped += body.integrate(dt, self.config.gravity, self.config.air_density);
        }

        // Broad phase
        let bodies = &self.bodies;
        report.rebucketed = self.grid.update(|handle| bodies.get(handle).map(RigidBody::theoretical_position));
        let candidates = self.candidate_pairs();
        report.candidate_pairs = candidates.len();

        // Narrow phase
        let mut detected = BTreeMap::new();
        for (a, b) in candidates {
            let (Some(first), Some(second)) = (self.volume_state(a), self.volume_state(b)) else {
                continue;
            };
            let key = ContactKey::new(a, b);
            let mut record = ContactRecord::new(a, b);
            if self.table.is_colliding(&first, &second, &mut record) {
                if let Some(previous) = self.contacts.get(&key) {
                    record.time_since_start = previous.time_since_start + dt;
                }
                detected.insert(key, record);
            }
        }

        self.began = detected.keys().filter(|key| !self.contacts.contains_key(*key)).copied().collect();
        self.ended = self.contacts.keys().filter(|key| !detected.contains_key(*key)).copied().collect();
        self.contacts = detected;

        // Resolution
        for record in self.contacts.values_mut() {
            let outcome = resolver::resolve_contact(record, &mut self.bodies);
            report.impulses += usize::from(outcome.impulse_applied);
            report.clamped += outcome.clamped;
        }

        // Commit
        for body in self.bodies.values_mut() {
            report.clamped += usize::from(body.commit());
        }
        let bodies = &self.bodies;
        report.rebucketed += self.grid.update(|handle| bodies.get(handle).map(RigidBody::position));

        report.contacts = self.contacts.len();
        report.contacts_began = self.began.len();
        report.contacts_ended = self.ended.len();
        report.elapsed_millis = timer.elapsed_millis();
        self.steps += 1;

        if report.contacts_began + report.contacts_ended + report.rebucketed > 0 {
            log::debug!(
                "step {}: {} contacts (+{} -{}), {} rebucketed",
                report.step,
                report.contacts,
                report.contacts_began,
                report.contacts_ended,
                report.rebucketed
            );
        }
        if report.clamped > 0 {
            log::debug!("step {}: clamped {} non-finite values", report.step, report.clamped);
        }

        report
    }

    // Grid neighbourhood pairs plus every finite volume against every surface,
    // skipping pairs where nothing can move
    fn candidate_pairs(&self) -> BTreeSet<(BodyHandle, BodyHandle)> {
        let mut pairs = self.grid.candidate_pairs();

        for surface in &self.surfaces {
            for (_, members) in self.grid.iter() {
                for member in members {
                    pairs.insert(if member > surface { (*member, *surface) } else { (*surface, *member) });
                }
            }
        }

        let movable = |handle: &BodyHandle| self.bodies.get(*handle).is_some_and(RigidBody::is_movable);
        pairs.retain(|(a, b)| movable(a) || movable(b));
        pairs
    }

    fn volume_state(&self, handle: BodyHandle) -> Option<VolumeState> {
        let body = self.bodies.get(handle)?;
        let collider = body.collider()?;
        Some(VolumeState {
            handle,
            volume: collider.world_volume(body.rotation()),
            velocity: body.velocity(),
        })
    }

    /// Body by handle
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Body by handle (mutable)
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// All bodies in handle order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.bodies.iter()
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Contacts from the last step, in key order
    pub fn contacts(&self) -> impl Iterator<Item = &ContactRecord> {
        self.contacts.values()
    }

    /// Contact between two bodies, in either order
    pub fn contact(&self, a: BodyHandle, b: BodyHandle) -> Option<&ContactRecord> {
        self.contacts.get(&ContactKey::new(a, b))
    }

    /// Pairs that started overlapping on the last step
    pub fn contacts_began(&self) -> &BTreeSet<ContactKey> {
        &self.began
    }

    /// Pairs that stopped overlapping on the last step
    pub fn contacts_ended(&self) -> &BTreeSet<ContactKey> {
        &self.ended
    }

    /// Configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Broad-phase grid
    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    /// Handles of infinite surfaces (planes and halfspaces)
    pub fn surfaces(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.surfaces.iter().copied()
    }

    /// Shape-pair dispatch table
    pub fn collision_table(&self) -> &CollisionTable {
        &self.table
    }

    /// Number of steps run so far
    pub fn step_count(&self) -> u64 {
        self.steps
    }
}
