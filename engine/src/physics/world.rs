//! Rigid-body dynamics world
//!
//! A small fixed-step simulation: gravity integration for dynamic bodies and
//! AABB contact resolution against every other body. Bodies live in a
//! [`SlotMap`], so a handle to a removed body never aliases a newer one.

use super::collision::{penetration, sweep_and_prune, ColliderShape};
use crate::config::PhysicsConfig;
use crate::graphics::Aabb;
use glam::{Quat, Vec3};
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, info, trace, warn};

new_key_type! {
    /// Handle to a body in a [`PhysicsWorld`]
    pub struct RigidBodyHandle;
}

/// A simulated body
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub shape: ColliderShape,
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    /// Zero makes the body static: it never integrates and is never pushed
    pub mass: f32,
}

impl RigidBody {
    pub fn new(shape: ColliderShape, position: Vec3, rotation: Quat, mass: f32) -> Self {
        Self {
            shape,
            position,
            rotation,
            linear_velocity: Vec3::ZERO,
            mass,
        }
    }

    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    /// World-space bounds of the collider
    pub fn aabb(&self) -> Aabb {
        self.shape.world_aabb(self.position, self.rotation)
    }
}

/// Dynamics world stepped by the scene while running
#[derive(Debug)]
pub struct PhysicsWorld {
    bodies: SlotMap<RigidBodyHandle, RigidBody>,
    gravity: Vec3,
    fixed_timestep: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new(config: &PhysicsConfig) -> Self {
        info!(
            gravity = ?config.gravity,
            fixed_timestep = config.fixed_timestep,
            max_substeps = config.max_substeps,
            "Creating physics world"
        );
        Self {
            bodies: SlotMap::with_key(),
            gravity: config.gravity,
            fixed_timestep: config.fixed_timestep.max(f32::EPSILON),
            max_substeps: config.max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Register a body and return its handle
    pub fn add_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        trace!(handle = ?handle, "Added rigid body");
        handle
    }

    /// Remove a body; stale handles are ignored
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        let body = self.bodies.remove(handle)?;
        trace!(handle = ?handle, "Removed rigid body");
        Some(body)
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    /// Overwrite a body's pose; returns false for a stale handle
    pub fn set_world_transform(&mut self, handle: RigidBodyHandle, position: Vec3, rotation: Quat) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.position = position;
                body.rotation = rotation;
                true
            }
            None => {
                warn!(handle = ?handle, "Tried to move a removed rigid body");
                false
            }
        }
    }

    pub fn world_transform(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.body(handle).map(|body| (body.position, body.rotation))
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Stop every body and drop any unsimulated time
    pub fn freeze(&mut self) {
        for body in self.bodies.values_mut() {
            body.linear_velocity = Vec3::ZERO;
        }
        self.accumulator = 0.0;
    }

    /// Advance the simulation by `dt` seconds in fixed sub-steps
    ///
    /// Returns the number of sub-steps taken. Time beyond `max_substeps`
    /// steps is dropped rather than carried into later frames.
    pub fn step(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep && steps < self.max_substeps {
            self.substep(self.fixed_timestep);
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }
        if self.accumulator >= self.fixed_timestep {
            debug!(
                dropped = self.accumulator,
                "Physics fell behind, dropping simulation time"
            );
            self.accumulator = 0.0;
        }
        steps
    }

    fn substep(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            if body.is_static() {
                continue;
            }
            body.linear_velocity += gravity * dt;
            body.position += body.linear_velocity * dt;
        }
        self.resolve_contacts();
    }

    fn resolve_contacts(&mut self) {
        let (handles, boxes): (Vec<RigidBodyHandle>, Vec<Aabb>) = self
            .bodies
            .iter()
            .map(|(handle, body)| (handle, body.aabb()))
            .unzip();

        for (a, b) in sweep_and_prune(&boxes) {
            let (ha, hb) = (handles[a], handles[b]);
            let (Some(body_a), Some(body_b)) = (self.bodies.get(ha).cloned(), self.bodies.get(hb).cloned()) else {
                continue;
            };
            if body_a.is_static() && body_b.is_static() {
                continue;
            }
            // Boxes may have moved while resolving earlier pairs
            let Some((normal, depth)) = penetration(&body_a.aabb(), &body_b.aabb()) else {
                continue;
            };
            let (share_a, share_b) = match (body_a.is_static(), body_b.is_static()) {
                (false, true) => (1.0, 0.0),
                (true, false) => (0.0, 1.0),
                _ => (0.5, 0.5),
            };
            if let Some(body) = self.bodies.get_mut(ha) {
                push_out(body, normal, depth * share_a);
            }
            if let Some(body) = self.bodies.get_mut(hb) {
                push_out(body, -normal, depth * share_b);
            }
        }
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.accumulator = 0.0;
        debug!("Cleared physics world");
    }
}

/// Move a body along `normal` and cancel the velocity pointing back into the contact
fn push_out(body: &mut RigidBody, normal: Vec3, depth: f32) {
    if depth <= 0.0 {
        return;
    }
    body.position += normal * depth;
    let approach = body.linear_velocity.dot(normal);
    if approach < 0.0 {
        body.linear_velocity -= normal * approach;
    }
}
