//! Physics component linking an entity to a rigid body

use super::collision::ColliderShape;
use super::world::{PhysicsWorld, RigidBody, RigidBodyHandle};
use crate::component_system::Component;
use glam::{Quat, Vec3};
use tracing::{trace, warn};

/// Primitive used to approximate an entity's mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColliderType {
    #[default]
    Box,
    Sphere,
    Capsule,
}

impl ColliderType {
    /// Persisted integer value
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Box => 0,
            Self::Sphere => 1,
            Self::Capsule => 2,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Box),
            1 => Some(Self::Sphere),
            2 => Some(Self::Capsule),
            _ => None,
        }
    }

    /// Collider of this type fitted to `dimensions` (full mesh extents) scaled by `size`
    pub fn shape(self, dimensions: Vec3, size: Vec3) -> ColliderShape {
        let extents = (dimensions * size).abs();
        match self {
            Self::Box => ColliderShape::Box {
                half_extents: extents * 0.5,
            },
            Self::Sphere => ColliderShape::Sphere {
                radius: extents.max_element() * 0.5,
            },
            Self::Capsule => {
                let radius = extents.x.max(extents.z) * 0.5;
                ColliderShape::Capsule {
                    radius,
                    half_height: (extents.y * 0.5 - radius).max(0.0),
                }
            }
        }
    }
}

/// Rigid body attachment of an entity
///
/// The body itself lives in the scene's [`PhysicsWorld`]; this component keeps
/// the parameters needed to rebuild it and the handle to reach it.
#[derive(Debug, Clone, PartialEq, Component)]
#[component(name = "PhysicsComponent")]
pub struct PhysicsComponent {
    collider_type: ColliderType,
    mass: f32,
    /// Full extents of the mesh bounds the collider is fitted to
    shape_dimensions: Vec3,
    /// Entity size the collider was last fitted with
    size: Vec3,
    handle: Option<RigidBodyHandle>,
}

impl PhysicsComponent {
    /// Build a rigid body and register it in `world`
    pub fn new(
        world: &mut PhysicsWorld,
        collider_type: ColliderType,
        shape_dimensions: Vec3,
        size: Vec3,
        position: Vec3,
        rotation: Quat,
        mass: f32,
    ) -> Self {
        let shape = collider_type.shape(shape_dimensions, size);
        let handle = world.add_body(RigidBody::new(shape, position, rotation, mass.max(0.0)));
        trace!(handle = ?handle, collider = ?collider_type, mass, "Created physics body");
        Self {
            collider_type,
            mass: mass.max(0.0),
            shape_dimensions,
            size,
            handle: Some(handle),
        }
    }

    pub fn collider_type(&self) -> ColliderType {
        self.collider_type
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn shape_dimensions(&self) -> Vec3 {
        self.shape_dimensions
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn handle(&self) -> Option<RigidBodyHandle> {
        self.handle
    }

    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    fn body_mut<'w>(&self, world: &'w mut PhysicsWorld) -> Option<&'w mut RigidBody> {
        let body = self.handle.and_then(|handle| world.body_mut(handle));
        if body.is_none() {
            warn!(handle = ?self.handle, "Physics component has no live body");
        }
        body
    }

    pub fn set_position(&self, world: &mut PhysicsWorld, position: Vec3) {
        if let Some(body) = self.body_mut(world) {
            body.position = position;
        }
    }

    pub fn set_rotation(&self, world: &mut PhysicsWorld, rotation: Quat) {
        if let Some(body) = self.body_mut(world) {
            body.rotation = rotation;
        }
    }

    /// Refit the collider to a new entity size
    pub fn set_size(&mut self, world: &mut PhysicsWorld, size: Vec3) {
        self.size = size;
        let shape = self.collider_type.shape(self.shape_dimensions, size);
        if let Some(body) = self.body_mut(world) {
            body.shape = shape;
        }
    }

    pub fn set_mass(&mut self, world: &mut PhysicsWorld, mass: f32) {
        self.mass = mass.max(0.0);
        let mass = self.mass;
        if let Some(body) = self.body_mut(world) {
            body.mass = mass;
            body.linear_velocity = Vec3::ZERO;
        }
    }

    pub fn set_collider_type(&mut self, world: &mut PhysicsWorld, collider_type: ColliderType) {
        self.collider_type = collider_type;
        let shape = collider_type.shape(self.shape_dimensions, self.size);
        if let Some(body) = self.body_mut(world) {
            body.shape = shape;
        }
    }

    /// Overwrite the body pose (editor wins)
    pub fn set_world_transform(&self, world: &mut PhysicsWorld, position: Vec3, rotation: Quat) {
        if let Some(handle) = self.handle {
            world.set_world_transform(handle, position, rotation);
        }
    }

    pub fn world_transform(&self, world: &PhysicsWorld) -> Option<(Vec3, Quat)> {
        self.handle.and_then(|handle| world.world_transform(handle))
    }

    /// Unregister the body; the component keeps its parameters but no handle
    pub fn remove_from(&mut self, world: &mut PhysicsWorld) {
        if let Some(handle) = self.handle.take() {
            world.remove_body(handle);
        }
    }
}
