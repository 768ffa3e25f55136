//! Snapshots of editable components
//!
//! A [`ComponentState`] is a detached copy of one component that can be
//! written back onto an entity. Runtime-only parts (rigid body handles,
//! behaviour instances) are rebuilt on restore rather than copied.

use crate::component_system::Component;
use crate::core::audio::AudioComponent;
use crate::core::camera::CameraComponent;
use crate::core::entity::{
    descendants, preview_transform_edits, EcsError, Entity, NameComponent, TransformComponent,
    TransformEdit,
};
use crate::core::light::LightComponent;
use crate::graphics::{MeshComponent, MeshRendererComponent};
use crate::physics::{ColliderType, PhysicsComponent};
use crate::scene::Scene;
use crate::scripting::ScriptComponent;
use tracing::trace;

/// Component types that edits can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Name,
    Transform,
    Mesh,
    MeshRenderer,
    Camera,
    Light,
    Physics,
    Script,
    Audio,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 9] = [
        ComponentKind::Name,
        ComponentKind::Transform,
        ComponentKind::Mesh,
        ComponentKind::MeshRenderer,
        ComponentKind::Camera,
        ComponentKind::Light,
        ComponentKind::Physics,
        ComponentKind::Script,
        ComponentKind::Audio,
    ];

    /// Serialized name of the component type
    pub fn component_name(self) -> &'static str {
        match self {
            Self::Name => NameComponent::component_name(),
            Self::Transform => TransformComponent::component_name(),
            Self::Mesh => MeshComponent::component_name(),
            Self::MeshRenderer => MeshRendererComponent::component_name(),
            Self::Camera => CameraComponent::component_name(),
            Self::Light => LightComponent::component_name(),
            Self::Physics => PhysicsComponent::component_name(),
            Self::Script => ScriptComponent::component_name(),
            Self::Audio => AudioComponent::component_name(),
        }
    }

    pub fn is_present(self, scene: &Scene, entity: Entity) -> bool {
        match self {
            Self::Name => scene.has::<NameComponent>(entity),
            Self::Transform => scene.has::<TransformComponent>(entity),
            Self::Mesh => scene.has::<MeshComponent>(entity),
            Self::MeshRenderer => scene.has::<MeshRendererComponent>(entity),
            Self::Camera => scene.has::<CameraComponent>(entity),
            Self::Light => scene.has::<LightComponent>(entity),
            Self::Physics => scene.has::<PhysicsComponent>(entity),
            Self::Script => scene.has::<ScriptComponent>(entity),
            Self::Audio => scene.has::<AudioComponent>(entity),
        }
    }

    /// Remove the component; returns whether it was present
    pub fn remove(self, scene: &mut Scene, entity: Entity) -> bool {
        match self {
            Self::Name => scene.remove::<NameComponent>(entity).is_some(),
            Self::Transform => scene.remove::<TransformComponent>(entity).is_some(),
            Self::Mesh => scene.remove::<MeshComponent>(entity).is_some(),
            Self::MeshRenderer => scene.remove::<MeshRendererComponent>(entity).is_some(),
            Self::Camera => scene.remove::<CameraComponent>(entity).is_some(),
            Self::Light => scene.remove::<LightComponent>(entity).is_some(),
            Self::Physics => scene.remove::<PhysicsComponent>(entity).is_some(),
            Self::Script => scene.remove::<ScriptComponent>(entity).is_some(),
            Self::Audio => scene.remove::<AudioComponent>(entity).is_some(),
        }
    }
}

/// Persistent parameters of a physics component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsState {
    pub collider_type: ColliderType,
    pub mass: f32,
}

/// Transform of an entity together with the transforms of its descendants
///
/// Restoring writes every recorded value back verbatim, so undoing an edit
/// that was propagated to children returns them exactly where they were even
/// when the edit itself cannot be inverted (a zero size, or a rotation about
/// several axes).
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    pub transform: TransformComponent,
    /// Descendants in propagation order; empty until resolved against a scene
    pub descendants: Vec<(Entity, TransformComponent)>,
}

impl TransformState {
    /// Target transform for the entity alone
    ///
    /// Descendants are filled in by [`TransformState::resolve`] when a
    /// command is built from it.
    pub fn new(transform: TransformComponent) -> Self {
        Self {
            transform,
            descendants: Vec::new(),
        }
    }

    /// Record the current transforms of `entity` and every descendant
    pub fn capture(scene: &Scene, entity: Entity) -> Result<Self, EcsError> {
        let transform = scene.get::<TransformComponent>(entity)?.clone();
        let descendants = descendants(scene.store(), entity)
            .into_iter()
            .filter_map(|child| {
                scene
                    .get::<TransformComponent>(child)
                    .ok()
                    .map(|transform| (child, transform.clone()))
            })
            .collect();
        Ok(Self {
            transform,
            descendants,
        })
    }

    /// Compute where the descendants end up once the entity takes this transform
    ///
    /// The edit is previewed the way the scene applies it (size, then
    /// rotation, then position, each propagated), without touching `scene`.
    /// Already-resolved states are returned unchanged.
    pub fn resolve(self, scene: &Scene, entity: Entity) -> Result<Self, EcsError> {
        if !self.descendants.is_empty() || !scene.has::<TransformComponent>(entity) {
            return Ok(self);
        }
        let edits = [
            TransformEdit::SetSize(self.transform.size()),
            TransformEdit::SetRotation(self.transform.rotation()),
            TransformEdit::SetPosition(self.transform.position()),
        ];
        let (transform, descendants) = preview_transform_edits(scene.store(), entity, &edits)?;
        Ok(Self {
            transform,
            descendants,
        })
    }

    /// Write every recorded transform back and resynchronise rigid bodies
    fn restore(&self, scene: &mut Scene, entity: Entity) -> Result<(), EcsError> {
        scene.insert(entity, self.transform.clone())?;
        scene.sync_physics(entity);
        for (child, transform) in &self.descendants {
            if !scene.has::<TransformComponent>(*child) {
                trace!(child = %child, "Descendant transform gone, skipping");
                continue;
            }
            scene.insert(*child, transform.clone())?;
            scene.sync_physics(*child);
        }
        Ok(())
    }
}

impl From<TransformComponent> for TransformState {
    fn from(transform: TransformComponent) -> Self {
        Self::new(transform)
    }
}

/// Detached copy of one component
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentState {
    Name(NameComponent),
    Transform(TransformState),
    Mesh(MeshComponent),
    MeshRenderer(MeshRendererComponent),
    Camera(CameraComponent),
    Light(LightComponent),
    Physics(PhysicsState),
    /// Logical behaviour name; the instance is rebound through the scene's loader
    Script(String),
    Audio(AudioComponent),
}

impl ComponentState {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Name(_) => ComponentKind::Name,
            Self::Transform(_) => ComponentKind::Transform,
            Self::Mesh(_) => ComponentKind::Mesh,
            Self::MeshRenderer(_) => ComponentKind::MeshRenderer,
            Self::Camera(_) => ComponentKind::Camera,
            Self::Light(_) => ComponentKind::Light,
            Self::Physics(_) => ComponentKind::Physics,
            Self::Script(_) => ComponentKind::Script,
            Self::Audio(_) => ComponentKind::Audio,
        }
    }

    /// Copy the current value of a component
    ///
    /// # Arguments
    /// * `scene` - Scene holding the entity
    /// * `entity` - Entity to read from
    /// * `kind` - Component to copy; a transform also records its descendants
    ///
    /// # Returns
    /// The snapshot, or `EcsError::MissingComponent` when the entity lacks it
    pub fn capture(scene: &Scene, entity: Entity, kind: ComponentKind) -> Result<Self, EcsError> {
        Ok(match kind {
            ComponentKind::Name => Self::Name(scene.get::<NameComponent>(entity)?.clone()),
            ComponentKind::Transform => Self::Transform(TransformState::capture(scene, entity)?),
            ComponentKind::Mesh => Self::Mesh(scene.get::<MeshComponent>(entity)?.clone()),
            ComponentKind::MeshRenderer => {
                Self::MeshRenderer(scene.get::<MeshRendererComponent>(entity)?.clone())
            }
            ComponentKind::Camera => Self::Camera(scene.get::<CameraComponent>(entity)?.clone()),
            ComponentKind::Light => Self::Light(scene.get::<LightComponent>(entity)?.clone()),
            ComponentKind::Physics => {
                let physics = scene.get::<PhysicsComponent>(entity)?;
                Self::Physics(PhysicsState {
                    collider_type: physics.collider_type(),
                    mass: physics.mass(),
                })
            }
            ComponentKind::Script => {
                Self::Script(scene.get::<ScriptComponent>(entity)?.behavior_name.clone())
            }
            ComponentKind::Audio => Self::Audio(scene.get::<AudioComponent>(entity)?.clone()),
        })
    }

    /// Fill in whatever the state needs from the scene before it is recorded
    pub fn resolve(self, scene: &Scene, entity: Entity) -> Result<Self, EcsError> {
        match self {
            Self::Transform(state) => Ok(Self::Transform(state.resolve(scene, entity)?)),
            other => Ok(other),
        }
    }

    /// Write this state onto an entity, adding the component if absent
    ///
    /// Transforms are written back exactly, descendants included, and rigid
    /// bodies are resynchronised. Scripts are rebound through the scene's
    /// behaviour loader.
    pub fn apply(&self, scene: &mut Scene, entity: Entity) -> Result<(), EcsError> {
        trace!(entity = %entity, kind = ?self.kind(), "Applying component state");
        match self {
            Self::Name(name) => {
                scene.insert(entity, name.clone())?;
            }
            Self::Transform(state) => state.restore(scene, entity)?,
            Self::Mesh(mesh) => {
                scene.insert(entity, mesh.clone())?;
            }
            Self::MeshRenderer(renderer) => {
                scene.insert(entity, renderer.clone())?;
            }
            Self::Camera(camera) => {
                scene.insert(entity, camera.clone())?;
            }
            Self::Light(light) => {
                scene.insert(entity, light.clone())?;
            }
            Self::Physics(state) => {
                if scene.has::<PhysicsComponent>(entity) {
                    let (store, physics) = scene.store_and_physics_mut();
                    let component = store.get_mut::<PhysicsComponent>(entity)?;
                    if component.collider_type() != state.collider_type {
                        component.set_collider_type(physics, state.collider_type);
                    }
                    if component.mass() != state.mass {
                        component.set_mass(physics, state.mass);
                    }
                } else {
                    scene.add_physics(entity, state.collider_type, state.mass)?;
                }
            }
            Self::Script(name) => {
                let unchanged = scene
                    .get::<ScriptComponent>(entity)
                    .is_ok_and(|script| &script.behavior_name == name);
                if !unchanged {
                    let behavior = scene.bind_script(name);
                    scene.insert(entity, ScriptComponent::new(name.clone(), behavior))?;
                }
            }
            Self::Audio(audio) => {
                scene.insert(entity, audio.clone())?;
            }
        }
        Ok(())
    }
}
