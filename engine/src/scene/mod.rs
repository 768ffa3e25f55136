//! Scene orchestration
//!
//! A [`Scene`] owns the component store, the dynamics world, the shader cache
//! and the script registry. It drives per-frame simulation, behaviours and
//! draw submission, and keeps rigid bodies in step with transform edits.

pub mod shape;

use crate::component_system::Component;
use crate::config::EngineConfig;
use crate::core::camera::{CameraComponent, DebugCamera};
use crate::core::entity::components::euler_degrees_to_quat;
use crate::core::entity::{
    apply_transform_edit, children_of, ComponentStore, EcsError, Entity, NameComponent, Parent,
    SceneId, TransformComponent, TransformEdit,
};
use crate::core::light::LightComponent;
use crate::graphics::{
    DrawItem, LightUniform, MeshComponent, MeshRendererComponent, RenderBackend, ViewSpecification,
};
use crate::physics::{pull_transforms, push_transform, ColliderType, PhysicsComponent, PhysicsWorld};
use crate::scripting::{
    bind_behavior, Behavior, BehaviorContext, BehaviorLoader, NoopBehavior, ScriptComponent,
    ScriptDllRegistry,
};
use crate::shaders::ShaderCache;
use glam::Vec3;
use std::any::Any;
use std::rc::Rc;
use tracing::{debug, info, trace, warn};

/// Whether the scene is being edited or simulated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SceneState {
    /// Physics paused, editing enabled
    #[default]
    Edit,
    /// Physics stepping and behaviours running
    Run,
    /// Simulation frozen with its state retained
    Pause,
}

/// Scene graph plus the systems that operate on it
pub struct Scene {
    name: String,
    state: SceneState,
    store: ComponentStore,
    physics: PhysicsWorld,
    shader_cache: ShaderCache,
    script_registry: ScriptDllRegistry,
    behavior_loader: Option<Rc<dyn BehaviorLoader>>,
    config: EngineConfig,
    is_focused_on_debug_camera: bool,
    run_snapshot: Option<Vec<(Entity, TransformComponent)>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("entities", &self.store.entity_count())
            .field("bodies", &self.physics.body_count())
            .finish()
    }
}

impl Scene {
    /// Create an empty scene in the `Edit` state
    pub fn new(config: EngineConfig) -> Self {
        let id = SceneId::next();
        info!(scene = ?id, "Creating scene");
        Self {
            name: "Untitled".to_string(),
            state: SceneState::Edit,
            store: ComponentStore::new(id),
            physics: PhysicsWorld::new(&config.physics),
            shader_cache: ShaderCache::new(),
            script_registry: ScriptDllRegistry::new(),
            behavior_loader: None,
            config,
            is_focused_on_debug_camera: true,
            run_snapshot: None,
        }
    }

    pub fn id(&self) -> SceneId {
        self.store.scene_id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    /// Direct store access; physics is not resynchronised for edits made here
    pub fn store_mut(&mut self) -> &mut ComponentStore {
        &mut self.store
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Store and dynamics world borrowed together, for edits that touch both
    pub fn store_and_physics_mut(&mut self) -> (&mut ComponentStore, &mut PhysicsWorld) {
        (&mut self.store, &mut self.physics)
    }

    pub fn shader_cache(&self) -> &ShaderCache {
        &self.shader_cache
    }

    pub fn shader_cache_mut(&mut self) -> &mut ShaderCache {
        &mut self.shader_cache
    }

    pub fn script_registry(&self) -> &ScriptDllRegistry {
        &self.script_registry
    }

    pub fn script_registry_mut(&mut self) -> &mut ScriptDllRegistry {
        &mut self.script_registry
    }

    /// Loader used to rebind scripts restored by undo and redo
    pub fn set_behavior_loader(&mut self, loader: Rc<dyn BehaviorLoader>) {
        self.behavior_loader = Some(loader);
    }

    pub fn behavior_loader(&self) -> Option<Rc<dyn BehaviorLoader>> {
        self.behavior_loader.clone()
    }

    /// Resolve a script through the registry and the scene's loader
    ///
    /// # Returns
    /// The bound behaviour, or a [`NoopBehavior`] when no loader is set or the
    /// script cannot be resolved.
    pub fn bind_script(&self, name: &str) -> Box<dyn Behavior> {
        match &self.behavior_loader {
            Some(loader) => bind_behavior(&self.script_registry, loader.as_ref(), name),
            None => {
                warn!(script = name, "No behavior loader set, binding no-op behavior");
                Box::new(NoopBehavior)
            }
        }
    }

    pub fn is_focused_on_debug_camera(&self) -> bool {
        self.is_focused_on_debug_camera
    }

    pub fn set_focused_on_debug_camera(&mut self, focused: bool) {
        self.is_focused_on_debug_camera = focused;
    }

    // ---- Entity lifecycle ----

    /// Allocate an entity with no components
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.store.create();
        debug!(entity = %entity, "Created entity");
        entity
    }

    /// Destroy an entity and the unnamed scaffolding entities parented to it
    ///
    /// Named children survive with their parent link removed. Rigid bodies of
    /// every destroyed entity are removed from the dynamics world.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.store.contains(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }

        let mut doomed = vec![entity];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let current = doomed[cursor];
            cursor += 1;
            for child in children_of(&self.store, current) {
                if doomed.contains(&child) {
                    continue;
                }
                if self.store.has::<NameComponent>(child) {
                    self.store.remove::<Parent>(child);
                    trace!(child = %child, "Detached named child");
                } else {
                    doomed.push(child);
                }
            }
        }

        for target in doomed {
            if let Some(mut physics) = self.store.remove::<PhysicsComponent>(target) {
                physics.remove_from(&mut self.physics);
            }
            self.store.destroy(target)?;
            debug!(entity = %target, "Destroyed entity");
        }
        Ok(())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.store.contains(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.store.entity_count()
    }

    /// Entities carrying a [`NameComponent`], ordered by index
    pub fn named_entities(&self) -> Vec<Entity> {
        let mut entities = self.store.entities_with::<NameComponent>();
        entities.sort_by_key(|entity| entity.index());
        entities
    }

    /// Resolve a picking id back to a live entity
    pub fn entity_from_id(&self, id: i32) -> Option<Entity> {
        self.store.entity_from_id(id)
    }

    // ---- Typed component access ----

    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.store.get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.store.get_mut(entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.store.has::<T>(entity)
    }

    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> Result<&mut T, EcsError> {
        self.store.add(entity, component)
    }

    /// Add or replace a component, returning the previous one
    ///
    /// A replaced [`PhysicsComponent`] has its rigid body released unless the
    /// new component shares it.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<Option<T>, EcsError> {
        let mut previous = self.store.insert(entity, component)?;
        if let Some(old) = previous.as_mut() {
            if let Some(old_physics) = (old as &mut dyn Any).downcast_mut::<PhysicsComponent>() {
                let current = self
                    .store
                    .get::<PhysicsComponent>(entity)
                    .ok()
                    .and_then(PhysicsComponent::handle);
                if old_physics.handle() != current {
                    old_physics.remove_from(&mut self.physics);
                }
            }
        }
        Ok(previous)
    }

    /// Remove a component; removing a [`PhysicsComponent`] also removes its body
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let mut removed = self.store.remove::<T>(entity)?;
        if let Some(physics) = (&mut removed as &mut dyn Any).downcast_mut::<PhysicsComponent>() {
            physics.remove_from(&mut self.physics);
        }
        Some(removed)
    }

    /// Attach a rigid body fitted to the entity's mesh bounds and transform
    pub fn add_physics(
        &mut self,
        entity: Entity,
        collider_type: ColliderType,
        mass: f32,
    ) -> Result<&mut PhysicsComponent, EcsError> {
        if !self.store.contains(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        if self.store.has::<PhysicsComponent>(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: PhysicsComponent::component_name(),
            });
        }
        let transform = self
            .store
            .get::<TransformComponent>(entity)
            .cloned()
            .unwrap_or_default();
        let dimensions = self
            .store
            .get::<MeshComponent>(entity)
            .map(|mesh| mesh.bounds.size())
            .unwrap_or(Vec3::ONE);
        let component = PhysicsComponent::new(
            &mut self.physics,
            collider_type,
            dimensions,
            transform.size(),
            transform.position(),
            euler_degrees_to_quat(transform.rotation()),
            mass,
        );
        let handle = component.handle();
        match self.store.add(entity, component) {
            Ok(physics) => Ok(physics),
            Err(err) => {
                if let Some(handle) = handle {
                    self.physics.remove_body(handle);
                }
                Err(err)
            }
        }
    }

    // ---- Transform editing ----

    /// Apply a transform edit and overwrite the rigid bodies of every touched entity
    pub fn edit_transform(
        &mut self,
        entity: Entity,
        edit: TransformEdit,
        propagate: bool,
    ) -> Result<(), EcsError> {
        let touched = apply_transform_edit(&mut self.store, entity, edit, propagate)?;
        for target in touched {
            push_transform(&mut self.store, &mut self.physics, target);
        }
        Ok(())
    }

    pub fn translate(&mut self, entity: Entity, delta: Vec3, propagate: bool) -> Result<(), EcsError> {
        self.edit_transform(entity, TransformEdit::Translate(delta), propagate)
    }

    pub fn rotate(&mut self, entity: Entity, degrees: Vec3, propagate: bool) -> Result<(), EcsError> {
        self.edit_transform(entity, TransformEdit::Rotate(degrees), propagate)
    }

    pub fn scale(&mut self, entity: Entity, factor: Vec3, propagate: bool) -> Result<(), EcsError> {
        self.edit_transform(entity, TransformEdit::Scale(factor), propagate)
    }

    pub fn set_position(&mut self, entity: Entity, position: Vec3, propagate: bool) -> Result<(), EcsError> {
        self.edit_transform(entity, TransformEdit::SetPosition(position), propagate)
    }

    pub fn set_rotation(&mut self, entity: Entity, degrees: Vec3, propagate: bool) -> Result<(), EcsError> {
        self.edit_transform(entity, TransformEdit::SetRotation(degrees), propagate)
    }

    pub fn set_size(&mut self, entity: Entity, size: Vec3, propagate: bool) -> Result<(), EcsError> {
        self.edit_transform(entity, TransformEdit::SetSize(size), propagate)
    }

    pub fn rotate_around_origin(
        &mut self,
        entity: Entity,
        degrees: Vec3,
        origin: Vec3,
        propagate: bool,
    ) -> Result<(), EcsError> {
        self.edit_transform(
            entity,
            TransformEdit::RotateAroundOrigin { degrees, origin },
            propagate,
        )
    }

    /// Re-push an entity's transform into its rigid body
    pub fn sync_physics(&mut self, entity: Entity) {
        push_transform(&mut self.store, &mut self.physics, entity);
    }

    // ---- State machine ----

    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Request a state change; returns false when the transition is not allowed
    ///
    /// `Edit -> Run` plays, `Run -> Pause` pauses, `Pause -> Run` unpauses and
    /// `Run | Pause -> Edit` stops.
    pub fn set_state(&mut self, state: SceneState) -> bool {
        use SceneState::*;
        match (self.state, state) {
            (from, to) if from == to => return true,
            (Edit, Run) => self.play(),
            (Run, Pause) => {
                info!(scene = %self.name, "Pausing scene");
            }
            (Pause, Run) => {
                info!(scene = %self.name, "Resuming scene");
            }
            (Run | Pause, Edit) => self.stop(),
            (from, to) => {
                warn!(from = ?from, to = ?to, "Ignoring invalid scene state transition");
                return false;
            }
        }
        self.state = state;
        true
    }

    fn play(&mut self) {
        info!(scene = %self.name, "Starting simulation");
        self.is_focused_on_debug_camera = false;
        self.run_snapshot = self.config.scene.restore_transforms_on_stop.then(|| {
            self.store
                .each::<TransformComponent>()
                .map(|(entity, transform)| (entity, transform.clone()))
                .collect()
        });
    }

    fn stop(&mut self) {
        info!(scene = %self.name, "Stopping simulation");
        self.physics.freeze();
        if let Some(snapshot) = self.run_snapshot.take() {
            debug!(count = snapshot.len(), "Restoring pre-run transforms");
            for (entity, saved) in snapshot {
                if let Ok(transform) = self.store.get_mut::<TransformComponent>(entity) {
                    transform.set_position(saved.position());
                    transform.set_rotation(saved.rotation());
                    transform.set_size(saved.size());
                    push_transform(&mut self.store, &mut self.physics, entity);
                }
            }
        }
        for (_, script) in self.store.each_mut::<ScriptComponent>() {
            script.started = false;
        }
        self.is_focused_on_debug_camera = true;
    }

    // ---- Per-frame work ----

    /// Advance the scene by `delta_time` seconds
    ///
    /// While running, physics steps and simulated poses overwrite transforms.
    /// Behaviours run in every state except `Edit`.
    pub fn update(&mut self, delta_time: f32) {
        if self.state == SceneState::Run {
            let steps = self.physics.step(delta_time);
            if steps > 0 {
                pull_transforms(&mut self.store, &self.physics);
            }
        }
        if self.state != SceneState::Edit {
            self.update_behaviors(delta_time);
        }
    }

    fn update_behaviors(&mut self, delta_time: f32) {
        for entity in self.store.entities_with::<ScriptComponent>() {
            let Ok(script) = self.store.get_mut::<ScriptComponent>(entity) else {
                continue;
            };
            // The behaviour is taken out so it can borrow the store mutably
            let mut behavior = std::mem::replace(&mut script.behavior, Box::new(NoopBehavior));
            let started = std::mem::replace(&mut script.started, true);

            let mut ctx = BehaviorContext {
                entity,
                store: &mut self.store,
                delta_time,
            };
            if !started {
                behavior.start(&mut ctx);
            }
            behavior.update(&mut ctx);

            if let Ok(script) = self.store.get_mut::<ScriptComponent>(entity) {
                script.behavior = behavior;
            }
        }
    }

    /// Rebind every script through the registry; only allowed while editing
    ///
    /// Returns the number of scripts rebound.
    pub fn validate_scripts(&mut self, loader: &dyn BehaviorLoader) -> usize {
        if self.state != SceneState::Edit {
            warn!(state = ?self.state, "Scripts can only be validated in edit mode");
            return 0;
        }
        let entities = self.store.entities_with::<ScriptComponent>();
        for &entity in &entities {
            let Ok(script) = self.store.get_mut::<ScriptComponent>(entity) else {
                continue;
            };
            let behavior = bind_behavior(&self.script_registry, loader, &script.behavior_name);
            script.rebind(behavior);
        }
        info!(count = entities.len(), "Validated scripts");
        entities.len()
    }

    /// Active view: the debug camera, or the first focused scene camera
    pub fn active_view(&self, debug_camera: &DebugCamera) -> ViewSpecification {
        if !self.is_focused_on_debug_camera {
            let mut cameras: Vec<_> = self
                .store
                .each::<CameraComponent>()
                .filter(|(_, camera)| camera.is_focused_on)
                .collect();
            cameras.sort_by_key(|(entity, _)| entity.index());
            for (entity, camera) in cameras {
                if let Ok(transform) = self.store.get::<TransformComponent>(entity) {
                    return camera.view_specification(transform);
                }
            }
        }
        debug_camera.view_specification()
    }

    /// Submit one frame to the render backend
    pub fn draw(&mut self, debug_camera: &DebugCamera, renderer: &mut dyn RenderBackend) {
        let view = self.active_view(debug_camera);
        renderer.begin_frame(&view);

        let mut lit: Vec<_> = self.store.entities_with::<LightComponent>();
        lit.sort_by_key(|entity| entity.index());
        let lights: Vec<LightUniform> = lit
            .iter()
            .filter_map(|&entity| {
                let light = self.store.get::<LightComponent>(entity).ok()?;
                let transform = self.store.get::<TransformComponent>(entity).ok()?;
                Some(LightUniform::from_light(light, transform))
            })
            .take(self.config.scene.max_lights)
            .collect();
        renderer.set_lights(&lights);

        let mut drawable = self.store.entities_with::<MeshRendererComponent>();
        drawable.sort_by_key(|entity| entity.index());
        for entity in drawable {
            if !self.config.scene.draw_light_meshes && self.store.has::<LightComponent>(entity) {
                continue;
            }
            let Ok(transform) = self.store.get_mut::<TransformComponent>(entity) else {
                continue;
            };
            let model = transform.model();
            let Ok(mesh_renderer) = self.store.get::<MeshRendererComponent>(entity) else {
                continue;
            };
            let collider = if mesh_renderer.show_collider {
                self.store
                    .get::<PhysicsComponent>(entity)
                    .ok()
                    .and_then(PhysicsComponent::handle)
                    .and_then(|handle| self.physics.body(handle))
                    .map(|body| body.aabb())
            } else {
                None
            };
            renderer.draw(&DrawItem {
                entity,
                entity_id: mesh_renderer.entity_id,
                registry_id: mesh_renderer.registry_id.clone(),
                model,
                material: mesh_renderer.material,
                shader: mesh_renderer.shader.clone(),
                collider,
            });
        }
        renderer.end_frame();
    }

    /// Propagate a viewport resize to every scene camera
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        for (_, camera) in self.store.each_mut::<CameraComponent>() {
            camera.resize(width, height);
        }
        debug!(width, height, "Resized scene cameras");
    }

    /// Remove every entity and runtime resource, returning to `Edit`
    pub fn reset(&mut self) {
        info!(scene = %self.name, entities = self.store.entity_count(), "Resetting scene");
        self.store.clear();
        self.physics.clear();
        self.shader_cache.clear();
        self.script_registry.clear();
        self.state = SceneState::Edit;
        self.is_focused_on_debug_camera = true;
        self.run_snapshot = None;
    }
}
