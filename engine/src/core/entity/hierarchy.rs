//! Parent-child transform propagation
//!
//! Edits applied to an entity can be propagated to every descendant reached
//! through `Parent` links. Descendants are visited breadth-first and each one
//! is transformed exactly once, so an already-updated child is never moved
//! twice by a shared ancestor.

use super::components::{Parent, TransformComponent};
use super::world::ComponentStore;
use super::{EcsError, Entity};
use glam::Vec3;
use std::collections::{HashSet, VecDeque};
use tracing::{error, trace};

/// A single edit of an entity's transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformEdit {
    /// Add a position delta
    Translate(Vec3),
    /// Add Euler angles in degrees
    Rotate(Vec3),
    /// Multiply the size component-wise
    Scale(Vec3),
    SetPosition(Vec3),
    SetRotation(Vec3),
    SetSize(Vec3),
    /// Orbit the position around a pivot by Euler angles in degrees
    RotateAroundOrigin { degrees: Vec3, origin: Vec3 },
}

/// Direct children of an entity
pub fn children_of(store: &ComponentStore, parent: Entity) -> Vec<Entity> {
    store
        .each::<Parent>()
        .filter(|(_, link)| link.0 == parent)
        .map(|(child, _)| child)
        .collect()
}

/// Every descendant of `root` in breadth-first order, excluding `root`
///
/// Cyclic links are logged and skipped.
pub fn descendants(store: &ComponentStore, root: Entity) -> Vec<Entity> {
    let links: Vec<(Entity, Entity)> = store
        .each::<Parent>()
        .map(|(child, parent)| (child, parent.0))
        .collect();

    let mut visited = HashSet::new();
    visited.insert(root);
    let mut queue = VecDeque::from([root]);
    let mut result = Vec::new();

    while let Some(parent) = queue.pop_front() {
        for &(child, _) in links.iter().filter(|(_, p)| *p == parent) {
            if !visited.insert(child) {
                error!(
                    parent = %parent,
                    child = %child,
                    "Cyclic parent-child relationship detected"
                );
                continue;
            }
            result.push(child);
            queue.push_back(child);
        }
    }

    trace!(root = %root, count = result.len(), "Collected descendants");
    result
}

/// Apply a transform edit to an entity and optionally to its descendants
///
/// # Arguments
/// * `store` - Store holding the transforms and `Parent` links
/// * `entity` - Root of the edit
/// * `edit` - Edit applied exactly to the root
/// * `propagate` - Whether descendants follow the root
///
/// # Returns
/// Every entity whose transform changed, root first, so callers can
/// resynchronise dependent state such as rigid bodies.
pub fn apply_transform_edit(
    store: &mut ComponentStore,
    entity: Entity,
    edit: TransformEdit,
    propagate: bool,
) -> Result<Vec<Entity>, EcsError> {
    let (child_edit, pivot) = edit_root(store.get_mut::<TransformComponent>(entity)?, edit);

    let mut touched = vec![entity];
    if !propagate {
        return Ok(touched);
    }

    for child in descendants(store, entity) {
        let Ok(transform) = store.get_mut::<TransformComponent>(child) else {
            continue;
        };
        edit_child(transform, child_edit, pivot);
        touched.push(child);
    }

    Ok(touched)
}

/// Transforms of `entity` and its descendants after a sequence of propagated
/// edits, computed without modifying the store
///
/// # Returns
/// The root's resulting transform followed by each descendant's, in the order
/// [`apply_transform_edit`] visits them.
pub fn preview_transform_edits(
    store: &ComponentStore,
    entity: Entity,
    edits: &[TransformEdit],
) -> Result<(TransformComponent, Vec<(Entity, TransformComponent)>), EcsError> {
    let mut root = store.get::<TransformComponent>(entity)?.clone();
    let mut children: Vec<(Entity, TransformComponent)> = descendants(store, entity)
        .into_iter()
        .filter_map(|child| {
            store
                .get::<TransformComponent>(child)
                .ok()
                .map(|transform| (child, transform.clone()))
        })
        .collect();

    for &edit in edits {
        let (child_edit, pivot) = edit_root(&mut root, edit);
        for (_, transform) in &mut children {
            edit_child(transform, child_edit, pivot);
        }
    }
    Ok((root, children))
}

/// Apply `edit` to a root transform, returning the edit its descendants
/// receive and the root position before the edit
fn edit_root(root: &mut TransformComponent, edit: TransformEdit) -> (TransformEdit, Vec3) {
    let pivot = root.position();
    let old_size = root.size();

    // Absolute edits are applied exactly to the root and as deltas below it
    let child_edit = match edit {
        TransformEdit::Translate(delta) => {
            root.translate(delta);
            TransformEdit::Translate(delta)
        }
        TransformEdit::SetPosition(position) => {
            let delta = position - root.position();
            root.set_position(position);
            TransformEdit::Translate(delta)
        }
        TransformEdit::Rotate(delta) => {
            root.rotate(delta);
            TransformEdit::Rotate(delta)
        }
        TransformEdit::SetRotation(rotation) => {
            let delta = rotation - root.rotation();
            root.set_rotation(rotation);
            TransformEdit::Rotate(delta)
        }
        TransformEdit::Scale(factor) => {
            root.scale(factor);
            TransformEdit::Scale(factor)
        }
        TransformEdit::SetSize(size) => {
            root.set_size(size);
            TransformEdit::Scale(scale_factor(old_size, size))
        }
        TransformEdit::RotateAroundOrigin { degrees, origin } => {
            root.rotate_around_origin(degrees, origin);
            TransformEdit::RotateAroundOrigin { degrees, origin }
        }
    };
    (child_edit, pivot)
}

fn edit_child(transform: &mut TransformComponent, child_edit: TransformEdit, pivot: Vec3) {
    match child_edit {
        TransformEdit::Translate(delta) => transform.translate(delta),
        TransformEdit::Rotate(delta) => {
            transform.rotate_around_origin(delta, pivot);
            transform.rotate(delta);
        }
        TransformEdit::Scale(factor) => {
            let offset = transform.position() - pivot;
            transform.set_position(pivot + offset * factor);
            transform.scale(factor);
        }
        TransformEdit::RotateAroundOrigin { degrees, origin } => {
            transform.rotate_around_origin(degrees, origin);
        }
        TransformEdit::SetPosition(_) | TransformEdit::SetRotation(_) | TransformEdit::SetSize(_) => {}
    }
}

/// Per-axis factor turning `old` into `new`; a zero old axis propagates no factor
fn scale_factor(old: Vec3, new: Vec3) -> Vec3 {
    let axis = |old: f32, new: f32| if old == 0.0 { 1.0 } else { new / old };
    Vec3::new(axis(old.x, new.x), axis(old.y, new.y), axis(old.z, new.z))
}
