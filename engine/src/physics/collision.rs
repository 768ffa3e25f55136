//! Collider shapes, sweep-and-prune broad phase and AABB contact resolution

use crate::graphics::Aabb;
use glam::{Mat3, Quat, Vec3};
use std::cmp::Ordering;

/// Primitive collision shape, centred on the body position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
    /// Capsule along the local Y axis; `half_height` excludes the caps
    Capsule { radius: f32, half_height: f32 },
}

impl ColliderShape {
    /// World-space bounds of the shape at the given pose
    pub fn world_aabb(&self, position: Vec3, rotation: Quat) -> Aabb {
        let half = match *self {
            ColliderShape::Box { half_extents } => {
                let m = Mat3::from_quat(rotation);
                let abs = Mat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
                abs * half_extents
            }
            ColliderShape::Sphere { radius } => Vec3::splat(radius),
            ColliderShape::Capsule {
                radius,
                half_height,
            } => (rotation * Vec3::Y).abs() * half_height + Vec3::splat(radius),
        };
        Aabb::from_center_half_extents(position, half)
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn of(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Pick the axis along which box centres spread the most
fn best_axis(boxes: &[Aabb]) -> Axis {
    let count = boxes.len() as f32;
    let mean = boxes.iter().map(Aabb::center).sum::<Vec3>() / count;
    let variance = boxes
        .iter()
        .map(|aabb| (aabb.center() - mean).powf(2.0))
        .sum::<Vec3>();
    if variance.x >= variance.y && variance.x >= variance.z {
        Axis::X
    } else if variance.y >= variance.z {
        Axis::Y
    } else {
        Axis::Z
    }
}

/// Indices of overlapping box pairs, each pair ordered `(low, high)`
pub fn sweep_and_prune(boxes: &[Aabb]) -> Vec<(usize, usize)> {
    if boxes.len() < 2 {
        return Vec::new();
    }

    let axis = best_axis(boxes);
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| {
        axis.of(boxes[a].min)
            .partial_cmp(&axis.of(boxes[b].min))
            .unwrap_or(Ordering::Equal)
    });

    let mut pairs = Vec::new();
    let mut active: Vec<usize> = Vec::new();
    for index in order {
        let start = axis.of(boxes[index].min);
        active.retain(|&other| axis.of(boxes[other].max) > start);
        for &other in &active {
            if boxes[other].intersects(&boxes[index]) {
                pairs.push((other.min(index), other.max(index)));
            }
        }
        active.push(index);
    }

    pairs.sort_unstable();
    pairs
}

/// Minimum translation separating `a` from `b`
///
/// Returns the unit normal pointing from `b` towards `a` and the depth, or
/// `None` when the boxes do not overlap.
pub fn penetration(a: &Aabb, b: &Aabb) -> Option<(Vec3, f32)> {
    if !a.intersects(b) {
        return None;
    }
    let overlap = a.max.min(b.max) - a.min.max(b.min);
    let direction = a.center() - b.center();
    let sign = |d: f32| if d < 0.0 { -1.0 } else { 1.0 };

    let (normal, depth) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (Vec3::new(sign(direction.x), 0.0, 0.0), overlap.x)
    } else if overlap.y <= overlap.z {
        (Vec3::new(0.0, sign(direction.y), 0.0), overlap.y)
    } else {
        (Vec3::new(0.0, 0.0, sign(direction.z)), overlap.z)
    };
    Some((normal, depth))
}
