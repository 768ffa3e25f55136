//! Component trait shared by every type that can live in the component store

use std::any::Any;

pub use engine_derive::Component;

/// Trait for typed data records attached to entities
///
/// Implemented through `#[derive(Component)]`. The component name is the key
/// used by the scene serializer and by log output.
pub trait Component: Any + 'static {
    /// Get the name of this component type
    fn component_name() -> &'static str
    where
        Self: Sized;
}
