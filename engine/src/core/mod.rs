//! Core engine functionality
//!
//! Entities and their components, cameras, lights and audio sources.

pub mod audio;
pub mod camera;
pub mod entity;
pub mod light;
