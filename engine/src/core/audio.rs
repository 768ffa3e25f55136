//! Audio source component

use crate::component_system::Component;

/// Sound clip played from an entity's position
///
/// Playback itself belongs to the audio backend; the scene only stores what to
/// play and how.
#[derive(Debug, Clone, PartialEq, Component)]
#[component(name = "AudioComponent")]
pub struct AudioComponent {
    pub source_path: String,
    /// Linear gain, 1.0 is unattenuated
    pub volume: f32,
    pub looping: bool,
}

impl Default for AudioComponent {
    fn default() -> Self {
        Self {
            source_path: String::new(),
            volume: 1.0,
            looping: false,
        }
    }
}

impl AudioComponent {
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            ..Self::default()
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Set the gain, clamped to be non-negative
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.max(0.0);
    }

    /// Whether a clip has been assigned
    pub fn has_source(&self) -> bool {
        !self.source_path.is_empty()
    }
}
